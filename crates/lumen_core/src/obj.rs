//! Wavefront OBJ/MTL scene loading.
//!
//! Every OBJ model becomes one [`Object`]. Positions and normals keep their
//! own index streams, and meshes without normals get one flat normal per
//! triangle.

use std::path::Path;
use std::time::Instant;

use lumen_math::{Color, Vec3};
use thiserror::Error;

use crate::material::Material;
use crate::mesh::{face_normal, TriangleMesh};
use crate::scene::{Object, Scene, SceneError};

/// Errors that can occur during OBJ loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load an OBJ file (and the MTL libraries it references) into a [`Scene`].
///
/// A missing or broken MTL is not fatal; the affected objects fall back to
/// the default material.
pub fn load_obj<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let start = Instant::now();

    let (models, materials) = tobj::load_obj(path, &load_options())?;
    let materials = materials.unwrap_or_else(|err| {
        log::warn!("Failed to load materials for {}: {}", path.display(), err);
        Vec::new()
    });

    let scene = build_scene(&models, &materials)?;
    log::info!("Loaded {} in {:?}", path.display(), start.elapsed());
    Ok(scene)
}

/// Load a scene from OBJ source text with an optional MTL library.
///
/// Any `mtllib` statement in `obj` resolves to `mtl`.
pub fn load_obj_str(obj: &str, mtl: Option<&str>) -> LoadResult<Scene> {
    let (models, materials) =
        tobj::load_obj_buf(&mut obj.as_bytes(), &load_options(), |_| match mtl {
            Some(src) => tobj::load_mtl_buf(&mut src.as_bytes()),
            None => Err(tobj::LoadError::OpenFileFailed),
        })?;
    let materials = materials.unwrap_or_else(|err| {
        log::warn!("Failed to load materials: {}", err);
        Vec::new()
    });

    Ok(build_scene(&models, &materials)?)
}

/// Merge all models into one mesh and validate the result.
fn build_scene(models: &[tobj::Model], mtl: &[tobj::Material]) -> Result<Scene, SceneError> {
    let mut mesh = TriangleMesh::default();
    let mut objects = Vec::with_capacity(models.len());
    let mut materials: Vec<Material> = mtl.iter().map(convert_material).collect();
    let mut default_material = None;

    for model in models {
        let m = &model.mesh;
        let first_triangle = mesh.triangle_count();
        let vertex_base = mesh.positions.len() as u32;
        let normal_base = mesh.normals.len() as u32;

        mesh.positions.extend(
            m.positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );
        mesh.vertex_indices.extend(
            m.indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]].map(|i| i + vertex_base)),
        );

        if m.normal_indices.len() == m.indices.len() && !m.normals.is_empty() {
            mesh.normals.extend(
                m.normals
                    .chunks_exact(3)
                    .map(|n| Vec3::new(n[0], n[1], n[2])),
            );
            mesh.normal_indices.extend(
                m.normal_indices
                    .chunks_exact(3)
                    .map(|t| [t[0], t[1], t[2]].map(|i| i + normal_base)),
            );
        } else {
            // Flat shading: one normal per triangle
            for triangle in first_triangle..mesh.vertex_indices.len() {
                let [p0, p1, p2] = mesh.vertex_indices[triangle]
                    .map(|i| mesh.positions.get(i as usize).copied().unwrap_or_default());
                let n = mesh.normals.len() as u32;
                mesh.normals.push(face_normal(p0, p1, p2));
                mesh.normal_indices.push([n, n, n]);
            }
        }

        let material = match m.material_id {
            Some(id) if id < mtl.len() => id,
            other => {
                if let Some(id) = other {
                    log::warn!(
                        "Model '{}' references unknown material {}, using default",
                        model.name,
                        id
                    );
                }
                *default_material.get_or_insert_with(|| {
                    materials.push(Material {
                        name: "default".to_string(),
                        ..Default::default()
                    });
                    materials.len() - 1
                })
            }
        };

        objects.push(Object::new(
            model.name.clone(),
            material,
            first_triangle..mesh.triangle_count(),
        ));
    }

    let bounds = mesh.bounds();
    log::info!(
        "OBJ: {} models, {} triangles, {} vertices, {} materials, bounds {} .. {}",
        models.len(),
        mesh.triangle_count(),
        mesh.positions.len(),
        materials.len(),
        bounds.min(),
        bounds.max()
    );

    let scene = Scene::new(mesh, objects, materials)?;
    if !scene.objects().iter().any(|o| scene.materials()[o.material].is_emissive()) {
        log::warn!("Scene has no emissive objects; only the void color lights it");
    }
    Ok(scene)
}

/// Convert an MTL material; unspecified statements keep the defaults.
fn convert_material(mtl: &tobj::Material) -> Material {
    let mut material = Material {
        name: mtl.name.clone(),
        ..Default::default()
    };

    if let Some(kd) = mtl.diffuse {
        material.diffuse_color = Color::from(kd);
    }
    if let Some(ks) = mtl.specular {
        material.specular_color = Color::from(ks);
    }
    if let Some(ns) = mtl.shininess {
        material.specular_sharpness = ns;
    }
    if let Some(ni) = mtl.optical_density {
        material.ior = ni;
    }
    if let Some(d) = mtl.dissolve {
        material.transmissivity = (1.0 - d).clamp(0.0, 1.0);
    }
    if let Some(ke) = mtl.emissive {
        material.emission = Color::from(ke);
    } else if let Some(ke) = mtl.unknown_param.get("Ke").and_then(|s| parse_rgb(s)) {
        material.emission = ke;
    }
    if let Some(tf) = mtl.unknown_param.get("Tf").and_then(|s| parse_rgb(s)) {
        material.transmission_color = tf;
    }

    material
}

/// Parse "r g b" (or a single grey value) from an MTL statement argument.
fn parse_rgb(s: &str) -> Option<Color> {
    let values: Vec<f32> = s
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match values.as_slice() {
        [grey] => Some(Color::splat(*grey)),
        [r, g, b] => Some(Color::new(*r, *g, *b)),
        _ => None,
    }
}
