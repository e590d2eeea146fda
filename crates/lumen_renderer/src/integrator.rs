//! Recursive light transport.
//!
//! Each ray carries an integer depth budget. Every secondary effect costs a
//! configurable amount of it and is only followed while the remaining budget
//! stays positive, so recursion terminates after at most
//! `depth / min_cost` levels.

use lumen_core::{Intersection, Scene};
use lumen_math::sampling::random_in_direction;
use lumen_math::vector::{reflect, refract};
use lumen_math::{Color, Ray, Vec3, AMBIENT_IOR};
use rand::Rng;

use crate::{Camera, RenderConfig};

/// Counters collected while tracing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraceStats {
    /// Rays traced, primary and secondary
    pub rays: u64,
    /// Deepest recursion level reached; primary rays are level 0
    pub max_level: u32,
}

impl TraceStats {
    pub fn merge(&mut self, other: TraceStats) {
        self.rays += other.rays;
        self.max_level = self.max_level.max(other.max_level);
    }
}

/// Schlick's approximation of the reflected fraction at a dielectric
/// boundary between media `n1` (incoming) and `n2`.
///
/// Uses the cosine on the denser side: the incident cosine when entering a
/// denser medium, the transmitted cosine otherwise.
pub fn schlick(n1: f32, n2: f32, cos_incident: f32, cos_transmitted: f32) -> f32 {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    let cos = if n1 > n2 {
        cos_transmitted
    } else {
        cos_incident
    };
    r0 + (1.0 - r0) * (1.0 - cos).powi(5)
}

/// Refractive indices and Fresnel weight where a ray meets a transmissive
/// surface.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    /// Index of the medium the ray travels in
    n1: f32,
    /// Index of the medium behind the surface
    n2: f32,
    /// Reflected fraction; 1 on total internal reflection
    reflectance: f32,
    /// Unnormalized refracted direction, `None` on total internal reflection
    refracted: Option<Vec3>,
}

impl Boundary {
    /// `normal` faces the incoming ray. A ray hitting the back of a surface
    /// (`inside`) leaves into the ambient medium.
    fn new(ray: &Ray, normal: Vec3, inside: bool, ior: f32) -> Self {
        let n1 = ray.ior;
        let n2 = if inside { AMBIENT_IOR } else { ior };
        let cos_incident = -ray.direction.dot(normal);
        let refracted = refract(ray.direction, normal, n1 / n2);
        let reflectance = match refracted {
            Some(t) => schlick(n1, n2, cos_incident, -t.normalize().dot(normal)),
            None => 1.0,
        };
        Self {
            n1,
            n2,
            reflectance,
            refracted,
        }
    }
}

/// Path tracer bound to one scene, one configuration and one random stream.
///
/// A tracer is owned by exactly one worker; nothing in it is shared.
///
/// Media do not nest: a ray leaving a transmissive object always continues
/// in `AMBIENT_IOR`, even when the object sits inside another medium.
pub struct Tracer<'a, R: Rng> {
    scene: &'a Scene,
    config: &'a RenderConfig,
    rng: R,
    stats: TraceStats,
}

impl<'a, R: Rng> Tracer<'a, R> {
    pub fn new(scene: &'a Scene, config: &'a RenderConfig, rng: R) -> Self {
        Self {
            scene,
            config,
            rng,
            stats: TraceStats::default(),
        }
    }

    pub fn stats(&self) -> TraceStats {
        self.stats
    }

    /// Average radiance of `pixel_samples` jittered primary rays through
    /// pixel `(x, y)`, each traced with the full depth budget.
    pub fn render_pixel(&mut self, camera: &Camera, x: u32, y: u32) -> Color {
        let samples = self.config.pixel_samples;
        let budget = self.config.depth as i32;

        let mut color = Color::ZERO;
        for _ in 0..samples {
            let ray = camera.primary_ray(x, y, &mut self.rng);
            color += self.radiance(&ray, budget);
        }
        color / samples as f32
    }

    /// Radiance arriving along `ray` with the given remaining budget.
    pub fn radiance(&mut self, ray: &Ray, budget: i32) -> Color {
        self.trace(ray, budget, 0)
    }

    fn trace(&mut self, ray: &Ray, budget: i32, level: u32) -> Color {
        self.stats.rays += 1;
        self.stats.max_level = self.stats.max_level.max(level);

        if budget <= 0 {
            return self.config.void_color;
        }

        let scene = self.scene;
        let mut hit = Intersection::new();
        if !scene.intersect(ray, &mut hit) {
            return self.config.void_color;
        }

        let surface = scene.surface(&hit);
        let material = surface.material;
        let position = surface.position;

        // Shade on the side the ray arrives from
        let inside = surface.normal.dot(ray.direction) > 0.0;
        let normal = if inside {
            -surface.normal
        } else {
            surface.normal
        };

        let mut color = material.emission;

        if let Some(diffuse) = material.diffuse() {
            let next = budget - self.config.diffuse_depth_cost as i32;
            if next > 0 {
                let incoming = self.sample_lobe(
                    position,
                    normal,
                    1.0,
                    self.config.diffuse_samples,
                    ray.ior,
                    next,
                    level,
                );
                color += diffuse * incoming;
            }
        }

        if material.specular_sharpness != 0.0 {
            let sharpness = material.specular_sharpness;
            match material.transmission() {
                Some(transmission) => {
                    let boundary = Boundary::new(ray, normal, inside, material.ior);
                    let reflectance = boundary.reflectance;

                    if let Some(specular) = material.specular() {
                        let next = budget - self.config.specular_depth_cost as i32;
                        if next > 0 && reflectance > 0.0 {
                            let incoming = self.sample_lobe(
                                position,
                                reflect(ray.direction, normal),
                                sharpness,
                                self.config.specular_samples,
                                boundary.n1,
                                next,
                                level,
                            );
                            color += reflectance * specular * incoming;
                        }
                    }

                    if let Some(direction) = boundary.refracted {
                        let next = budget - self.config.transmission_depth_cost as i32;
                        if next > 0 {
                            let incoming = self.sample_lobe(
                                position,
                                direction.normalize(),
                                sharpness,
                                self.config.transmission_samples,
                                boundary.n2,
                                next,
                                level,
                            );
                            color += (1.0 - reflectance)
                                * material.transmissivity
                                * transmission
                                * incoming;
                        }
                    }
                }
                None => {
                    if let Some(specular) = material.specular() {
                        let next = budget - self.config.specular_depth_cost as i32;
                        if next > 0 {
                            let incoming = self.sample_lobe(
                                position,
                                reflect(ray.direction, normal),
                                sharpness,
                                self.config.specular_samples,
                                ray.ior,
                                next,
                                level,
                            );
                            color += specular * incoming;
                        }
                    }
                }
            }
        }

        color
    }

    /// Average radiance of `samples` rays leaving `origin` in a lobe around
    /// the unit vector `axis`.
    #[allow(clippy::too_many_arguments)]
    fn sample_lobe(
        &mut self,
        origin: Vec3,
        axis: Vec3,
        exponent: f32,
        samples: u32,
        ior: f32,
        budget: i32,
        level: u32,
    ) -> Color {
        let mut sum = Color::ZERO;
        for _ in 0..samples {
            let direction = random_in_direction(axis, 1.0, exponent, &mut self.rng);
            let ray = Ray::with_ior(origin, direction, ior);
            sum += self.trace(&ray, budget, level + 1);
        }
        sum / samples as f32
    }
}
