//! Surface material records.

use lumen_math::{vector::is_null, Color, Vec3};

/// Material record shared by all triangles of an object.
///
/// A color of exactly zero in every channel means the corresponding effect
/// is absent. The `Option` accessors below are the only way the integrator
/// reads these channels, so an absent effect is skipped entirely.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name (from the MTL `newmtl` statement)
    pub name: String,

    /// Emitted radiance, added regardless of the depth budget
    pub emission: Color,

    /// Diffuse reflectance
    pub diffuse_color: Color,

    /// Specular reflectance
    pub specular_color: Color,

    /// Tint applied to transmitted light
    pub transmission_color: Color,

    /// Exponent of the glossy lobe; larger is sharper, zero disables
    /// specular reflection and transmission
    pub specular_sharpness: f32,

    /// Fraction of the non-reflected light that is transmitted
    pub transmissivity: f32,

    /// Index of refraction of the medium behind the surface
    pub ior: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            emission: Color::ZERO,
            diffuse_color: Color::splat(0.5),
            specular_color: Color::splat(0.2),
            transmission_color: Color::ZERO,
            specular_sharpness: 1.0,
            transmissivity: 0.0,
            ior: 1.0,
        }
    }
}

impl Material {
    /// Create a new material with just a name and diffuse color.
    pub fn new(name: impl Into<String>, diffuse_color: Color) -> Self {
        Self {
            name: name.into(),
            diffuse_color,
            ..Default::default()
        }
    }

    /// A pure emitter: no diffuse, specular or transmitted light.
    pub fn emitter(name: impl Into<String>, emission: Color) -> Self {
        Self {
            name: name.into(),
            emission,
            diffuse_color: Color::ZERO,
            specular_color: Color::ZERO,
            specular_sharpness: 0.0,
            ..Default::default()
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_specular(mut self, color: Color, sharpness: f32) -> Self {
        self.specular_color = color;
        self.specular_sharpness = sharpness;
        self
    }

    pub fn with_transmission(mut self, color: Color, transmissivity: f32, ior: f32) -> Self {
        self.transmission_color = color;
        self.transmissivity = transmissivity;
        self.ior = ior;
        self
    }

    /// Diffuse color, if the material scatters diffusely.
    pub fn diffuse(&self) -> Option<Color> {
        present(self.diffuse_color)
    }

    /// Specular color, if the material reflects specularly.
    pub fn specular(&self) -> Option<Color> {
        present(self.specular_color)
    }

    /// Transmission color, if the material lets light through.
    pub fn transmission(&self) -> Option<Color> {
        if self.transmissivity > 0.0 {
            present(self.transmission_color)
        } else {
            None
        }
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        !is_null(self.emission)
    }
}

#[inline]
fn present(color: Vec3) -> Option<Color> {
    if is_null(color) {
        None
    } else {
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material() {
        let material = Material::default();

        assert_eq!(material.diffuse(), Some(Color::splat(0.5)));
        assert_eq!(material.specular(), Some(Color::splat(0.2)));
        assert_eq!(material.transmission(), None);
        assert!(!material.is_emissive());
    }

    #[test]
    fn test_zero_color_means_absent() {
        let material = Material::new("black", Color::ZERO).with_specular(Color::ZERO, 10.0);

        assert_eq!(material.diffuse(), None);
        assert_eq!(material.specular(), None);
    }

    #[test]
    fn test_transmission_needs_transmissivity() {
        let glass = Material::default().with_transmission(Color::ONE, 0.9, 1.5);
        assert_eq!(glass.transmission(), Some(Color::ONE));

        let opaque = Material::default().with_transmission(Color::ONE, 0.0, 1.5);
        assert_eq!(opaque.transmission(), None);
    }

    #[test]
    fn test_emitter() {
        let light = Material::emitter("light", Color::splat(4.0));

        assert!(light.is_emissive());
        assert_eq!(light.diffuse(), None);
        assert_eq!(light.specular(), None);
        assert_eq!(light.specular_sharpness, 0.0);
    }
}
