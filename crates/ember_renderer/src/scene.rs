//! Build a renderable world from a scene description.

use std::collections::BTreeMap;
use std::sync::Arc;

use ember_core::SceneDescription;
use log::{debug, info};

use crate::{Material, Sphere, World};

/// Convert a validated [`SceneDescription`] into a [`World`].
///
/// Each named material is instantiated once and shared by every sphere
/// that references it. Spheres keep their description order. References to
/// unknown materials are skipped; `SceneDescription::validate` rejects them
/// before a render gets this far.
pub fn build_world(scene: &SceneDescription) -> World {
    let materials: BTreeMap<&str, Arc<Material>> = scene
        .materials
        .iter()
        .map(|(name, desc)| (name.as_str(), Arc::new(Material::from(*desc))))
        .collect();

    let mut world = World::new();
    for (index, sphere) in scene.spheres.iter().enumerate() {
        let Some(material) = materials.get(sphere.material.as_str()) else {
            debug!("Skipping sphere {}: unknown material '{}'", index, sphere.material);
            continue;
        };
        world.add(Box::new(Sphere::new(
            sphere.center,
            sphere.radius,
            Arc::clone(material),
        )));
    }

    info!(
        "Built world: {} spheres, {} materials",
        world.len(),
        materials.len()
    );
    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hittable, Interval, Ray, Vec3, T_MIN};
    use ember_core::{simple_scene, MaterialDesc, SphereDesc};

    #[test]
    fn test_build_simple_scene() {
        let scene = simple_scene();
        let world = build_world(&scene);
        assert_eq!(world.len(), 4);

        // Straight down onto the glass sphere at (0, 1, 0)
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let rec = world.hit(&ray, Interval::new(T_MIN, f64::INFINITY)).unwrap();
        assert!((rec.t - 3.0).abs() < 1e-12);
        assert!(matches!(rec.material, Material::Dielectric { .. }));
    }

    #[test]
    fn test_materials_are_shared() {
        let mut scene = SceneDescription::new();
        scene.add_material(
            "red",
            MaterialDesc::Lambertian {
                albedo: Vec3::new(0.9, 0.1, 0.1),
            },
        );
        scene.add_sphere(SphereDesc::new(Vec3::new(-2.0, 0.0, 0.0), 0.5, "red"));
        scene.add_sphere(SphereDesc::new(Vec3::new(2.0, 0.0, 0.0), 0.5, "red"));
        let world = build_world(&scene);
        assert_eq!(world.len(), 2);

        let left = world
            .hit(
                &Ray::new(Vec3::new(-2.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0)),
                Interval::new(T_MIN, f64::INFINITY),
            )
            .unwrap();
        let right = world
            .hit(
                &Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0)),
                Interval::new(T_MIN, f64::INFINITY),
            )
            .unwrap();
        assert!(std::ptr::eq(left.material, right.material));
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let mut scene = SceneDescription::new();
        scene.add_material(
            "rough",
            MaterialDesc::Metal {
                albedo: Vec3::splat(0.5),
                fuzz: 3.0,
            },
        );
        scene.add_sphere(SphereDesc::new(Vec3::ZERO, 1.0, "rough"));
        let world = build_world(&scene);

        let rec = world
            .hit(
                &Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0)),
                Interval::new(T_MIN, f64::INFINITY),
            )
            .unwrap();
        assert_eq!(
            *rec.material,
            Material::Metal {
                albedo: Vec3::splat(0.5),
                fuzz: 1.0
            }
        );
    }
}
