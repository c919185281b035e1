//! Built-in scenes.
//!
//! Both scenes share the three large feature spheres (glass, diffuse brown,
//! polished metal) on a huge grey ground sphere, viewed by the default
//! [`CameraSettings`](crate::CameraSettings).

use std::fmt;
use std::str::FromStr;

use ember_math::{Color, Point3, RngStream};

use crate::scene::{MaterialDesc, SceneDescription, SphereDesc};

/// Scenes that can be built without a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScene {
    /// Ground plus the three feature spheres.
    Simple,
    /// `Simple` plus a jittered grid of small random spheres.
    Random,
}

impl BuiltinScene {
    /// Build the scene. Only `Random` draws from `rng`.
    pub fn build(self, rng: &mut RngStream) -> SceneDescription {
        match self {
            BuiltinScene::Simple => simple_scene(),
            BuiltinScene::Random => random_scene(rng),
        }
    }
}

impl fmt::Display for BuiltinScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltinScene::Simple => write!(f, "simple"),
            BuiltinScene::Random => write!(f, "random"),
        }
    }
}

impl FromStr for BuiltinScene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(BuiltinScene::Simple),
            "random" => Ok(BuiltinScene::Random),
            other => Err(format!("unknown scene '{other}' (expected 'simple' or 'random')")),
        }
    }
}

fn add_ground(scene: &mut SceneDescription) {
    scene.add_material(
        "ground",
        MaterialDesc::Lambertian {
            albedo: Color::new(0.5, 0.5, 0.5),
        },
    );
    scene.add_sphere(SphereDesc::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        "ground",
    ));
}

fn add_feature_spheres(scene: &mut SceneDescription) {
    scene.add_material("glass", MaterialDesc::Dielectric { ior: 1.5 });
    scene.add_sphere(SphereDesc::new(Point3::new(0.0, 1.0, 0.0), 1.0, "glass"));

    scene.add_material(
        "brown",
        MaterialDesc::Lambertian {
            albedo: Color::new(0.4, 0.2, 0.1),
        },
    );
    scene.add_sphere(SphereDesc::new(Point3::new(-4.0, 1.0, 0.0), 1.0, "brown"));

    scene.add_material(
        "mirror",
        MaterialDesc::Metal {
            albedo: Color::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        },
    );
    scene.add_sphere(SphereDesc::new(Point3::new(4.0, 1.0, 0.0), 1.0, "mirror"));
}

/// Ground plus glass, diffuse and metal spheres side by side.
pub fn simple_scene() -> SceneDescription {
    let mut scene = SceneDescription::new();
    add_ground(&mut scene);
    add_feature_spheres(&mut scene);
    scene
}

/// Ground, a 22x22 grid of small jittered spheres, then the feature spheres.
///
/// Draw order per grid cell: x jitter, z jitter, then (only when the sphere
/// is kept) the material choice followed by the material's own draws.
pub fn random_scene(rng: &mut RngStream) -> SceneDescription {
    const SMALL_RADIUS: f64 = 0.2;
    let keep_out = Point3::new(4.0, 0.2, 0.0);

    let mut scene = SceneDescription::new();
    add_ground(&mut scene);

    let mut index = 0usize;
    for a in -11..11 {
        for b in -11..11 {
            let x = a as f64 + 0.9 * rng.random_double();
            let z = b as f64 + 0.9 * rng.random_double();
            let center = Point3::new(x, 0.2, z);

            if (center - keep_out).length() <= 0.9 {
                continue;
            }

            let choose_mat = rng.random_double();
            let material = if choose_mat < 0.8 {
                MaterialDesc::Lambertian {
                    albedo: rng.random_vec3(),
                }
            } else if choose_mat < 0.95 {
                let albedo = rng.random_vec3_range(0.5, 1.0);
                let fuzz = rng.random_range(0.0, 0.5);
                MaterialDesc::Metal { albedo, fuzz }
            } else {
                MaterialDesc::Dielectric { ior: 1.5 }
            };

            let name = format!("small_{index:03}");
            scene.add_material(name.clone(), material);
            scene.add_sphere(SphereDesc::new(center, SMALL_RADIUS, name));
            index += 1;
        }
    }

    add_feature_spheres(&mut scene);
    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_scene_layout() {
        let scene = simple_scene();
        assert_eq!(scene.spheres.len(), 4);
        assert_eq!(scene.materials.len(), 4);
        assert_eq!(scene.spheres[0].radius, 1000.0);
        assert_eq!(scene.spheres[1].material, "glass");
        assert_eq!(
            scene.materials["mirror"],
            MaterialDesc::Metal {
                albedo: Color::new(0.7, 0.6, 0.5),
                fuzz: 0.0
            }
        );
        assert_eq!(scene.validate(), Ok(()));
    }

    #[test]
    fn test_random_scene_is_valid() {
        let mut rng = RngStream::default();
        let scene = random_scene(&mut rng);

        // Ground + at most 484 small spheres + 3 feature spheres
        assert!(scene.spheres.len() > 4);
        assert!(scene.spheres.len() <= 1 + 22 * 22 + 3);
        assert_eq!(scene.validate(), Ok(()));

        let keep_out = Point3::new(4.0, 0.2, 0.0);
        let small = &scene.spheres[1..scene.spheres.len() - 3];
        assert!(small
            .iter()
            .all(|s| s.radius == 0.2 && (s.center - keep_out).length() > 0.9));
    }

    #[test]
    fn test_random_scene_is_reproducible() {
        let a = random_scene(&mut RngStream::default());
        let b = random_scene(&mut RngStream::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_builtin_scene_parse() {
        assert_eq!("simple".parse::<BuiltinScene>(), Ok(BuiltinScene::Simple));
        assert_eq!("random".parse::<BuiltinScene>(), Ok(BuiltinScene::Random));
        assert!("cornell".parse::<BuiltinScene>().is_err());
        assert_eq!(BuiltinScene::Random.to_string(), "random");
    }

    #[test]
    fn test_simple_build_does_not_draw() {
        let mut rng = RngStream::default();
        let before = rng.clone();
        BuiltinScene::Simple.build(&mut rng);
        assert_eq!(rng, before);
    }
}
