//! Thin-lens camera for ray generation.

use ember_core::CameraSettings;
use ember_math::{Point3, RngStream, Vec3, VecExt};

use crate::Ray;

/// Camera for generating rays into the scene.
///
/// Configure with the `with_*` methods, then call [`Camera::initialize`]
/// once; the camera is read-only while rendering.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Point3,
    look_at: Point3,
    vup: Vec3,

    // Lens settings
    vfov: f64,           // Vertical field of view in degrees
    aspect_ratio: f64,   // Viewport width over height
    aperture: f64,       // Lens diameter
    focus_dist: f64,     // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
            origin: Point3::ZERO,
            lower_left_corner: Point3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            lens_radius: 0.0,
        }
    }

    /// Build an initialized camera from scene settings.
    pub fn from_settings(settings: &CameraSettings, aspect_ratio: f64) -> Self {
        let mut camera = Camera::new()
            .with_position(settings.look_from, settings.look_at, settings.vup)
            .with_lens(settings.vfov, settings.aperture, settings.focus_distance)
            .with_aspect_ratio(aspect_ratio);
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, aperture: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the viewport aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).unit_vector();
        self.u = self.vup.cross(self.w).unit_vector();
        self.v = self.w.cross(self.u);

        self.origin = self.look_from;
        self.horizontal = self.focus_dist * viewport_width * self.u;
        self.vertical = self.focus_dist * viewport_height * self.v;
        self.lower_left_corner =
            self.origin - self.horizontal / 2.0 - self.vertical / 2.0 - self.focus_dist * self.w;

        self.lens_radius = self.aperture / 2.0;
    }

    /// Generate a ray through normalized image coordinates `(s, t)`.
    ///
    /// `(0, 0)` is the lower-left corner of the image plane and `(1, 1)` the
    /// upper-right. The origin is jittered over the lens disk, and the
    /// direction corrected so all lens positions converge at the focus plane.
    /// One lens sample is drawn even for a pinhole camera.
    pub fn get_ray(&self, rng: &mut RngStream, s: f64, t: f64) -> Ray {
        let rd = self.lens_radius * rng.random_in_unit_disk();
        let offset = self.u * rd.x + self.v * rd.y;

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin - offset,
        )
    }

    /// Camera position.
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Lens radius (half the aperture).
    pub fn lens_radius(&self) -> f64 {
        self.lens_radius
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
