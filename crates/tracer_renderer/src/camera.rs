//! Camera for ray generation.

use tracer_core::CameraSettings;
use tracer_math::{Ray, Vec3};

/// Default movement speed in world units per second.
pub const DEFAULT_SPEED: f32 = 2.0;

/// Where the camera is and what it looks at. The scheduler restarts
/// refinement whenever this changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Camera for generating rays into the scene.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    vfov: f32, // Vertical field of view in degrees

    /// Units per second applied to movement input
    pub speed: f32,

    // Cached computed values (set by initialize())
    upper_left: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            speed: DEFAULT_SPEED,
            // Cached values (initialized to defaults)
            upper_left: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        }
    }

    /// Camera placed by a scene's initial settings, ready to generate rays.
    pub fn from_settings(settings: &CameraSettings) -> Self {
        let mut camera = Self::new()
            .with_position(settings.position, settings.look_at, settings.up)
            .with_vfov(settings.vfov);
        camera.initialize();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_vfov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Change the output resolution and rebuild the viewport if it differs.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        if (width, height) != (self.image_width, self.image_height) {
            self.image_width = width;
            self.image_height = height;
            self.initialize();
        }
    }

    /// Initialize the camera (must be called before generating rays).
    ///
    /// # Panics
    ///
    /// Panics if the eye and target coincide or the view direction is
    /// parallel to the up vector.
    pub fn initialize(&mut self) {
        let width = self.image_width.max(1) as f32;
        let height = self.image_height.max(1) as f32;

        // Calculate viewport dimensions on a plane one unit in front of the eye
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * (width / height);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);
        assert!(
            self.u.is_finite() && self.w.is_finite(),
            "degenerate camera basis: look_from {} look_at {} up {}",
            self.look_from,
            self.look_at,
            self.vup
        );

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / width;
        self.pixel_delta_v = viewport_v / height;

        self.upper_left = self.look_from - self.w - viewport_u / 2.0 - viewport_v / 2.0;
    }

    /// Normalized ray through continuous output-pixel coordinates, with
    /// (0, 0) at the top-left corner of the image.
    pub fn ray_through(&self, px: f32, py: f32) -> Ray {
        let target = self.upper_left + px * self.pixel_delta_u + py * self.pixel_delta_v;
        Ray::normalized(self.look_from, target - self.look_from)
    }

    /// Move the eye and its target together.
    pub fn translate(&mut self, displacement: Vec3) {
        if displacement != Vec3::ZERO {
            self.look_from += displacement;
            self.look_at += displacement;
            self.initialize();
        }
    }

    /// Current pose.
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.look_from,
            look_at: self.look_at,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
