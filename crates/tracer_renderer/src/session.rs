//! Frame driver tying the scene, camera, scheduler and output together.

use std::time::{Duration, Instant};

use tracer_core::Scene;
use tracer_math::Vec3;

use crate::{
    render_pass, Camera, FrameStep, Framebuffer, Lcg, ProgressiveState, RenderConfig, Resolution,
};

/// Per-frame input from whatever drives the session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Movement direction in world space; scaled by camera speed and `dt`
    pub displacement: Vec3,
    /// Seconds since the previous frame
    pub dt: f32,
}

/// Receives the framebuffer after every rendered pass.
pub trait Present {
    fn present(&mut self, framebuffer: &Framebuffer);
}

impl<F: FnMut(&Framebuffer)> Present for F {
    fn present(&mut self, framebuffer: &Framebuffer) {
        self(framebuffer)
    }
}

/// What a rendered frame did.
#[derive(Debug, Clone, Copy)]
pub struct FrameReport {
    pub frame: u64,
    pub step: FrameStep,
    pub elapsed: Duration,
}

/// A scene being viewed, with everything that changes from frame to frame.
pub struct Session {
    scene: Scene,
    camera: Camera,
    progressive: ProgressiveState,
    rng: Lcg,
    framebuffer: Framebuffer,
    config: RenderConfig,
    frame: u64,
}

impl Session {
    /// Start viewing `scene` from its initial camera.
    ///
    /// # Panics
    ///
    /// Panics if the scene fails validation.
    pub fn new(scene: Scene, config: RenderConfig) -> Self {
        if let Err(e) = scene.validate() {
            panic!("invalid scene '{}': {}", scene.name, e);
        }

        let camera = Camera::from_settings(&scene.camera);
        let rng = Lcg::new(scene.seed);
        let progressive = ProgressiveState::new(config.start_fragment_size);

        log::info!(
            "Session started: scene '{}' ({} entities, {:?} lighting)",
            scene.name,
            scene.entity_count(),
            config.lighting
        );

        Self {
            scene,
            camera,
            progressive,
            rng,
            framebuffer: Framebuffer::new(0, 0),
            config,
            frame: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn progressive(&self) -> &ProgressiveState {
        &self.progressive
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Run one frame: apply input, let the scheduler pick a pass, render it
    /// and hand the framebuffer to `presenter`.
    ///
    /// Returns `None` when the image is settled and nothing was rendered.
    pub fn tick(
        &mut self,
        input: FrameInput,
        target: Resolution,
        presenter: &mut dyn Present,
    ) -> Option<FrameReport> {
        let movement = input.displacement * self.camera.speed * input.dt;
        self.camera.translate(movement);
        self.camera.set_resolution(target.width, target.height);

        let step = self.progressive.advance(self.camera.pose(), target)?;

        let start = Instant::now();
        render_pass(
            &self.scene,
            &self.camera,
            &step,
            &self.config,
            &mut self.rng,
            &mut self.framebuffer,
        );
        let elapsed = start.elapsed();

        presenter.present(&self.framebuffer);

        self.frame += 1;
        log::debug!(
            "Frame {}: fragment {} ({}x{} cells) in {:.2}ms",
            self.frame,
            step.fragment_size,
            step.working.width,
            step.working.height,
            elapsed.as_secs_f64() * 1000.0
        );

        Some(FrameReport {
            frame: self.frame,
            step,
            elapsed,
        })
    }
}
