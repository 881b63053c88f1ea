//! Coarse-to-fine progressive refinement.
//!
//! After the camera moves or the output is resized, the scene is traced at
//! a working resolution of `ceil(target / fragment_size)` with each traced
//! cell replicated over a `fragment_size` square of output pixels. Every
//! following frame halves the fragment size until a pass at size 1 has
//! traced every output pixel; after that nothing is rendered until the
//! next change.

use tracer_core::Scene;

use crate::{generate_bands, render_band, Camera, CameraPose, Framebuffer, Lcg, RenderConfig};

/// Fragment size used after every reset.
pub const DEFAULT_START_FRAGMENT_SIZE: u32 = 64;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Working resolution for a fragment size.
    pub fn div_ceil(&self, fragment_size: u32) -> Resolution {
        let fragment_size = fragment_size.max(1);
        Resolution::new(
            self.width.div_ceil(fragment_size),
            self.height.div_ceil(fragment_size),
        )
    }
}

/// Whether the image still has detail to gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Every output pixel has been traced for the current pose and target
    Settled,
    /// The last pass was coarse; the next frame renders a finer one
    Refining,
}

/// One render pass chosen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStep {
    pub fragment_size: u32,
    pub working: Resolution,
    pub target: Resolution,
    /// True when this pass restarts refinement after a change
    pub reset: bool,
}

/// Refinement state carried between frames.
#[derive(Debug, Clone)]
pub struct ProgressiveState {
    phase: Phase,
    fragment_size: u32,
    start_fragment_size: u32,
    target: Resolution,
    working: Resolution,
    pose: Option<CameraPose>,
}

impl ProgressiveState {
    /// Create a scheduler that restarts at `start_fragment_size` (at least 1).
    pub fn new(start_fragment_size: u32) -> Self {
        let start_fragment_size = start_fragment_size.max(1);
        Self {
            phase: Phase::Settled,
            fragment_size: start_fragment_size,
            start_fragment_size,
            target: Resolution::default(),
            working: Resolution::default(),
            pose: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn fragment_size(&self) -> u32 {
        self.fragment_size
    }

    pub fn target(&self) -> Resolution {
        self.target
    }

    pub fn working(&self) -> Resolution {
        self.working
    }

    /// Decide what to render this frame, if anything.
    ///
    /// A new target or pose restarts at the start fragment size; otherwise
    /// a refining state halves its fragment size and a settled one returns
    /// `None`. An empty target never renders.
    pub fn advance(&mut self, pose: CameraPose, target: Resolution) -> Option<FrameStep> {
        let reset = target != self.target || self.pose != Some(pose);

        if reset {
            self.target = target;
            self.pose = Some(pose);
            self.fragment_size = self.start_fragment_size;
            log::debug!(
                "Progressive reset: target {}x{}, fragment {}",
                target.width,
                target.height,
                self.fragment_size
            );
        } else {
            match self.phase {
                Phase::Settled => return None,
                Phase::Refining => self.fragment_size = (self.fragment_size / 2).max(1),
            }
        }

        if target.is_empty() {
            self.working = Resolution::default();
            self.phase = Phase::Settled;
            return None;
        }

        self.working = target.div_ceil(self.fragment_size);
        self.phase = if self.fragment_size == 1 {
            Phase::Settled
        } else {
            Phase::Refining
        };

        Some(FrameStep {
            fragment_size: self.fragment_size,
            working: self.working,
            target,
            reset,
        })
    }
}

impl Default for ProgressiveState {
    fn default() -> Self {
        Self::new(DEFAULT_START_FRAGMENT_SIZE)
    }
}

/// Render one pass into `framebuffer`, resizing it to the step's target.
///
/// `camera` must already be set to the target resolution.
pub fn render_pass(
    scene: &Scene,
    camera: &Camera,
    step: &FrameStep,
    config: &RenderConfig,
    rng: &mut Lcg,
    framebuffer: &mut Framebuffer,
) {
    framebuffer.resize(step.target.width, step.target.height);

    for band in generate_bands(step.working.height, config.band_height) {
        render_band(
            &band,
            step.working.width,
            step.fragment_size,
            scene,
            camera,
            config,
            rng,
            framebuffer,
        );
        log::trace!("Band {} done (rows {:?})", band.index, band.rows());
    }
}
