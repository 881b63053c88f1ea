//! Headless front end: renders a scene progressively and writes PNGs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracer_core::{load_scene, Preset, Scene};
use tracer_renderer::{
    FrameInput, Framebuffer, Jitter, LightingMode, Present, RenderConfig, Resolution, Session,
    Vec3,
};

/// Simulated frame time for scripted camera motion.
const FRAME_DT: f32 = 1.0 / 30.0;

/// Render a scene with the progressive raytracer
#[derive(Parser, Debug)]
#[command(name = "tracer", version, about)]
struct Cli {
    /// Scene description file (JSON). Overrides --preset.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Built-in scene to render when no file is given
    #[arg(short, long, value_enum, default_value_t = CliPreset::Showcase)]
    preset: CliPreset,

    /// Output width in pixels
    #[arg(
        short = 'W',
        long,
        default_value_t = 640,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    width: u32,

    /// Output height in pixels
    #[arg(
        short = 'H',
        long,
        default_value_t = 360,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    height: u32,

    /// Maximum number of frames to run; rendering also stops once the image settles
    #[arg(short, long, default_value_t = 64)]
    frames: u32,

    /// Lighting model
    #[arg(short, long, value_enum, default_value_t = CliLighting::Path)]
    lighting: CliLighting,

    /// Placement of sample rays within a cell
    #[arg(long, value_enum, default_value_t = CliJitter::Center)]
    jitter: CliJitter,

    /// Rays traced per working cell
    #[arg(short, long, default_value_t = 1)]
    samples: u32,

    /// Maximum ray bounce depth
    #[arg(short, long, default_value_t = 50)]
    depth: u32,

    /// Override the scene's random seed
    #[arg(long)]
    seed: Option<u32>,

    /// Fragment size used after every camera change
    #[arg(long, default_value_t = 64)]
    start_fragment: u32,

    /// Disable gamma correction
    #[arg(long)]
    no_gamma: bool,

    /// Camera velocity as x,y,z applied during the first --move-frames frames
    #[arg(long, value_delimiter = ',', num_args = 3, allow_negative_numbers = true)]
    velocity: Option<Vec<f32>>,

    /// Number of frames the scripted velocity is applied for
    #[arg(long, default_value_t = 0)]
    move_frames: u32,

    /// Where to save the final image
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Also save every presented frame into this directory
    #[arg(long)]
    frame_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPreset {
    Showcase,
    Lens,
    SphereOnPlane,
}

impl From<CliPreset> for Preset {
    fn from(p: CliPreset) -> Self {
        match p {
            CliPreset::Showcase => Preset::Showcase,
            CliPreset::Lens => Preset::Lens,
            CliPreset::SphereOnPlane => Preset::SphereOnPlane,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLighting {
    /// Recursive material scattering
    Path,
    /// Sun and ambient with hard shadows
    Shadow,
}

impl From<CliLighting> for LightingMode {
    fn from(l: CliLighting) -> Self {
        match l {
            CliLighting::Path => LightingMode::PathTrace,
            CliLighting::Shadow => LightingMode::ShadowTest,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliJitter {
    Center,
    Pattern,
    Random,
}

impl From<CliJitter> for Jitter {
    fn from(j: CliJitter) -> Self {
        match j {
            CliJitter::Center => Jitter::Center,
            CliJitter::Pattern => Jitter::Pattern,
            CliJitter::Random => Jitter::Random,
        }
    }
}

/// Presenter that optionally writes each frame to disk.
struct FrameSink {
    dir: Option<PathBuf>,
    presented: u32,
    error: Option<anyhow::Error>,
}

impl FrameSink {
    fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            presented: 0,
            error: None,
        }
    }
}

impl Present for FrameSink {
    fn present(&mut self, framebuffer: &Framebuffer) {
        self.presented += 1;

        let Some(dir) = &self.dir else {
            return;
        };
        if self.error.is_some() {
            return;
        }

        let path = dir.join(format!("frame_{:04}.png", self.presented));
        if let Err(e) = save_png(framebuffer, &path) {
            self.error = Some(e);
        }
    }
}

fn save_png(framebuffer: &Framebuffer, path: &Path) -> Result<()> {
    let (width, height) = (framebuffer.width, framebuffer.height);
    let image = image::RgbaImage::from_raw(width, height, framebuffer.to_rgba())
        .context("Framebuffer size does not match its pixel data")?;
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn build_scene(cli: &Cli) -> Result<Scene> {
    let mut scene = match &cli.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => Preset::from(cli.preset).build(),
    };

    if let Some(seed) = cli.seed {
        scene.seed = seed;
    }

    Ok(scene)
}

fn scripted_velocity(cli: &Cli) -> Result<Vec3> {
    match cli.velocity.as_deref() {
        None => Ok(Vec3::ZERO),
        Some(&[x, y, z]) => Ok(Vec3::new(x, y, z)),
        Some(other) => bail!("--velocity takes three components, got {}", other.len()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let scene = build_scene(&cli)?;
    let velocity = scripted_velocity(&cli)?;

    if let Some(dir) = &cli.frame_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let config = RenderConfig {
        samples_per_cell: cli.samples,
        max_depth: cli.depth,
        lighting: cli.lighting.into(),
        jitter: cli.jitter.into(),
        gamma: !cli.no_gamma,
        start_fragment_size: cli.start_fragment,
        ..RenderConfig::default()
    };

    let mut session = Session::new(scene, config);
    let mut sink = FrameSink::new(cli.frame_dir.clone());
    let target = Resolution::new(cli.width, cli.height);

    for frame in 0..cli.frames {
        let moving = frame < cli.move_frames;
        let input = FrameInput {
            displacement: if moving { velocity } else { Vec3::ZERO },
            dt: FRAME_DT,
        };

        let report = session.tick(input, target, &mut sink);
        if report.is_none() && !moving {
            log::info!("Image settled after {} frames", frame);
            break;
        }
    }

    if let Some(e) = sink.error.take() {
        return Err(e);
    }

    save_png(session.framebuffer(), &cli.output)?;
    log::info!(
        "Wrote {}x{} image to {} ({} passes)",
        cli.width,
        cli.height,
        cli.output.display(),
        sink.presented
    );

    Ok(())
}
