// Headless driver for the optics engine.
// Run with:
//   cargo run --release -p spectra_cli -- \
//       [--config cfg.json] [--frames N] [--parallel] [--dump out.json]

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use spectra_core::{BodyHandle, Shape, World};
use spectra_math::{Pose, Vec2};
use spectra_optics::{
    FrameDriver, LaserEmitter, OpticsBackend, Spectrum, TraceConfig, Tracer,
};

/// Command line options
struct Options {
    config: Option<PathBuf>,
    frames: usize,
    parallel: bool,
    dump: Option<PathBuf>,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = Options {
            config: None,
            frames: 60,
            parallel: false,
            dump: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    options.config = Some(args.next().context("--config needs a path")?.into());
                }
                "--frames" => {
                    let value = args.next().context("--frames needs a count")?;
                    options.frames = value
                        .parse()
                        .with_context(|| format!("invalid frame count '{value}'"))?;
                }
                "--parallel" => options.parallel = true,
                "--dump" => {
                    options.dump = Some(args.next().context("--dump needs a path")?.into());
                }
                "-h" | "--help" => {
                    println!("Usage: spectra_cli [--config <file.json>] [--frames N]");
                    println!("                   [--parallel] [--dump <file.json>]");
                    std::process::exit(0);
                }
                other => bail!("unknown argument '{other}'"),
            }
        }

        Ok(options)
    }
}

/// Demo scene: a lens, a mirror, a prism and a turntable carrying a laser.
struct DemoScene {
    world: World,
    turntable: BodyHandle,
}

impl DemoScene {
    fn build() -> Result<Self> {
        let mut world = World::new();

        let lens = world.add_static_collider(Shape::circle(Vec2::new(500.0, 0.0), 50.0)?);
        world.set_transparency(lens, Some(0.5))?;

        let mirror = world.add_static_collider(Shape::rect(
            Vec2::new(-300.0, -200.0),
            Vec2::new(-290.0, 200.0),
        )?);
        world.set_transparency(mirror, Some(0.0))?;

        world.add_static_collider(Shape::polygon(vec![
            Vec2::new(200.0, 250.0),
            Vec2::new(300.0, 250.0),
            Vec2::new(250.0, 336.6),
        ])?);

        let turntable = world.add_body(Pose::new(Vec2::new(0.0, 300.0), 0.0));
        world.add_collider(turntable, Shape::circle(Vec2::ZERO, 10.0)?)?;

        Ok(Self { world, turntable })
    }

    /// Advance the turntable for frame `n`.
    fn step(&mut self, n: usize) -> Result<()> {
        let angle = -0.4 + 0.01 * n as f32;
        self.world
            .set_body_pose(self.turntable, Pose::new(Vec2::new(0.0, 300.0), angle))?;
        Ok(())
    }
}

/// One segment as written by `--dump`.
#[derive(Serialize)]
struct SegmentRecord {
    emitter: usize,
    start: [f32; 2],
    end: [f32; 2],
    wavelength: f32,
    intensity: f32,
    rgb: [u8; 3],
}

fn dump(path: &Path, emitters: &[LaserEmitter], backend: &dyn OpticsBackend) -> Result<()> {
    let records: Vec<SegmentRecord> = emitters
        .iter()
        .enumerate()
        .flat_map(|(i, emitter)| {
            emitter.traced().iter().map(move |s| SegmentRecord {
                emitter: i,
                start: s.start.to_array(),
                end: s.end.to_array(),
                wavelength: s.wavelength,
                intensity: s.intensity,
                rgb: s.color(backend),
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote {} segments to {}", records.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let options = Options::parse(std::env::args().skip(1))?;

    let config = match &options.config {
        Some(path) => TraceConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TraceConfig::default(),
    };

    let mut scene = DemoScene::build()?;
    let driver = FrameDriver::new(Tracer::new(config.clone())?);
    let backend = driver.tracer().backend();

    // Fixed green laser aimed at the lens, plus white light riding the turntable
    let mut emitters = vec![LaserEmitter::new(
        Vec2::new(0.0, 0.0),
        0.0,
        1500.0,
        Spectrum::monochromatic(532.0, 1.0)?,
    )?];
    let mut white = LaserEmitter::new(
        Vec2::new(0.0, 300.0),
        0.0,
        1500.0,
        config.default_spectrum()?,
    )?;
    white.attach_with_offset(scene.turntable, Vec2::new(12.0, 0.0), 0.0);
    emitters.push(white);

    log::info!(
        "Tracing {} emitter(s) for {} frame(s) with the {} backend",
        emitters.len(),
        options.frames,
        backend.name()
    );

    let start = Instant::now();
    let mut segments = 0;
    for frame in 0..options.frames {
        scene.step(frame)?;
        let stats = if options.parallel {
            driver.update_parallel(&mut emitters, &scene.world)
        } else {
            driver.update(&mut emitters, &scene.world)
        };
        segments += stats.segments;
        if stats.truncated > 0 {
            log::debug!("Frame {}: {} truncated trace(s)", frame, stats.truncated);
        }
    }
    let elapsed = start.elapsed();

    log::info!(
        "{} segments in {:.2?} ({:.1} frames/s)",
        segments,
        elapsed,
        options.frames as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    if let Some(path) = &options.dump {
        dump(path, &emitters, backend)?;
    }

    Ok(())
}
