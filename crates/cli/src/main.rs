#![deny(unsafe_code)]
//! CLI binary for the wavefield system.
//!
//! Subcommands:
//! - `run` runs a command script against a scene and prints the feedback
//! - `render` samples the field and writes a grayscale PNG
//! - `simulate` spawns particles and advances the scene N ticks
//! - `modes` lists blend and map modes

mod error;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use glam::Vec2;
use tracing::info;
use wavefield_core::{BlendMode, MapMode, RunSettings, Scene, SceneConfig};

use error::CliError;

#[derive(Parser)]
#[command(name = "wavefield", about = "Interactive 2D wave-source field")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a command script and print its feedback.
    Run {
        /// Scene config to start from (JSON). Defaults to the two-source scene.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Script text, statements separated by ';' or newlines.
        #[arg(short, long, conflicts_with = "file")]
        script: Option<String>,

        /// Read the script from a file.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Write the resulting scene config here.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Sample the field and write a grayscale PNG.
    Render {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        script: Option<String>,

        /// Image width in pixels.
        #[arg(short = 'W', long, default_value_t = 256)]
        width: usize,

        /// Image height in pixels.
        #[arg(short = 'H', long, default_value_t = 256)]
        height: usize,

        /// Blend mode override (add, subtract, multiply, normalize, min, max, average).
        #[arg(short, long)]
        mode: Option<String>,

        /// Map [-1, 1] onto [0, 1] before writing.
        #[arg(long)]
        remap: bool,

        /// Divide by the amplitude envelope.
        #[arg(long)]
        envelope: bool,

        /// Run settings as a JSON object. Only `envelope` applies here.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Output file path.
        #[arg(short, long, default_value = "field.png")]
        output: PathBuf,
    },
    /// Spawn particles and advance the scene, then print particle states.
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        script: Option<String>,

        /// Particle spawn point as `x,y`. Repeatable.
        #[arg(long = "spawn", value_parser = parse_point, required = true)]
        spawn: Vec<Vec2>,

        /// Run settings as a JSON object: dt, ticks.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List blend and map modes.
    Modes,
}

/// Parses `x,y` into a point.
fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| format!("invalid coordinate {v:?} in {s:?}"))
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}

fn load_scene(config: Option<&Path>) -> Result<Scene, CliError> {
    match config {
        Some(path) => {
            let config = SceneConfig::load(path)?;
            info!(path = %path.display(), sources = config.sources.len(), "scene loaded");
            Ok(Scene::from_config(&config)?)
        }
        None => Ok(Scene::default()),
    }
}

fn read_script(script: Option<String>, file: Option<&Path>) -> Result<String, CliError> {
    match (script, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display()))),
        (None, None) => Ok(String::new()),
    }
}

/// Reads a `--params` object into run settings.
fn parse_settings(params: &str) -> Result<RunSettings, CliError> {
    let value: serde_json::Value = serde_json::from_str(params).map_err(CliError::bad_params)?;
    Ok(RunSettings::from_json(&value))
}

/// Applies `render`'s mode flags and settings on top of the scene's own.
/// The envelope is on if either the flag or `settings` asks for it.
fn apply_render_options(
    scene: &mut Scene,
    mode: Option<&str>,
    remap: bool,
    envelope: bool,
    settings: &RunSettings,
) -> Result<(), CliError> {
    if let Some(mode) = mode {
        scene.blend_mode = mode.parse::<BlendMode>()?;
    }
    if remap {
        scene.set_map_mode(MapMode::Remap);
    }
    scene.options.envelope |= envelope || settings.envelope;
    Ok(())
}

/// Interpreter feedback for `render` and `simulate` goes to stderr. Their
/// stdout carries the command's result (the JSON report or particle
/// states). For `run` the feedback is the result, so it prints to stdout.
fn print_feedback(feedback: &[String]) {
    for line in feedback {
        eprintln!("{line}");
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Modes => {
            let blend = BlendMode::names();
            let map = [MapMode::Clip.name(), MapMode::Remap.name()];
            if cli.json {
                let info = serde_json::json!({"blend_modes": blend, "map_modes": map});
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Blend modes:");
                for mode in BlendMode::ALL {
                    println!("  {} {mode}", mode.code());
                }
                println!("Map modes:");
                println!("  {}", map.join(", "));
            }
        }
        Command::Run {
            config,
            script,
            file,
            save,
        } => {
            let mut scene = load_scene(config.as_deref())?;
            let script = read_script(script, file.as_deref())?;
            let feedback = scene.run(&script);

            if let Some(path) = &save {
                scene.to_config().save(path)?;
                info!(path = %path.display(), "scene saved");
            }

            if cli.json {
                let info = serde_json::json!({
                    "feedback": feedback,
                    "scene": scene.to_config(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for line in &feedback {
                    println!("{line}");
                }
            }
        }
        Command::Render {
            config,
            script,
            width,
            height,
            mode,
            remap,
            envelope,
            params,
            output,
        } => {
            let settings = parse_settings(&params)?;
            let mut scene = load_scene(config.as_deref())?;
            let feedback = scene.run(script.as_deref().unwrap_or_default());
            apply_render_options(&mut scene, mode.as_deref(), remap, envelope, &settings)?;

            let field = scene.sample(width, height)?;
            wavefield_snapshot::write_png(&field, &output)?;
            let (lo, hi) = field.range();

            if cli.json {
                let info = serde_json::json!({
                    "width": width,
                    "height": height,
                    "blend_mode": scene.blend_mode,
                    "map_mode": scene.options.map,
                    "envelope": scene.options.envelope,
                    "min": lo,
                    "max": hi,
                    "feedback": feedback,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_feedback(&feedback);
                eprintln!(
                    "rendered {} ({width}x{height}, range {lo:.3}..{hi:.3}) -> {}",
                    scene.blend_mode,
                    output.display()
                );
            }
        }
        Command::Simulate {
            config,
            script,
            spawn,
            params,
        } => {
            let settings = parse_settings(&params)?;

            let mut scene = load_scene(config.as_deref())?;
            let feedback = scene.run(script.as_deref().unwrap_or_default());
            for point in spawn {
                scene.spawn_particle(point);
            }
            for _ in 0..settings.ticks {
                scene.tick(settings.dt);
            }
            info!(ticks = settings.ticks, dt = settings.dt, "simulation finished");

            let particles = scene.particles().particles();
            if cli.json {
                let states: Vec<_> = particles
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "position": [p.position.x, p.position.y],
                            "velocity": [p.velocity.x, p.velocity.y],
                        })
                    })
                    .collect();
                let info = serde_json::json!({
                    "ticks": settings.ticks,
                    "dt": settings.dt,
                    "particles": states,
                    "feedback": feedback,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_feedback(&feedback);
                for (i, p) in particles.iter().enumerate() {
                    println!(
                        "{i}: pos ({:.5}, {:.5}) vel ({:.5}, {:.5})",
                        p.position.x, p.position.y, p.velocity.x, p.velocity.y
                    );
                }
            }
        }
    }

    Ok(())
}

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
