//! Frame export CLI Utility
//!
//! Looks frames up in a client install and writes them as PNG images.
//!
//! # Features
//!
//! - **frame**: Export one frame of a UOP animation
//! - **body**: Export one frame of a legacy `anim*.mul` body
//! - **art**: Export the static art of an item
//! - **actions**: List the actions present in the UOP archives
//!
//! # Usage
//!
//! ```bash
//! # Frame 0 of body 400, action 0, direction 2
//! cargo run --example frame_export -- -c /games/uo frame 400 -d 2
//!
//! # Same body from the legacy files, hued
//! cargo run --example frame_export -- -c /games/uo body 400 --hue 33
//!
//! # Client files from a settings file
//! cargo run --example frame_export -- -s uoanim.toml actions 400
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::info;
use uoanim_rs::prelude::*;

#[derive(Parser)]
#[command(name = "frame_export")]
#[command(version = "1.0")]
#[command(about = "Export Ultima Online animation frames and item art to PNG", long_about = None)]
struct Cli {
	/// Client directory
	#[arg(short, long, value_name = "CLIENT_DIR", env = "UOANIM_CLIENT_DIR")]
	client_dir: Option<PathBuf>,

	/// TOML settings file, used instead of the client directory
	#[arg(short, long, value_name = "SETTINGS")]
	settings: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Export a frame from the UOP archives
	Frame {
		/// Animation (body) id
		anim: u32,

		/// Action, replaced by the first available one when missing
		#[arg(short, long, default_value_t = 0)]
		action: i32,

		/// Direction (0-4)
		#[arg(short, long, default_value_t = 0)]
		direction: u32,

		/// Frame within the direction
		#[arg(short, long, default_value_t = 0)]
		frame: u32,

		/// Hue id, 0 for none
		#[arg(long, default_value_t = 0)]
		hue: u16,

		/// Output PNG (defaults to `anim_<ID>_<ACTION>_<DIRECTION>_<FRAME>.png`)
		#[arg(short, long, value_name = "OUTPUT")]
		output: Option<PathBuf>,
	},

	/// Export a frame from the legacy animation files
	Body {
		/// Body id
		body: u16,

		/// Action
		#[arg(short, long, default_value_t = 0)]
		action: u32,

		/// Direction (0-4)
		#[arg(short, long, default_value_t = 0)]
		direction: u32,

		/// Hue id, 0 for none
		#[arg(long, default_value_t = 0)]
		hue: u16,

		/// Output PNG (defaults to `body_<ID>_<ACTION>_<DIRECTION>.png`)
		#[arg(short, long, value_name = "OUTPUT")]
		output: Option<PathBuf>,
	},

	/// Export the static art of an item
	Art {
		/// Item id
		item: u32,

		/// Hue id, 0 for none
		#[arg(long, default_value_t = 0)]
		hue: u16,

		/// Output PNG (defaults to `art_<ID>.png`)
		#[arg(short, long, value_name = "OUTPUT")]
		output: Option<PathBuf>,
	},

	/// List the actions of an animation, or of every animation up to `--max`
	Actions {
		/// Animation id
		anim: Option<u32>,

		/// Highest animation id scanned without `ANIM`
		#[arg(long, default_value_t = 2048)]
		max: u32,
	},
}

fn client_files(cli: &Cli) -> anyhow::Result<ClientFiles> {
	if let Some(settings) = &cli.settings {
		let settings = ClientSettings::from_toml(settings)
			.with_context(|| format!("Cannot load settings {}", settings.display()))?;
		return Ok(settings.resolve());
	}
	match &cli.client_dir {
		Some(dir) => Ok(ClientFiles::from_dir(dir)),
		None => bail!("Either --client-dir or --settings is required"),
	}
}

fn save(image: image::RgbaImage, path: &Path) -> anyhow::Result<()> {
	image.save(path).with_context(|| format!("Cannot write {}", path.display()))?;
	println!("{}x{} -> {}", image.width(), image.height(), path.display());
	Ok(())
}

fn main() -> anyhow::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let files = client_files(&cli)?;
	let mut service = AnimationLookupService::from_client_files(&files);
	info!("{service}");

	match cli.command {
		Commands::Frame {
			anim,
			action,
			direction,
			frame,
			hue,
			output,
		} => {
			let Some(decoded) = service.get_frame(anim, action, direction, frame, hue) else {
				bail!("No frame {frame} for animation {anim}, action {action}, direction {direction}");
			};
			let output =
				output.unwrap_or_else(|| PathBuf::from(format!("anim_{anim}_{action}_{direction}_{frame}.png")));
			println!(
				"Center ({}, {}), {} of {} pixels drawn",
				decoded.header.center_x,
				decoded.header.center_y,
				decoded.image.covered_count(),
				decoded.image.pixel_count()
			);
			save(decoded.to_rgba_image(), &output)
		}
		Commands::Body {
			body,
			action,
			direction,
			hue,
			output,
		} => {
			let Some(decoded) = service.get_body_animation(body, action, direction, hue) else {
				bail!("No legacy frame for body {body}, action {action}, direction {direction}");
			};
			let output = output.unwrap_or_else(|| PathBuf::from(format!("body_{body}_{action}_{direction}.png")));
			save(decoded.to_rgba_image(), &output)
		}
		Commands::Art {
			item,
			hue,
			output,
		} => {
			let Some(art) = service.get_art(item) else {
				bail!("No art for item {item}");
			};
			let output = output.unwrap_or_else(|| PathBuf::from(format!("art_{item}.png")));
			save(art.to_rgba_image(service.hues(), hue), &output)
		}
		Commands::Actions {
			anim,
			max,
		} => {
			if !service.has_frame_archives() {
				bail!("No AnimationFrame*.uop found");
			}
			match anim {
				Some(anim) => {
					for action in service.discover_actions(anim) {
						println!("{action:3}: directions {:?}", service.available_directions(anim, action));
					}
				}
				None => {
					for (anim, actions) in service.discover_all_animations(max) {
						println!("{anim:5}: {actions:?}");
					}
				}
			}
			Ok(())
		}
	}
}
