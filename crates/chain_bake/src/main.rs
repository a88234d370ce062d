//! Hanging chain mesh baker.
//!
//! Runs chains through the same renderer and model cache a game would use and
//! writes the emitted vertices out for inspection in a modelling tool.
//!
//! Chains come from the `[[chains]]` table of the config file (world-space
//! anchors) and from `--displacement` arguments (rendered from the origin).

mod config;
mod export;

use anyhow::{Context, Result};
use chain_mesh::{chain_transform, BakeKey, ChainRenderer, LightLevel, ModelCache};
use clap::Parser;
use glam::Vec3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::Level;

use config::Config;
use export::Format;

/// Hanging chain mesh baker.
#[derive(Parser, Debug)]
#[command(name = "chain_bake")]
#[command(about = "Bakes hanging chain meshes to OBJ or JSON")]
struct Args {
	/// Path to configuration TOML file.
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Extra chain as DX,DY,DZ from the origin (NaN,DY,NaN for vertical). Repeatable.
	#[arg(short, long, value_parser = parse_displacement, allow_hyphen_values = true)]
	displacement: Vec<Vec3>,

	/// Output file (default: stdout).
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Output format.
	#[arg(short, long, value_enum, default_value_t = Format::Obj)]
	format: Format,

	/// Log verbosity (-v debug, -vv trace).
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

fn parse_displacement(s: &str) -> Result<Vec3, String> {
	let parts: Vec<&str> = s.split(',').map(str::trim).collect();
	let [x, y, z] = parts[..] else {
		return Err(format!("expected DX,DY,DZ, got {:?}", s));
	};
	let parse = |v: &str| {
		v.parse::<f32>()
			.map_err(|e| format!("invalid component {:?}: {}", v, e))
	};
	Ok(Vec3::new(parse(x)?, parse(y)?, parse(z)?))
}

fn main() -> Result<()> {
	let args = Args::parse();

	let level = match args.verbose {
		0 => Level::INFO,
		1 => Level::DEBUG,
		_ => Level::TRACE,
	};
	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_writer(std::io::stderr)
		.init();

	let config = match &args.config {
		Some(path) => {
			tracing::info!(path = %path.display(), "loading config");
			Config::load(path)?
		}
		None => Config::default(),
	};

	if config.chains.is_empty() && args.displacement.is_empty() {
		anyhow::bail!("Nothing to bake: pass --config with [[chains]] or --displacement");
	}

	let cache = ModelCache::new(config.mesh.chain_config())
		.context("Invalid mesh configuration")?
		.with_diagnostics(config.diagnostics.cache_diagnostics());
	let renderer = ChainRenderer::with_cache(cache);

	let mut vertices = Vec::new();
	let mut quads = 0;

	for chain in &config.chains {
		let (light0, light1) = chain.lights();
		let model = renderer.render_between(&mut vertices, chain.start(), chain.end(), light0, light1);
		quads += model.quad_count();
	}

	for &displacement in &args.displacement {
		let key = BakeKey::from_displacement(displacement);
		let transform = chain_transform(Vec3::ZERO, displacement);
		let model = renderer.render_baked(
			&mut vertices,
			&transform,
			&key,
			displacement,
			LightLevel::FULL,
			LightLevel::FULL,
		);
		quads += model.quad_count();
	}

	let mut out: Box<dyn Write> = match &args.output {
		Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
			format!("Failed to create output file: {}", path.display())
		})?)),
		None => Box::new(BufWriter::new(std::io::stdout().lock())),
	};
	export::write(args.format, &mut *out, &vertices)?;

	let cache = renderer.cache();
	let metrics = cache.metrics();
	eprintln!(
		"Baked {} chains: {} quads, {} cached models, {} builds (hit rate {:.1}%, avg build {:.0}us)",
		config.chains.len() + args.displacement.len(),
		quads,
		cache.len(),
		cache.builds(),
		metrics.hit_rate() * 100.0,
		metrics.avg_build_timing_us()
	);
	if let Some(path) = &args.output {
		eprintln!("Output written to: {}", path.display());
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_displacement() {
		assert_eq!(
			parse_displacement("3,-2,0").unwrap(),
			Vec3::new(3.0, -2.0, 0.0)
		);
		assert_eq!(
			parse_displacement(" 1.5, 0 ,-4 ").unwrap(),
			Vec3::new(1.5, 0.0, -4.0)
		);

		let vertical = parse_displacement("NaN,-5,NaN").unwrap();
		assert!(vertical.x.is_nan() && vertical.z.is_nan());
		assert_eq!(vertical.y, -5.0);

		assert!(parse_displacement("1,2").is_err());
		assert!(parse_displacement("1,2,3,4").is_err());
		assert!(parse_displacement("1,x,3").is_err());
	}

	#[test]
	fn test_args_parse() {
		let args = Args::try_parse_from([
			"chain_bake",
			"-d",
			"-3,2,1",
			"--displacement",
			"4,0,0",
			"--format",
			"json",
			"-vv",
		])
		.unwrap();

		assert_eq!(args.displacement.len(), 2);
		assert_eq!(args.displacement[0], Vec3::new(-3.0, 2.0, 1.0));
		assert_eq!(args.format, Format::Json);
		assert_eq!(args.verbose, 2);
		assert!(args.config.is_none());
	}
}
