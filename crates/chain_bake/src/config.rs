//! Configuration parsing for chain baking.

use anyhow::{Context, Result};
use chain_mesh::{CacheDiagnostics, ChainConfig, LightLevel, UvRect};
use glam::DVec3;
use serde::Deserialize;
use std::path::Path;

/// Root configuration. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Mesh settings handed to the builder.
	#[serde(default)]
	pub mesh: MeshSection,
	/// Cache leak diagnostic.
	#[serde(default)]
	pub diagnostics: DiagnosticsSection,
	/// Chains to bake.
	#[serde(default)]
	pub chains: Vec<ChainEntry>,
}

/// `[mesh]` section, mirroring [`ChainConfig`].
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshSection {
	/// Segments per block.
	pub quality: f32,
	/// Catenary constant; larger hangs flatter.
	pub hang_amount: f64,
	/// Width and texture repeat scale.
	pub chain_scale: f32,
	/// Face A texture rectangle [x0, x1, y0, y1] in texels.
	pub side_a: [f32; 4],
	/// Face B texture rectangle [x0, x1, y0, y1] in texels.
	pub side_b: [f32; 4],
}

impl Default for MeshSection {
	fn default() -> Self {
		let defaults = ChainConfig::default();
		let rect = |r: UvRect| [r.x0, r.x1, r.y0, r.y1];
		Self {
			quality: defaults.quality,
			hang_amount: defaults.hang_amount,
			chain_scale: defaults.chain_scale,
			side_a: rect(defaults.side_a),
			side_b: rect(defaults.side_b),
		}
	}
}

impl MeshSection {
	/// Convert to the builder configuration (unvalidated).
	pub fn chain_config(&self) -> ChainConfig {
		let rect = |[x0, x1, y0, y1]: [f32; 4]| UvRect::new(x0, x1, y0, y1);
		ChainConfig::default()
			.with_quality(self.quality)
			.with_hang_amount(self.hang_amount)
			.with_chain_scale(self.chain_scale)
			.with_sides(rect(self.side_a), rect(self.side_b))
	}
}

/// `[diagnostics]` section.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsSection {
	pub enabled: bool,
	pub leak_threshold: usize,
}

impl Default for DiagnosticsSection {
	fn default() -> Self {
		let defaults = CacheDiagnostics::default();
		Self {
			enabled: defaults.enabled,
			leak_threshold: defaults.leak_threshold,
		}
	}
}

impl DiagnosticsSection {
	pub fn cache_diagnostics(&self) -> CacheDiagnostics {
		CacheDiagnostics {
			enabled: self.enabled,
			leak_threshold: self.leak_threshold,
		}
	}
}

/// One `[[chains]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainEntry {
	/// Start anchor in world space.
	pub start: [f64; 3],
	/// End anchor in world space.
	pub end: [f64; 3],
	/// Light [block, sky] at the start and end anchors (default: fully lit).
	pub light: Option<[[u8; 2]; 2]>,
}

impl ChainEntry {
	pub fn start(&self) -> DVec3 {
		DVec3::from_array(self.start)
	}

	pub fn end(&self) -> DVec3 {
		DVec3::from_array(self.end)
	}

	/// Light at the start and end anchors.
	pub fn lights(&self) -> (LightLevel, LightLevel) {
		match self.light {
			Some([[b0, s0], [b1, s1]]) => (LightLevel::new(b0, s0), LightLevel::new(b1, s1)),
			None => (LightLevel::FULL, LightLevel::FULL),
		}
	}
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate configuration TOML.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		config
			.mesh
			.chain_config()
			.validate()
			.context("Invalid [mesh] section")?;

		for (i, chain) in config.chains.iter().enumerate() {
			if !(chain.start().is_finite() && chain.end().is_finite()) {
				anyhow::bail!("Chain {} has a non-finite anchor", i);
			}
			if let Some(light) = chain.light {
				if light.iter().flatten().any(|&level| level > 15) {
					anyhow::bail!("Chain {} light levels must be 0-15, got {:?}", i, light);
				}
			}
		}

		Ok(config)
	}
}
