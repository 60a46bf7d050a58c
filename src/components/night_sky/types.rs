//! Data exchanged between the host page and the night sky simulation.

use serde::Deserialize;

/// Startup configuration, read from a JSON script element when the page provides one.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyConfig {
	/// Directory the image assets are served from.
	pub asset_dir: String,
	/// Sprite strip drawn while a firework ascends.
	pub firework_sprite: String,
	/// Base particle image that gets tinted by each pattern pixel.
	pub particle_sprite: String,
	/// Explosion patterns, one image per pattern.
	pub patterns: Vec<String>,
	/// Scroll offset (px) past which the scroll hint is hidden.
	pub scroll_hint_threshold: f64,
}

impl SkyConfig {
	/// Asset names to load, sprites first.
	pub fn asset_names(&self) -> Vec<String> {
		let mut names = vec![self.firework_sprite.clone(), self.particle_sprite.clone()];
		names.extend(self.patterns.iter().cloned());
		names
	}

	/// Path of a named PNG asset.
	pub fn asset_path(&self, name: &str) -> String {
		format!("{}/{}.png", self.asset_dir.trim_end_matches('/'), name)
	}
}

impl Default for SkyConfig {
	fn default() -> Self {
		Self {
			asset_dir: "img".into(),
			firework_sprite: "firework".into(),
			particle_sprite: "firework_particle_01".into(),
			patterns: (1..=5).map(|i| format!("pattern_{i:02}")).collect(),
			scroll_hint_threshold: 100.0,
		}
	}
}

/// Live window and page metrics sampled by the host every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageMetrics {
	pub window_width: f64,
	pub window_height: f64,
	/// Vertical scroll offset of the page, in CSS pixels.
	pub scroll_y: f64,
	/// Total height of the page body, in CSS pixels.
	pub page_height: f64,
}

/// Placement of the "show more" affordance, produced once per frame for the host to apply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageHint {
	/// Offset from the top of the viewport, in `vh` units.
	pub top_vh: f64,
	pub visible: bool,
}

impl PageHint {
	pub fn opacity(&self) -> &'static str {
		if self.visible { "1" } else { "0" }
	}
}

impl Default for PageHint {
	fn default() -> Self {
		Self {
			top_vh: 80.0,
			visible: true,
		}
	}
}

/// A decoded RGBA8 pixel buffer, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Pixels {
	pub width: u32,
	pub height: u32,
	pub data: Vec<u8>,
}

impl Pixels {
	pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
		debug_assert_eq!(data.len(), (width * height * 4) as usize);
		Self {
			width,
			height,
			data,
		}
	}

	/// The RGBA value at `(x, y)`, or `None` outside the buffer.
	pub fn rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let i = ((y * self.width + x) * 4) as usize;
		self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
	}
}
