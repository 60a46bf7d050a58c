//! Precomputed tinted particle sprites.
//!
//! Every pixel of an explosion pattern gets its own copy of the base particle
//! sprite, multiplied channel-wise by that pixel's color. Realising a copy as
//! a drawable bitmap is asynchronous in the browser, so each grid cell is a
//! write-once slot that fills in whenever its bitmap is ready. Readers get
//! `None` until then and skip the particle.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info, warn};

use super::render::Bitmap;
use super::types::Pixels;

/// A write-once cell filled when its bitmap finishes generating.
pub type Slot<B> = Rc<OnceCell<B>>;

/// Turns raw pixels into drawable bitmaps, possibly completing later.
pub trait BitmapSink {
	type Image: Bitmap;

	/// Start realising `pixels`; the result is stored into `slot` when done.
	/// Completions may arrive in any order.
	fn realize(&self, pixels: Pixels, slot: Slot<Self::Image>);
}

/// Multiplies each channel of `base` by the matching channel of `rgba`, flooring `/ 256`.
pub fn tint(base: &Pixels, rgba: [u8; 4]) -> Pixels {
	let data = base
		.data
		.chunks_exact(4)
		.flat_map(|px| {
			[0, 1, 2, 3].map(|c| ((px[c] as u32 * rgba[c] as u32) / 256) as u8)
		})
		.collect();
	Pixels::new(base.width, base.height, data)
}

struct TintGrid<B> {
	width: u32,
	height: u32,
	cells: Vec<Slot<B>>,
}

/// Tinted sprite grids keyed by pattern name.
pub struct TintCache<B> {
	patterns: HashMap<String, TintGrid<B>>,
}

impl<B> Default for TintCache<B> {
	fn default() -> Self {
		Self {
			patterns: HashMap::new(),
		}
	}
}

impl<B: Clone> TintCache<B> {
	/// Allocate a grid per pattern and start realising one tinted sprite per pattern pixel.
	///
	/// Patterns without pixel data are skipped; a pattern already present is rebuilt.
	pub fn build<S>(&mut self, base: &Pixels, patterns: &[(String, Rc<Pixels>)], sink: &S)
	where
		S: BitmapSink<Image = B>,
	{
		info!(
			"night-sky: tinting {}x{} particle for {} patterns",
			base.width,
			base.height,
			patterns.len()
		);
		for (name, pattern) in patterns {
			if pattern.width == 0 || pattern.height == 0 {
				warn!("night-sky: pattern {} is empty, skipping", name);
				continue;
			}
			let mut cells = Vec::with_capacity((pattern.width * pattern.height) as usize);
			for px in pattern.data.chunks_exact(4) {
				let slot: Slot<B> = Rc::new(OnceCell::new());
				sink.realize(tint(base, [px[0], px[1], px[2], px[3]]), slot.clone());
				cells.push(slot);
			}
			debug!("night-sky: pattern {} queued {} cells", name, cells.len());
			self.patterns.insert(
				name.clone(),
				TintGrid {
					width: pattern.width,
					height: pattern.height,
					cells,
				},
			);
		}
	}

	pub fn width(&self, pattern: &str) -> Option<u32> {
		self.patterns.get(pattern).map(|g| g.width)
	}

	pub fn height(&self, pattern: &str) -> Option<u32> {
		self.patterns.get(pattern).map(|g| g.height)
	}

	/// The tinted sprite for pattern pixel `(x, y)`, once it is ready.
	pub fn image(&self, pattern: &str, x: u32, y: u32) -> Option<B> {
		let grid = self.patterns.get(pattern)?;
		if x >= grid.width || y >= grid.height {
			return None;
		}
		grid.cells
			.get((y * grid.width + x) as usize)?
			.get()
			.cloned()
	}

	/// Number of cells of `pattern` whose bitmap has arrived.
	pub fn ready_count(&self, pattern: &str) -> usize {
		self.patterns
			.get(pattern)
			.map(|g| g.cells.iter().filter(|c| c.get().is_some()).count())
			.unwrap_or(0)
	}
}
