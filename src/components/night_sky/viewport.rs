//! Drawable surface size and the resolution-independent percent space.
//!
//! Effects are positioned in percent space, where the longer surface axis
//! spans 100 units and the shorter one is scaled to keep the aspect ratio.

use log::debug;

use super::render::Painter;

/// Extra pixels added to each window axis so reflow never exposes an edge gap.
const OVERSCAN: f64 = 10.0;

/// Length of the longer axis in percent space.
const PERCENT_SPAN: f64 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	pub width: u32,
	pub height: u32,
	pwidth: f64,
	pheight: f64,
}

impl Viewport {
	pub fn new(width: u32, height: u32) -> Self {
		let mut viewport = Self {
			width,
			height,
			pwidth: PERCENT_SPAN,
			pheight: PERCENT_SPAN,
		};
		viewport.update_percent_size();
		viewport
	}

	/// Match the window extent plus overscan.
	pub fn resize_to_window(&mut self, window_width: f64, window_height: f64) {
		self.width = (window_width.max(0.0) + OVERSCAN).ceil() as u32;
		self.height = (window_height.max(0.0) + OVERSCAN).ceil() as u32;
		self.update_percent_size();
	}

	/// Push the pixel size to the surface if it differs. Returns whether a resize happened.
	pub fn sync_surface<P: Painter>(&mut self, painter: &mut P) -> bool {
		self.update_percent_size();
		if painter.surface_size() == (self.width, self.height) {
			return false;
		}
		debug!("night-sky: surface resized to {}x{}", self.width, self.height);
		painter.set_surface_size(self.width, self.height);
		true
	}

	fn update_percent_size(&mut self) {
		let (w, h) = (self.width.max(1) as f64, self.height.max(1) as f64);
		if h > w {
			self.pheight = PERCENT_SPAN;
			self.pwidth = w / h * PERCENT_SPAN;
		} else {
			self.pwidth = PERCENT_SPAN;
			self.pheight = h / w * PERCENT_SPAN;
		}
	}

	pub fn pwidth(&self) -> f64 {
		self.pwidth
	}

	pub fn pheight(&self) -> f64 {
		self.pheight
	}

	pub fn is_portrait(&self) -> bool {
		self.pwidth < self.pheight
	}

	pub fn to_pixel_x(&self, x: f64) -> f64 {
		x / self.pwidth * self.width as f64
	}

	pub fn to_pixel_y(&self, y: f64) -> f64 {
		y / self.pheight * self.height as f64
	}

	pub fn area(&self) -> u64 {
		self.width as u64 * self.height as u64
	}
}
