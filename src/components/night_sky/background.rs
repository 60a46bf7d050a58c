//! Scroll-reactive sky gradient.
//!
//! The gradient anchors are laid out over the whole page height. Each frame
//! only the slice under the visible window is drawn, so scrolling the page
//! moves continuously through a sky taller than the viewport.

use super::render::{Painter, Rect};
use super::theme::{Color, FlashStyle, GradientStop};
use super::viewport::Viewport;

/// Color of the anchor gradient at `percent`, interpolating from anchor `i` towards `i + 1`.
fn lerp_from(anchors: &[GradientStop], i: usize, percent: f64) -> Color {
	let from = anchors[i];
	match anchors.get(i + 1) {
		Some(to) if to.position > from.position => {
			let t = (percent - from.position) / (to.position - from.position);
			from.color.lerp(to.color, t)
		}
		_ => from.color,
	}
}

/// Color continuing the line from anchor `i` through `i + 1`, even for `percent` outside it.
fn extrapolate_from(anchors: &[GradientStop], i: usize, percent: f64) -> Color {
	let from = anchors[i];
	match anchors.get(i + 1) {
		Some(to) if to.position > from.position => {
			let t = (percent - from.position) / (to.position - from.position);
			from.color.extrapolate(to.color, t)
		}
		_ => from.color,
	}
}

/// Gradient stops, in window-relative offsets, for the page slice
/// `[scroll_y, scroll_y + window_height]`.
pub fn window_stops(
	anchors: &[GradientStop],
	scroll_y: f64,
	window_height: f64,
	page_height: f64,
) -> Vec<(f64, Color)> {
	if anchors.is_empty() {
		return Vec::new();
	}
	let last = anchors.len() - 1;
	let page_height = page_height.max(1.0);
	let top = (scroll_y / page_height).clamp(0.0, 1.0);
	let bottom = ((scroll_y + window_height) / page_height).clamp(0.0, 1.0);
	let span = window_height / page_height;

	let mut start = 0;
	let mut end = 0;
	for (i, anchor) in anchors.iter().enumerate() {
		if anchor.position <= top {
			start = i;
		}
		if bottom >= anchor.position {
			end = (i + 1).min(last);
		}
	}

	if start == last {
		let color = anchors[last].color;
		return vec![(0.0, color), (1.0, color)];
	}

	let mut stops = Vec::with_capacity(end - start + 1);
	stops.push((0.0, lerp_from(anchors, start, top)));
	for anchor in &anchors[start + 1..end.max(start + 1)] {
		let offset = if span > 0.0 {
			(anchor.position - top) / span
		} else {
			0.0
		};
		stops.push((offset, anchor.color));
	}
	if end > start {
		let color = if end == last {
			anchors[last].color
		} else {
			extrapolate_from(anchors, end, bottom)
		};
		stops.push((1.0, color));
	}
	stops
}

/// The sky behind everything else, plus the detonation flash overlay.
pub struct Background {
	anchors: Vec<GradientStop>,
	flash: FlashStyle,
	flash_frames: u32,
}

impl Background {
	pub fn new(anchors: Vec<GradientStop>, flash: FlashStyle) -> Self {
		Self {
			anchors,
			flash,
			flash_frames: 0,
		}
	}

	/// Keep the flash overlay up for the next few frames.
	pub fn trigger_flash(&mut self) {
		self.flash_frames = self.flash.frames;
	}

	pub fn flash_frames(&self) -> u32 {
		self.flash_frames
	}

	pub fn draw<P: Painter>(
		&mut self,
		painter: &mut P,
		viewport: &Viewport,
		scroll_y: f64,
		page_height: f64,
	) {
		let area = Rect::new(0.0, 0.0, viewport.width as f64, viewport.height as f64);
		let stops = window_stops(&self.anchors, scroll_y, area.h, page_height);
		painter.fill_vertical_gradient(area, &stops);

		if self.flash_frames > 0 {
			self.flash_frames -= 1;
			painter.fill_rect(area, self.flash.color);
		}
	}
}
