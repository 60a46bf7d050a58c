//! In-memory stand-ins for the browser canvas and bitmap decoding.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::assets::Assets;
use super::render::{Bitmap, Painter, Rect};
use super::theme::Color;
use super::tint::{BitmapSink, Slot};
use super::types::Pixels;

#[derive(Clone, Debug, PartialEq)]
pub struct TestImage {
	pub width: u32,
	pub height: u32,
	pub pixels: Pixels,
}

impl TestImage {
	pub fn from_pixels(pixels: Pixels) -> Self {
		Self {
			width: pixels.width,
			height: pixels.height,
			pixels,
		}
	}
}

impl Bitmap for TestImage {
	fn width(&self) -> u32 {
		self.width
	}

	fn height(&self) -> u32 {
		self.height
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
	Gradient { area: Rect, stops: Vec<(f64, Color)> },
	Rect { area: Rect, color: Color },
	Image { image: TestImage, dest: Rect },
	Region { image: TestImage, src: Rect, dest: Rect },
}

pub struct RecordingPainter {
	size: (u32, u32),
	pub resizes: usize,
	pub frames: usize,
	pub calls: Vec<DrawCall>,
}

impl RecordingPainter {
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			size: (width, height),
			resizes: 0,
			frames: 0,
			calls: Vec::new(),
		}
	}

	pub fn images_drawn(&self) -> usize {
		self.calls
			.iter()
			.filter(|c| matches!(c, DrawCall::Image { .. }))
			.count()
	}
}

impl Painter for RecordingPainter {
	type Image = TestImage;

	fn surface_size(&self) -> (u32, u32) {
		self.size
	}

	fn set_surface_size(&mut self, width: u32, height: u32) {
		self.size = (width, height);
		self.resizes += 1;
	}

	fn begin_frame(&mut self) {
		self.frames += 1;
	}

	fn fill_vertical_gradient(&mut self, area: Rect, stops: &[(f64, Color)]) {
		self.calls.push(DrawCall::Gradient {
			area,
			stops: stops.to_vec(),
		});
	}

	fn fill_rect(&mut self, area: Rect, color: Color) {
		self.calls.push(DrawCall::Rect { area, color });
	}

	fn draw_image(&mut self, image: &TestImage, dest: Rect) {
		self.calls.push(DrawCall::Image {
			image: image.clone(),
			dest,
		});
	}

	fn draw_image_region(&mut self, image: &TestImage, src: Rect, dest: Rect) {
		self.calls.push(DrawCall::Region {
			image: image.clone(),
			src,
			dest,
		});
	}
}

/// Queues every request until the test resolves it, in whatever order it likes.
#[derive(Default)]
pub struct DeferredSink {
	pending: RefCell<Vec<(Pixels, Slot<TestImage>)>>,
}

impl DeferredSink {
	pub fn resolve(&self, index: usize) {
		let pending = self.pending.borrow();
		let (pixels, slot) = &pending[index];
		let _ = slot.set(TestImage::from_pixels(pixels.clone()));
	}

	pub fn resolve_all(&self) {
		for i in 0..self.pending.borrow().len() {
			self.resolve(i);
		}
	}
}

impl BitmapSink for DeferredSink {
	type Image = TestImage;

	fn realize(&self, pixels: Pixels, slot: Slot<TestImage>) {
		self.pending.borrow_mut().push((pixels, slot));
	}
}

pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Pixels {
	Pixels::new(width, height, rgba.repeat((width * height) as usize))
}

/// Assets for a sky with a 16x1 sprite strip, a 2x2 white particle and the given patterns.
pub fn test_assets(patterns: &[(&str, Pixels)]) -> Assets<TestImage> {
	let mut images = HashMap::new();
	let mut pixels = HashMap::new();
	let firework = solid(16, 1, [255; 4]);
	let particle = solid(2, 2, [255; 4]);
	images.insert("firework".to_string(), TestImage::from_pixels(firework.clone()));
	images.insert("firework_particle_01".to_string(), TestImage::from_pixels(particle.clone()));
	pixels.insert("firework".to_string(), Rc::new(firework));
	pixels.insert("firework_particle_01".to_string(), Rc::new(particle));
	for (name, pattern) in patterns {
		images.insert(name.to_string(), TestImage::from_pixels(pattern.clone()));
		pixels.insert(name.to_string(), Rc::new(pattern.clone()));
	}
	Assets { images, pixels }
}
