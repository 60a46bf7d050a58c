//! Drawing seam between the simulation and the browser canvas.
//!
//! The simulation draws through [`Painter`] and realises bitmaps through
//! [`BitmapSink`]; [`CanvasPainter`] and [`WebBitmapSink`] are the
//! `CanvasRenderingContext2d`/`createImageBitmap` implementations. Layering is
//! purely call order: whatever is drawn later lands on top.

use log::warn;
use wasm_bindgen::{Clamped, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageBitmap, ImageData, Window};

use super::theme::Color;
use super::tint::{BitmapSink, Slot};
use super::types::Pixels;

/// A drawable image with known pixel dimensions.
pub trait Bitmap: Clone {
	fn width(&self) -> u32;
	fn height(&self) -> u32;
}

/// Axis-aligned rectangle in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl Rect {
	pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
		Self { x, y, w, h }
	}
}

/// 2D drawing operations the simulation needs from its surface.
pub trait Painter {
	type Image: Bitmap;

	/// Current pixel size of the drawable surface.
	fn surface_size(&self) -> (u32, u32);

	/// Reallocate the drawable surface. Clears its contents.
	fn set_surface_size(&mut self, width: u32, height: u32);

	/// Per-frame context setup.
	fn begin_frame(&mut self);

	/// Fill `area` with a top-to-bottom linear gradient. Stop offsets are in `[0, 1]`.
	fn fill_vertical_gradient(&mut self, area: Rect, stops: &[(f64, Color)]);

	fn fill_rect(&mut self, area: Rect, color: Color);

	fn draw_image(&mut self, image: &Self::Image, dest: Rect);

	/// Blit the `src` region of `image` into `dest`.
	fn draw_image_region(&mut self, image: &Self::Image, src: Rect, dest: Rect);
}

impl Bitmap for ImageBitmap {
	fn width(&self) -> u32 {
		ImageBitmap::width(self)
	}

	fn height(&self) -> u32 {
		ImageBitmap::height(self)
	}
}

/// Draws onto an HTML canvas through its 2D context.
pub struct CanvasPainter {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
	pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
		Self { canvas, ctx }
	}
}

impl Painter for CanvasPainter {
	type Image = ImageBitmap;

	fn surface_size(&self) -> (u32, u32) {
		(self.canvas.width(), self.canvas.height())
	}

	fn set_surface_size(&mut self, width: u32, height: u32) {
		self.canvas.set_width(width);
		self.canvas.set_height(height);
	}

	fn begin_frame(&mut self) {
		self.ctx.set_image_smoothing_enabled(false);
	}

	fn fill_vertical_gradient(&mut self, area: Rect, stops: &[(f64, Color)]) {
		let gradient = self
			.ctx
			.create_linear_gradient(area.x, area.y, area.x, area.y + area.h);
		for (offset, color) in stops {
			let _ = gradient.add_color_stop(offset.clamp(0.0, 1.0) as f32, &color.to_css());
		}

		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill_rect(area.x, area.y, area.w, area.h);
	}

	fn fill_rect(&mut self, area: Rect, color: Color) {
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill_rect(area.x, area.y, area.w, area.h);
	}

	fn draw_image(&mut self, image: &ImageBitmap, dest: Rect) {
		let _ = self
			.ctx
			.draw_image_with_image_bitmap_and_dw_and_dh(image, dest.x, dest.y, dest.w, dest.h);
	}

	fn draw_image_region(&mut self, image: &ImageBitmap, src: Rect, dest: Rect) {
		let _ = self
			.ctx
			.draw_image_with_image_bitmap_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
				image, src.x, src.y, src.w, src.h, dest.x, dest.y, dest.w, dest.h,
			);
	}
}

/// Realises pixel buffers with `createImageBitmap`, storing each result when its promise settles.
pub struct WebBitmapSink {
	window: Window,
}

impl WebBitmapSink {
	pub fn new(window: Window) -> Self {
		Self { window }
	}
}

impl BitmapSink for WebBitmapSink {
	type Image = ImageBitmap;

	fn realize(&self, pixels: Pixels, slot: Slot<ImageBitmap>) {
		let data = match ImageData::new_with_u8_clamped_array_and_sh(
			Clamped(pixels.data.as_slice()),
			pixels.width,
			pixels.height,
		) {
			Ok(data) => data,
			Err(e) => {
				warn!("night-sky: rejected tinted pixels: {:?}", e);
				return;
			}
		};
		let promise = match self.window.create_image_bitmap_with_image_data(&data) {
			Ok(promise) => promise,
			Err(e) => {
				warn!("night-sky: createImageBitmap failed: {:?}", e);
				return;
			}
		};
		wasm_bindgen_futures::spawn_local(async move {
			match JsFuture::from(promise).await {
				Ok(value) => {
					let _ = slot.set(value.unchecked_into());
				}
				Err(e) => warn!("night-sky: tinted bitmap failed: {:?}", e),
			}
		});
	}
}
