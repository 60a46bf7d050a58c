//! Image assets: decoded bitmaps plus their raw pixels.
//!
//! Loading is all-or-nothing. Every fetch is started up front, and the first
//! one that fails aborts startup with a [`LoadError`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use js_sys::Promise;
use log::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
	CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, ImageBitmap, Window,
};

use super::types::{Pixels, SkyConfig};

/// Why startup could not get its assets.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadError {
	/// The image at `path` failed to load.
	Fetch { path: String },
	/// The image loaded but its pixels or bitmap could not be extracted.
	Decode { path: String },
	/// A required asset is not among the loaded ones.
	MissingAsset { name: String },
	/// A browser API the loader depends on was unavailable.
	Dom(String),
}

impl fmt::Display for LoadError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LoadError::Fetch { path } => write!(f, "failed to load {path}"),
			LoadError::Decode { path } => write!(f, "failed to decode {path}"),
			LoadError::MissingAsset { name } => write!(f, "missing asset {name}"),
			LoadError::Dom(what) => write!(f, "browser API unavailable: {what}"),
		}
	}
}

impl std::error::Error for LoadError {}

/// Loaded images keyed by asset name (file stem).
pub struct Assets<B> {
	pub images: HashMap<String, B>,
	pub pixels: HashMap<String, Rc<Pixels>>,
}

impl<B> Default for Assets<B> {
	fn default() -> Self {
		Self {
			images: HashMap::new(),
			pixels: HashMap::new(),
		}
	}
}

impl<B: Clone> Assets<B> {
	pub fn image(&self, name: &str) -> Option<B> {
		self.images.get(name).cloned()
	}

	pub fn pixels(&self, name: &str) -> Option<Rc<Pixels>> {
		self.pixels.get(name).cloned()
	}

	/// Like [`Assets::image`], but a missing asset is an error.
	pub fn require_image(&self, name: &str) -> Result<B, LoadError> {
		self.image(name).ok_or_else(|| LoadError::MissingAsset { name: name.into() })
	}

	pub fn require_pixels(&self, name: &str) -> Result<Rc<Pixels>, LoadError> {
		self.pixels(name).ok_or_else(|| LoadError::MissingAsset { name: name.into() })
	}
}

/// Resolves once `image` has loaded; rejects on its error event.
fn image_loaded(image: &HtmlImageElement) -> Promise {
	Promise::new(&mut |resolve, reject| {
		image.set_onload(Some(&resolve));
		image.set_onerror(Some(&reject));
	})
}

/// Read back the RGBA pixels of a loaded image through a scratch canvas.
fn read_pixels(document: &Document, image: &HtmlImageElement) -> Option<Pixels> {
	let (w, h) = (image.natural_width(), image.natural_height());
	let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
	canvas.set_width(w);
	canvas.set_height(h);
	let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
	ctx.draw_image_with_html_image_element(image, 0.0, 0.0).ok()?;
	let data = ctx.get_image_data(0.0, 0.0, w as f64, h as f64).ok()?;
	Some(Pixels::new(w, h, data.data().0))
}

/// Fetch and decode every asset named by `config`.
pub async fn load_assets(
	window: &Window,
	config: &SkyConfig,
) -> Result<Assets<ImageBitmap>, LoadError> {
	let document = window
		.document()
		.ok_or_else(|| LoadError::Dom("document".into()))?;
	let names = config.asset_names();
	info!("night-sky: loading {} assets from {}", names.len(), config.asset_dir);

	let mut pending = Vec::with_capacity(names.len());
	for name in names {
		let path = config.asset_path(&name);
		let image = HtmlImageElement::new().map_err(|_| LoadError::Dom("Image".into()))?;
		let loaded = image_loaded(&image);
		image.set_src(&path);
		pending.push((name, path, image, loaded));
	}

	let mut assets = Assets::default();
	for (name, path, image, loaded) in pending {
		JsFuture::from(loaded)
			.await
			.map_err(|_| LoadError::Fetch { path: path.clone() })?;
		let pixels = read_pixels(&document, &image)
			.ok_or_else(|| LoadError::Decode { path: path.clone() })?;
		let bitmap = window
			.create_image_bitmap_with_html_image_element(&image)
			.map_err(|_| LoadError::Decode { path: path.clone() })?;
		let bitmap: ImageBitmap = JsFuture::from(bitmap)
			.await
			.map_err(|_| LoadError::Decode { path: path.clone() })?
			.unchecked_into();
		debug!("night-sky: loaded {} ({}x{})", path, pixels.width, pixels.height);
		assets.images.insert(name.clone(), bitmap);
		assets.pixels.insert(name, Rc::new(pixels));
	}
	Ok(assets)
}
