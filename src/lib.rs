//! night-sky: Animated night sky background for a scrolling web page.
//!
//! This crate provides a WASM canvas component that paints a scroll-reactive
//! gradient sky, a parallax starfield, and fireworks behind the page content.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::night_sky::{LoadError, NightSkyCanvas, PageHint, SkyConfig, SkyTheme};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("night-sky: logging initialized");
}

/// Load sky settings from a script element with id="sky-config".
/// Expected format: JSON with any of { asset_dir, firework_sprite, particle_sprite,
/// patterns, scroll_hint_threshold }
fn load_config() -> Option<SkyConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("sky-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<SkyConfig>(&json_text) {
		Ok(config) => {
			info!(
				"night-sky: loaded config with {} patterns from {}",
				config.patterns.len(),
				config.asset_dir
			);
			Some(config)
		}
		Err(e) => {
			warn!("night-sky: failed to parse sky config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Mounts the sky behind the page and the scroll hint that floats above it.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_else(|| {
		info!("night-sky: using default sky config");
		SkyConfig::default()
	});
	let theme = SkyTheme::default();
	let theme_color = theme.page_color.to_css();
	let (hint, set_hint) = signal(PageHint::default());

	view! {
		<Title text="Night Sky" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta name="theme-color" content=theme_color />

		<NightSkyCanvas config=config theme=theme hint=set_hint />
		<div
			id="show-more"
			class="show-more"
			style:top=move || format!("{}vh", hint.get().top_vh)
			style:opacity=move || hint.get().opacity()
		>
			"Scroll for more"
		</div>
	}
}
