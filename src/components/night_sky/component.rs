//! Leptos component wrapping the night sky canvas.
//!
//! On mount the component loads the image assets, builds the simulator, draws
//! one frame, and after the next animation frame starts tinting the particle
//! sprites. From then on `requestAnimationFrame` drives the simulator and a
//! self-rescheduling timeout launches a new firework every few seconds.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use js_sys::Promise;
use leptos::prelude::*;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageBitmap, Window};

use super::assets::{LoadError, load_assets};
use super::render::{CanvasPainter, WebBitmapSink};
use super::simulator::Simulator;
use super::theme::SkyTheme;
use super::types::{PageHint, PageMetrics, SkyConfig};

/// Bundles the simulator with the canvas it draws on.
struct SkyContext {
	sim: Simulator<ImageBitmap, SmallRng>,
	painter: CanvasPainter,
}

impl SkyContext {
	fn frame(&mut self, timestamp: f64, metrics: PageMetrics) -> PageHint {
		self.sim.tick(&mut self.painter, timestamp, metrics)
	}
}

/// Sample window size, scroll offset and page height.
fn page_metrics(window: &Window) -> PageMetrics {
	let px = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	PageMetrics {
		window_width: px(window.inner_width()),
		window_height: px(window.inner_height()),
		scroll_y: window.scroll_y().unwrap_or(0.0),
		page_height: window
			.document()
			.and_then(|d| d.body())
			.map(|b| b.get_bounding_client_rect().height())
			.unwrap_or(0.0),
	}
}

/// Resolves on the next animation frame.
async fn next_frame(window: &Window) {
	let promise = Promise::new(&mut |resolve, _| {
		let _ = window.request_animation_frame(&resolve);
	});
	let _ = JsFuture::from(promise).await;
}

fn seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}

/// Launch a firework after `delay`, then keep rescheduling from each launch.
fn schedule_launch(sky: Rc<RefCell<SkyContext>>, delay: Duration) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let launch = Closure::once_into_js(move || {
		let next = sky.borrow_mut().sim.launch_firework();
		schedule_launch(sky, next);
	});
	let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
		launch.unchecked_ref(),
		delay.as_millis().min(i32::MAX as u128) as i32,
	);
}

/// Drive the simulator from `requestAnimationFrame` for the lifetime of the page.
fn run_animation(
	window: &Window,
	sky: Rc<RefCell<SkyContext>>,
	hint: Option<WriteSignal<PageHint>>,
) {
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let animate_inner = animate.clone();
	*animate.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
		let Some(window) = web_sys::window() else {
			return;
		};
		let next = sky.borrow_mut().frame(timestamp, page_metrics(&window));
		if let Some(hint) = hint {
			hint.set(next);
		}
		if let Some(ref cb) = *animate_inner.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

async fn start(
	canvas: HtmlCanvasElement,
	config: SkyConfig,
	theme: SkyTheme,
	hint: Option<WriteSignal<PageHint>>,
) -> Result<(), LoadError> {
	let window = web_sys::window().ok_or_else(|| LoadError::Dom("window".into()))?;
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|c| c.dyn_into().ok())
		.ok_or_else(|| LoadError::Dom("2d context".into()))?;

	let assets = load_assets(&window, &config).await?;
	let mut sim = Simulator::new(
		assets,
		config,
		theme,
		page_metrics(&window),
		SmallRng::seed_from_u64(seed()),
	)?;
	let first_delay = sim.launch_firework();
	let sky = Rc::new(RefCell::new(SkyContext {
		sim,
		painter: CanvasPainter::new(canvas, ctx),
	}));

	let first = sky.borrow_mut().frame(0.0, page_metrics(&window));
	if let Some(hint) = hint {
		hint.set(first);
	}

	next_frame(&window).await;
	sky.borrow_mut()
		.sim
		.build_tints(&WebBitmapSink::new(window.clone()));
	info!("night-sky: animation started");
	schedule_launch(sky.clone(), first_delay);
	run_animation(&window, sky, hint);
	Ok(())
}

/// Full-window animated sky drawn behind the page content.
///
/// Pass a `hint` signal to receive the per-frame placement of the page's
/// "show more" affordance.
#[component]
pub fn NightSkyCanvas(
	#[prop(default = SkyConfig::default())] config: SkyConfig,
	#[prop(default = SkyTheme::default())] theme: SkyTheme,
	#[prop(optional)] hint: Option<WriteSignal<PageHint>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (config, theme) = (config.clone(), theme.clone());
		wasm_bindgen_futures::spawn_local(async move {
			if let Err(e) = start(canvas, config, theme, hint).await {
				error!("night-sky: startup failed: {}", e);
			}
		});
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="night-sky-canvas"
			style="position: fixed; top: 0; left: 0; z-index: -1; display: block;"
		/>
	}
}
