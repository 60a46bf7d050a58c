//! Composition root of the night sky.
//!
//! Owns every sub-system and advances them once per animation frame, drawing
//! in a fixed back-to-front order: sky, stars and particles, firework.

use std::rc::Rc;
use std::time::Duration;

use log::{info, warn};
use rand::Rng;

use super::assets::{Assets, LoadError};
use super::background::Background;
use super::firework::Firework;
use super::particle::ParticlePool;
use super::render::{Bitmap, Painter};
use super::scheduler::{ShuffleBag, launch_delay};
use super::starfield::Starfield;
use super::theme::SkyTheme;
use super::tint::{BitmapSink, TintCache};
use super::types::{PageHint, PageMetrics, Pixels, SkyConfig};
use super::viewport::Viewport;

/// Longest simulated step, in seconds. Keeps a backgrounded tab from jumping on return.
const MAX_ELAPSED: f64 = 0.1;

/// Seconds from launch to detonation.
const ASCENT_TIME: f64 = 3.0;

/// How far below the bottom edge fireworks launch (percent units).
const LAUNCH_DEPTH: f64 = 16.0;

/// Resting offset of the scroll hint, in `vh`.
const HINT_TOP_VH: f64 = 80.0;

/// The whole animated sky, generic over the bitmap type and random source.
pub struct Simulator<B, R> {
	viewport: Viewport,
	background: Background,
	starfield: Starfield,
	particles: ParticlePool<B>,
	firework: Option<Firework<B>>,
	patterns: ShuffleBag<String>,
	tints: TintCache<B>,
	assets: Assets<B>,
	firework_sprite: B,
	particle_pixels: Rc<Pixels>,
	theme: SkyTheme,
	config: SkyConfig,
	rng: R,
	last_timestamp: f64,
}

impl<B: Bitmap, R: Rng> Simulator<B, R> {
	/// Set up every sub-system for a window of the given size.
	///
	/// Fails if the rocket sprite or the base particle image is missing.
	pub fn new(
		assets: Assets<B>,
		config: SkyConfig,
		theme: SkyTheme,
		metrics: PageMetrics,
		mut rng: R,
	) -> Result<Self, LoadError> {
		let firework_sprite = assets.require_image(&config.firework_sprite)?;
		let particle_pixels = assets.require_pixels(&config.particle_sprite)?;

		let mut viewport = Viewport::new(0, 0);
		viewport.resize_to_window(metrics.window_width, metrics.window_height);
		let starfield = Starfield::new(&viewport, &mut rng);
		info!(
			"night-sky: {}x{} {} sky with {} stars",
			viewport.width,
			viewport.height,
			theme.name,
			starfield.stars.len()
		);

		Ok(Self {
			background: Background::new(theme.gradient.clone(), theme.flash.clone()),
			viewport,
			starfield,
			particles: ParticlePool::default(),
			firework: None,
			patterns: ShuffleBag::new(config.patterns.clone()),
			tints: TintCache::default(),
			assets,
			firework_sprite,
			particle_pixels,
			theme,
			config,
			rng,
			last_timestamp: 0.0,
		})
	}

	/// Start realising the tinted particle sprites for every configured pattern.
	pub fn build_tints<S: BitmapSink<Image = B>>(&mut self, sink: &S) {
		let patterns: Vec<(String, Rc<Pixels>)> = self
			.config
			.patterns
			.iter()
			.filter_map(|name| match self.assets.pixels(name) {
				Some(pixels) => Some((name.clone(), pixels)),
				None => {
					warn!("night-sky: no pixels for pattern {}", name);
					None
				}
			})
			.collect();
		self.tints.build(&self.particle_pixels, &patterns, sink);
	}

	/// Replace the current firework with a fresh launch. Returns the delay until the next one.
	pub fn launch_firework(&mut self) -> Duration {
		let delay = launch_delay(&mut self.rng);
		let Some(pattern) = self.patterns.draw(&mut self.rng) else {
			warn!("night-sky: no firework patterns configured");
			return delay;
		};

		let (pw, ph) = (self.viewport.pwidth(), self.viewport.pheight());
		let (start_x, kill_y) = if self.viewport.is_portrait() {
			(pw / 2.0, ph * 3.0 / 4.0)
		} else {
			(pw * 2.0 / 3.0, ph / 2.0)
		};
		info!(
			"night-sky: launching {}, next in {:.1}s",
			pattern,
			delay.as_secs_f64()
		);
		let pixels = self.assets.pixels(&pattern);
		self.firework = Some(Firework::new(
			self.firework_sprite.clone(),
			pattern,
			pixels,
			(start_x, ph + LAUNCH_DEPTH),
			kill_y,
			ASCENT_TIME,
		));
		delay
	}

	/// Advance and draw one frame. `timestamp` is the host's monotonic frame time in milliseconds.
	pub fn tick<P: Painter<Image = B>>(
		&mut self,
		painter: &mut P,
		timestamp: f64,
		metrics: PageMetrics,
	) -> PageHint {
		let elapsed = ((timestamp - self.last_timestamp) / 1000.0).clamp(0.0, MAX_ELAPSED);
		self.last_timestamp = timestamp;

		self.viewport
			.resize_to_window(metrics.window_width, metrics.window_height);
		self.viewport.sync_surface(painter);
		painter.begin_frame();

		self.background
			.draw(painter, &self.viewport, metrics.scroll_y, metrics.page_height);

		self.starfield.update(&self.viewport, elapsed, &mut self.rng);
		self.starfield
			.draw(painter, &self.viewport, &self.theme.stars, metrics.scroll_y);
		self.particles
			.step(painter, &self.viewport, elapsed, &mut self.rng);

		if let Some(firework) = self.firework.as_mut() {
			firework.step(
				painter,
				&self.viewport,
				&mut self.background,
				&mut self.particles,
				&self.tints,
				elapsed,
				&mut self.rng,
			);
		}

		PageHint {
			top_vh: HINT_TOP_VH + (timestamp / 1000.0).sin(),
			visible: metrics.scroll_y <= self.config.scroll_hint_threshold,
		}
	}

	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	pub fn background(&self) -> &Background {
		&self.background
	}

	pub fn starfield(&self) -> &Starfield {
		&self.starfield
	}

	pub fn particles(&self) -> &ParticlePool<B> {
		&self.particles
	}

	pub fn firework(&self) -> Option<&Firework<B>> {
		self.firework.as_ref()
	}

	pub fn tints(&self) -> &TintCache<B> {
		&self.tints
	}
}

#[cfg(test)]
mod tests {
	use super::super::firework::FireworkPhase;
	use super::super::test_support::{
		DeferredSink, DrawCall, RecordingPainter, TestImage, solid, test_assets,
	};
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	fn metrics() -> PageMetrics {
		PageMetrics {
			window_width: 990.0,
			window_height: 590.0,
			scroll_y: 0.0,
			page_height: 3000.0,
		}
	}

	/// A 4x4 pattern with a 2x2 opaque core and a faint border.
	fn ring_pattern() -> Pixels {
		let mut data = Vec::new();
		for y in 0..4 {
			for x in 0..4 {
				let core = (1..3).contains(&x) && (1..3).contains(&y);
				data.extend_from_slice(&[255, 80, 40, if core { 255 } else { 31 }]);
			}
		}
		Pixels::new(4, 4, data)
	}

	fn simulator(config: SkyConfig) -> Simulator<TestImage, SmallRng> {
		let assets = test_assets(&[
			("pattern_01", ring_pattern()),
			("pattern_02", solid(2, 1, [9, 9, 9, 255])),
		]);
		Simulator::new(assets, config, SkyTheme::dusk(), metrics(), SmallRng::seed_from_u64(1))
			.unwrap()
	}

	fn single_pattern() -> SkyConfig {
		SkyConfig {
			patterns: vec!["pattern_01".into()],
			..SkyConfig::default()
		}
	}

	#[test]
	fn missing_sprites_fail_setup() {
		let config = SkyConfig {
			firework_sprite: "rocket".into(),
			..SkyConfig::default()
		};
		let result = Simulator::new(
			test_assets(&[]),
			config,
			SkyTheme::dusk(),
			metrics(),
			SmallRng::seed_from_u64(1),
		);
		assert_eq!(result.err(), Some(LoadError::MissingAsset { name: "rocket".into() }));
	}

	#[test]
	fn setup_sizes_viewport_and_stars_from_the_window() {
		let sim = simulator(single_pattern());
		assert_eq!((sim.viewport().width, sim.viewport().height), (1000, 600));
		assert_eq!(sim.starfield().stars.len(), 240);
		assert!(sim.firework().is_none());
	}

	#[test]
	fn landscape_launch_geometry() {
		let mut sim = simulator(single_pattern());
		let delay = sim.launch_firework();
		assert!((7.0..11.0).contains(&delay.as_secs_f64()));
		let fw = sim.firework().unwrap();
		assert_eq!(fw.pattern(), "pattern_01");
		assert!((fw.x - 200.0 / 3.0).abs() < 1e-9);
		assert!((fw.y - 76.0).abs() < 1e-9);
		assert!((fw.kill_y() - 30.0).abs() < 1e-9);
	}

	#[test]
	fn portrait_launch_geometry() {
		let assets = test_assets(&[("pattern_01", ring_pattern())]);
		let portrait = PageMetrics {
			window_width: 390.0,
			window_height: 790.0,
			..metrics()
		};
		let mut sim = Simulator::new(
			assets,
			single_pattern(),
			SkyTheme::dusk(),
			portrait,
			SmallRng::seed_from_u64(3),
		)
		.unwrap();
		sim.launch_firework();
		let fw = sim.firework().unwrap();
		assert!((fw.x - 25.0).abs() < 1e-9);
		assert!((fw.y - 116.0).abs() < 1e-9);
		assert!((fw.kill_y() - 75.0).abs() < 1e-9);
	}

	#[test]
	fn ascent_then_burst_end_to_end() {
		let mut sim = simulator(single_pattern());
		let sink = DeferredSink::default();
		sim.build_tints(&sink);
		sink.resolve_all();
		sim.launch_firework();

		let mut painter = RecordingPainter::new(0, 0);
		sim.tick(&mut painter, 0.0, metrics());
		for frame in 1..=30 {
			sim.tick(&mut painter, frame as f64 * 100.0, metrics());
		}
		let fw = sim.firework().unwrap();
		assert!((fw.y - fw.kill_y()).abs() < 1e-9);
		assert!(sim.particles().is_empty());

		sim.tick(&mut painter, 3100.0, metrics());
		assert_eq!(sim.particles().len(), 4);
		assert_eq!(sim.firework().map(|f| f.phase()), Some(FireworkPhase::Flashing));
		assert_eq!(sim.background().flash_frames(), 2);
	}

	#[test]
	fn burst_before_tints_are_ready_spawns_nothing() {
		let mut sim = simulator(single_pattern());
		sim.launch_firework();
		let mut painter = RecordingPainter::new(0, 0);
		for frame in 0..=31 {
			sim.tick(&mut painter, frame as f64 * 100.0, metrics());
		}
		assert!(sim.particles().is_empty());
		assert_eq!(sim.tints().width("pattern_01"), None);
	}

	#[test]
	fn long_pauses_are_capped() {
		let mut sim = simulator(single_pattern());
		sim.launch_firework();
		let start_y = sim.firework().unwrap().y;
		let mut painter = RecordingPainter::new(0, 0);
		sim.tick(&mut painter, 0.0, metrics());
		sim.tick(&mut painter, 60_000.0, metrics());
		// One capped step: 0.1s of a 46-unit climb over 3s.
		let climbed = start_y - sim.firework().unwrap().y;
		assert!((climbed - 46.0 / 30.0).abs() < 1e-9, "climbed {climbed}");
	}

	#[test]
	fn frame_draws_back_to_front() {
		let mut sim = simulator(single_pattern());
		let sink = DeferredSink::default();
		sim.build_tints(&sink);
		sink.resolve_all();
		sim.launch_firework();
		let mut painter = RecordingPainter::new(0, 0);
		for frame in 0..=31 {
			sim.tick(&mut painter, frame as f64 * 100.0, metrics());
		}

		painter.calls.clear();
		sim.tick(&mut painter, 3200.0, metrics());
		assert!(matches!(painter.calls.first(), Some(DrawCall::Gradient { .. })));
		let first_image = painter
			.calls
			.iter()
			.position(|c| matches!(c, DrawCall::Image { .. }))
			.unwrap();
		assert!(
			painter.calls[..first_image]
				.iter()
				.skip(1)
				.all(|c| matches!(c, DrawCall::Rect { .. }))
		);
		assert_eq!(painter.resizes, 1);
		assert_eq!(painter.surface_size(), (1000, 600));
	}

	#[test]
	fn relaunch_avoids_repeating_the_pattern() {
		let mut sim = simulator(SkyConfig {
			patterns: vec!["pattern_01".into(), "pattern_02".into()],
			..SkyConfig::default()
		});
		let mut seen = Vec::new();
		for _ in 0..6 {
			sim.launch_firework();
			seen.push(sim.firework().unwrap().pattern().to_string());
		}
		for pair in seen.windows(2) {
			assert_ne!(pair[0], pair[1]);
		}
	}

	#[test]
	fn scroll_hint_follows_scroll_and_time() {
		let mut sim = simulator(single_pattern());
		let mut painter = RecordingPainter::new(0, 0);
		let hint = sim.tick(&mut painter, 0.0, metrics());
		assert_eq!(hint, PageHint { top_vh: 80.0, visible: true });

		let scrolled = PageMetrics {
			scroll_y: 250.0,
			..metrics()
		};
		let hint = sim.tick(&mut painter, 1570.0, scrolled);
		assert!(!hint.visible);
		assert_eq!(hint.opacity(), "0");
		assert!((hint.top_vh - (80.0 + 1.57f64.sin())).abs() < 1e-12);
	}
}
