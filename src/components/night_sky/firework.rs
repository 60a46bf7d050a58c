//! The rising firework and its detonation.
//!
//! A firework climbs at constant vertical speed to its detonation height,
//! wobbling sideways as it goes. Once there it pulses a fixed number of
//! flashes; the first pulse bursts into one particle per opaque pixel of its
//! pattern. After the last flash it is spent and waits to be replaced.

use std::rc::Rc;

use log::debug;
use rand::Rng;

use super::background::Background;
use super::particle::{DRIFT_INTERVAL, Particle, ParticlePool, random_drift};
use super::render::{Bitmap, Painter, Rect};
use super::tint::TintCache;
use super::types::Pixels;
use super::viewport::Viewport;

/// Number of flash pulses after detonation.
pub const FLASHES: u32 = 4;

/// Frames between flash pulses.
const FLASH_GAP: i32 = 4;

/// Pattern pixels less opaque than this do not produce particles.
pub const MIN_BURST_ALPHA: u8 = 32;

/// Distance between neighbouring burst particles at rest (percent units).
const BURST_SPREAD: f64 = 1.8;

/// Edge length of the drawn rocket (percent units).
const ROCKET_SIZE: f64 = 2.0;

/// Width of one frame in the rocket sprite strip, in pixels.
const SPRITE_FRAME_WIDTH: u32 = 8;

/// Seconds per rocket sprite frame.
const SPRITE_FRAME_TIME: f64 = 0.05;

/// Remaining ascent below this counts as arrived; absorbs summed frame deltas.
const ARRIVAL_EPSILON: f64 = 1e-9;

/// A horizontal strip of equally wide animation frames, looping.
#[derive(Clone, Debug)]
pub struct Sprite<B> {
	image: B,
	frame_width: u32,
	frame_time: f64,
	timer: f64,
	frame: u32,
}

impl<B: Bitmap> Sprite<B> {
	pub fn new(image: B, frame_width: u32, frame_time: f64) -> Self {
		Self {
			image,
			frame_width: frame_width.max(1),
			frame_time,
			timer: 0.0,
			frame: 0,
		}
	}

	pub fn frame(&self) -> u32 {
		self.frame
	}

	pub fn advance(&mut self, elapsed: f64) {
		self.timer += elapsed;
		if self.timer > self.frame_time {
			self.timer = 0.0;
			self.frame += 1;
			if self.frame * self.frame_width >= self.image.width() {
				self.frame = 0;
			}
		}
	}

	pub fn draw<P: Painter<Image = B>>(&mut self, painter: &mut P, elapsed: f64, dest: Rect) {
		self.advance(elapsed);
		let src = Rect::new(
			(self.frame * self.frame_width) as f64,
			0.0,
			self.frame_width as f64,
			self.image.height() as f64,
		);
		painter.draw_image_region(&self.image, src, dest);
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireworkPhase {
	Ascending,
	Flashing,
	Spent,
}

pub struct Firework<B> {
	pub x: f64,
	pub y: f64,
	velx: f64,
	vely: f64,
	kill_y: f64,
	ascent_left: f64,
	changedir: f64,
	flashes_left: u32,
	flash_timer: i32,
	pattern: String,
	pattern_pixels: Option<Rc<Pixels>>,
	sprite: Sprite<B>,
}

impl<B: Bitmap> Firework<B> {
	/// A firework launched from `start` that reaches `kill_y` after `ascent_time` seconds.
	pub fn new(
		sprite: B,
		pattern: String,
		pattern_pixels: Option<Rc<Pixels>>,
		start: (f64, f64),
		kill_y: f64,
		ascent_time: f64,
	) -> Self {
		Self {
			x: start.0,
			y: start.1,
			velx: 0.0,
			vely: (kill_y - start.1) / ascent_time,
			kill_y,
			ascent_left: ascent_time,
			changedir: DRIFT_INTERVAL,
			flashes_left: FLASHES,
			flash_timer: 0,
			pattern,
			pattern_pixels,
			sprite: Sprite::new(sprite, SPRITE_FRAME_WIDTH, SPRITE_FRAME_TIME),
		}
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn kill_y(&self) -> f64 {
		self.kill_y
	}

	pub fn phase(&self) -> FireworkPhase {
		if self.ascent_left > ARRIVAL_EPSILON {
			FireworkPhase::Ascending
		} else if self.flashes_left > 0 {
			FireworkPhase::Flashing
		} else {
			FireworkPhase::Spent
		}
	}

	/// Advance one frame. Returns the number of particles spawned, if this frame burst.
	#[allow(clippy::too_many_arguments)]
	pub fn step<P, R>(
		&mut self,
		painter: &mut P,
		viewport: &Viewport,
		background: &mut Background,
		pool: &mut ParticlePool<B>,
		cache: &TintCache<B>,
		elapsed: f64,
		rng: &mut R,
	) -> Option<usize>
	where
		P: Painter<Image = B>,
		R: Rng,
	{
		match self.phase() {
			FireworkPhase::Ascending => {
				self.ascend(painter, viewport, elapsed, rng);
				None
			}
			FireworkPhase::Flashing => self.flash(background, pool, cache, rng),
			FireworkPhase::Spent => None,
		}
	}

	fn ascend<P, R>(&mut self, painter: &mut P, viewport: &Viewport, elapsed: f64, rng: &mut R)
	where
		P: Painter<Image = B>,
		R: Rng,
	{
		let dest = Rect::new(
			viewport.to_pixel_x(self.x),
			viewport.to_pixel_y(self.y),
			viewport.to_pixel_x(ROCKET_SIZE),
			viewport.to_pixel_y(ROCKET_SIZE),
		);
		self.sprite.draw(painter, elapsed, dest);

		self.y += self.vely * elapsed.min(self.ascent_left);
		self.ascent_left -= elapsed;
		if self.ascent_left <= ARRIVAL_EPSILON {
			self.y = self.kill_y;
		}

		self.changedir -= elapsed;
		if self.changedir < 0.0 {
			self.changedir = DRIFT_INTERVAL;
			self.velx = random_drift(rng);
		}
		self.x += self.velx * elapsed;
	}

	fn flash<R: Rng>(
		&mut self,
		background: &mut Background,
		pool: &mut ParticlePool<B>,
		cache: &TintCache<B>,
		rng: &mut R,
	) -> Option<usize> {
		self.flash_timer -= 1;
		if self.flash_timer >= 0 || self.flashes_left == 0 {
			return None;
		}
		let burst = if self.flashes_left == FLASHES {
			Some(self.burst(pool, cache, rng))
		} else {
			None
		};
		self.flashes_left -= 1;
		self.flash_timer = FLASH_GAP;
		background.trigger_flash();
		burst
	}

	/// Spawn one particle per sufficiently opaque pattern pixel whose tinted sprite is ready.
	fn burst<R: Rng>(
		&self,
		pool: &mut ParticlePool<B>,
		cache: &TintCache<B>,
		rng: &mut R,
	) -> usize {
		let (Some(w), Some(h), Some(pixels)) = (
			cache.width(&self.pattern),
			cache.height(&self.pattern),
			self.pattern_pixels.as_ref(),
		) else {
			debug!("night-sky: pattern {} not ready, no burst", self.pattern);
			return 0;
		};

		let mut spawned = 0;
		for x in 0..w {
			for y in 0..h {
				let Some(rgba) = pixels.rgba(x, y) else {
					continue;
				};
				if rgba[3] < MIN_BURST_ALPHA {
					continue;
				}
				let Some(image) = cache.image(&self.pattern, x, y) else {
					continue;
				};
				let dest = (
					self.x + (x as f64 - w as f64 / 2.0) * BURST_SPREAD,
					self.y + (y as f64 - h as f64 / 2.0) * BURST_SPREAD,
				);
				pool.spawn(Particle::new(
					image,
					(self.x, self.y),
					dest,
					rng.random_range(0.75..1.0),
					rng.random_range(4.0..6.0),
					rgba,
				));
				spawned += 1;
			}
		}
		debug!("night-sky: {} burst into {} particles", self.pattern, spawned);
		spawned
	}
}
