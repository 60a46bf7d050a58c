//! Explosion fragments.
//!
//! A particle lives through two phases. While rising it decelerates
//! uniformly so that it comes to rest exactly on its target offset after
//! `uptime` seconds. It then falls slowly with a jittering horizontal drift,
//! flickering out as its fall time runs down.

use rand::Rng;

use super::render::{Painter, Rect};
use super::viewport::Viewport;

/// Seconds between horizontal drift changes.
pub const DRIFT_INTERVAL: f64 = 0.1;

/// Width of the horizontal drift range, centered on zero (percent units/s).
pub const DRIFT_SPREAD: f64 = 3.0;

/// Downward speed while falling (percent units/s).
const FALL_SPEED: f64 = 1.0;

/// Edge length of a drawn particle (percent units).
const PARTICLE_SIZE: f64 = 2.0;

/// A random horizontal drift velocity in `[-DRIFT_SPREAD / 2, DRIFT_SPREAD / 2)`.
pub fn random_drift<R: Rng>(rng: &mut R) -> f64 {
	(rng.random::<f64>() - 0.5) * DRIFT_SPREAD
}

#[derive(Clone, Debug)]
pub struct Particle<B> {
	pub x: f64,
	pub y: f64,
	velx: f64,
	vely: f64,
	/// Horizontal deceleration during the rise.
	drag: f64,
	/// Vertical deceleration during the rise.
	grav: f64,
	uptime: f64,
	falltime: f64,
	start_falltime: f64,
	changedir: f64,
	pub rgba: [u8; 4],
	pub alive: bool,
	image: B,
}

impl<B> Particle<B> {
	/// A particle rising from `start` to come to rest at `dest` after `uptime` seconds.
	pub fn new(
		image: B,
		start: (f64, f64),
		dest: (f64, f64),
		uptime: f64,
		falltime: f64,
		rgba: [u8; 4],
	) -> Self {
		// Stopping distance: d = a * t^2 / 2 when v0 = a * t.
		let drag = 2.0 * (dest.0 - start.0) / (uptime * uptime);
		let grav = 2.0 * (dest.1 - start.1) / (uptime * uptime);
		Self {
			x: start.0,
			y: start.1,
			velx: drag * uptime,
			vely: grav * uptime,
			drag,
			grav,
			uptime,
			falltime,
			start_falltime: falltime,
			changedir: 0.0,
			rgba,
			alive: true,
			image,
		}
	}

	pub fn drag(&self) -> f64 {
		self.drag
	}

	pub fn grav(&self) -> f64 {
		self.grav
	}

	pub fn velocity(&self) -> (f64, f64) {
		(self.velx, self.vely)
	}

	pub fn is_rising(&self) -> bool {
		self.uptime > 0.0
	}

	/// Chance of being drawn this frame, from 1 at the start of the fall down to 0.
	pub fn visibility(&self) -> f64 {
		if self.start_falltime <= 0.0 {
			return 0.0;
		}
		(self.falltime / self.start_falltime).clamp(0.0, 1.0)
	}

	pub fn update<R: Rng>(&mut self, elapsed: f64, rng: &mut R) {
		if self.uptime > 0.0 {
			self.uptime -= elapsed;
			self.velx -= self.drag * elapsed;
			self.x += self.velx * elapsed;
			self.vely -= self.grav * elapsed;
			self.y += self.vely * elapsed;
		} else if self.falltime > 0.0 {
			self.falltime -= elapsed;
			self.changedir -= elapsed;
			if self.changedir < 0.0 {
				self.changedir = DRIFT_INTERVAL;
				self.velx = random_drift(rng);
			}
			self.x += self.velx * elapsed;
			self.y += FALL_SPEED * elapsed;
		} else {
			self.alive = false;
		}
	}

	/// Draw with probability [`Particle::visibility`], so old particles flicker out.
	pub fn draw<P, R>(&self, painter: &mut P, viewport: &Viewport, rng: &mut R)
	where
		P: Painter<Image = B>,
		R: Rng,
	{
		if !self.alive || rng.random::<f64>() >= self.visibility() {
			return;
		}
		painter.draw_image(
			&self.image,
			Rect::new(
				viewport.to_pixel_x(self.x),
				viewport.to_pixel_y(self.y),
				viewport.to_pixel_x(PARTICLE_SIZE),
				viewport.to_pixel_y(PARTICLE_SIZE),
			),
		);
	}
}

/// Growable pool owning every live explosion fragment.
pub struct ParticlePool<B> {
	particles: Vec<Particle<B>>,
}

impl<B> Default for ParticlePool<B> {
	fn default() -> Self {
		Self {
			particles: Vec::new(),
		}
	}
}

impl<B> ParticlePool<B> {
	pub fn spawn(&mut self, particle: Particle<B>) {
		self.particles.push(particle);
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Particle<B>> {
		self.particles.iter()
	}

	/// Advance and draw every particle, then drop the dead ones.
	pub fn step<P, R>(&mut self, painter: &mut P, viewport: &Viewport, elapsed: f64, rng: &mut R)
	where
		P: Painter<Image = B>,
		R: Rng,
	{
		for particle in &mut self.particles {
			particle.update(elapsed, rng);
			particle.draw(painter, viewport, rng);
		}
		self.particles.retain(|p| p.alive);
	}
}
