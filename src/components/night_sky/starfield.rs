//! Ambient background stars with parallax scrolling.
//!
//! Stars are never destroyed: each one fades in, lives out its lifetime, fades
//! out over its final second and respawns somewhere else on the surface.

use rand::Rng;

use super::render::{Painter, Rect};
use super::theme::StarStyle;
use super::viewport::Viewport;

/// Surface area, in square pixels, per star.
const PIXELS_PER_STAR: u64 = 50 * 50;

/// Seconds over which a star fades out before respawning.
const FADE_OUT: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct Star {
	pub x: f64,
	pub y: f64,
	pub opacity: f64,
	/// Seconds left before the star respawns.
	pub time_alive: f64,
	/// Scroll divisor; larger values scroll slower and read as farther away.
	pub scroll_rate: f64,
}

impl Star {
	/// A star mid-life: fully visible, with a shorter first lifetime.
	pub fn new<R: Rng>(viewport: &Viewport, rng: &mut R) -> Self {
		let mut star = Self {
			x: 0.0,
			y: 0.0,
			opacity: 0.0,
			time_alive: 0.0,
			scroll_rate: rng.random_range(3.0..13.0),
		};
		star.respawn(viewport, rng);
		star.time_alive = rng.random_range(0.0..10.0);
		star.opacity = 1.0;
		star
	}

	/// Move to a random spot on the surface and start a new, invisible life.
	pub fn respawn<R: Rng>(&mut self, viewport: &Viewport, rng: &mut R) {
		self.x = rng.random::<f64>() * viewport.width as f64;
		self.y = rng.random::<f64>() * viewport.height as f64;
		self.opacity = 0.0;
		self.time_alive = rng.random_range(5.0..15.0);
	}

	pub fn update<R: Rng>(&mut self, viewport: &Viewport, elapsed: f64, rng: &mut R) {
		self.time_alive -= elapsed;
		if self.time_alive < 0.0 {
			self.respawn(viewport, rng);
		} else if self.time_alive < FADE_OUT {
			self.opacity = self.time_alive / FADE_OUT;
		} else {
			self.opacity = (self.opacity + elapsed).min(1.0);
		}
	}

	/// On-screen y after parallax scrolling, wrapped back onto the surface.
	pub fn screen_y(&self, scroll_y: f64, surface_height: f64) -> f64 {
		let y = self.y - scroll_y / self.scroll_rate;
		if y >= 0.0 || surface_height <= 0.0 {
			return y;
		}
		// Each wrap lands a few pixels lower so repeated wraps do not line up.
		(y % surface_height) + surface_height + 4.0 * (y / surface_height).floor()
	}
}

pub struct Starfield {
	pub stars: Vec<Star>,
}

impl Starfield {
	pub fn new<R: Rng>(viewport: &Viewport, rng: &mut R) -> Self {
		let count = (viewport.area() / PIXELS_PER_STAR) as usize;
		let stars = (0..count).map(|_| Star::new(viewport, rng)).collect();
		Self { stars }
	}

	pub fn update<R: Rng>(&mut self, viewport: &Viewport, elapsed: f64, rng: &mut R) {
		for star in &mut self.stars {
			star.update(viewport, elapsed, rng);
		}
	}

	pub fn draw<P: Painter>(
		&self,
		painter: &mut P,
		viewport: &Viewport,
		style: &StarStyle,
		scroll_y: f64,
	) {
		let height = viewport.height as f64;
		for star in &self.stars {
			// Two decimals is all the canvas ever sees.
			let alpha = (star.opacity * 100.0).round() / 100.0;
			painter.fill_rect(
				Rect::new(star.x, star.screen_y(scroll_y, height), style.size, style.size),
				style.color.with_alpha(alpha),
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	#[test]
	fn population_scales_with_area() {
		let mut rng = SmallRng::seed_from_u64(1);
		let field = Starfield::new(&Viewport::new(500, 300), &mut rng);
		assert_eq!(field.stars.len(), 60);
		for star in &field.stars {
			assert_eq!(star.opacity, 1.0);
			assert!((0.0..10.0).contains(&star.time_alive));
			assert!((3.0..13.0).contains(&star.scroll_rate));
		}
	}

	#[test]
	fn expired_star_respawns_on_the_surface() {
		let mut rng = SmallRng::seed_from_u64(2);
		let viewport = Viewport::new(200, 100);
		let mut star = Star::new(&viewport, &mut rng);
		star.time_alive = 0.05;
		star.update(&viewport, 0.1, &mut rng);
		assert_eq!(star.opacity, 0.0);
		assert!((5.0..15.0).contains(&star.time_alive));
		assert!((0.0..200.0).contains(&star.x));
		assert!((0.0..100.0).contains(&star.y));
	}

	#[test]
	fn fades_out_over_the_last_second_and_in_after_respawn() {
		let mut rng = SmallRng::seed_from_u64(3);
		let viewport = Viewport::new(200, 100);
		let mut star = Star::new(&viewport, &mut rng);
		star.time_alive = 1.05;
		star.opacity = 1.0;
		star.update(&viewport, 0.3, &mut rng);
		assert!((star.opacity - 0.75).abs() < 1e-9);

		star.respawn(&viewport, &mut rng);
		star.update(&viewport, 0.1, &mut rng);
		assert!((star.opacity - 0.1).abs() < 1e-9);
	}

	#[test]
	fn scrolling_moves_stars_by_their_rate_and_wraps() {
		let star = Star {
			x: 0.0,
			y: 50.0,
			opacity: 1.0,
			time_alive: 5.0,
			scroll_rate: 5.0,
		};
		assert_eq!(star.screen_y(100.0, 100.0), 30.0);
		// 50 - 300/5 = -10 wraps to 90, then the per-wrap offset of -4.
		assert_eq!(star.screen_y(300.0, 100.0), 86.0);
	}

	#[test]
	fn draws_one_square_per_star() {
		use super::super::test_support::RecordingPainter;
		use super::super::theme::SkyTheme;

		let mut rng = SmallRng::seed_from_u64(4);
		let viewport = Viewport::new(100, 100);
		let field = Starfield::new(&viewport, &mut rng);
		let mut painter = RecordingPainter::new(100, 100);
		field.draw(&mut painter, &viewport, &SkyTheme::dusk().stars, 0.0);
		assert_eq!(painter.calls.len(), 4);
	}

	proptest! {
		#[test]
		fn opacity_stays_in_unit_range(
			seed in any::<u64>(),
			steps in prop::collection::vec(0.0f64..0.1, 1..300),
		) {
			let mut rng = SmallRng::seed_from_u64(seed);
			let viewport = Viewport::new(120, 80);
			let mut field = Starfield::new(&viewport, &mut rng);
			for elapsed in steps {
				field.update(&viewport, elapsed, &mut rng);
				for star in &field.stars {
					prop_assert!((0.0..=1.0).contains(&star.opacity));
				}
			}
		}
	}
}
