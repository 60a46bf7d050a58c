//! Firework pattern selection and launch timing.

use std::time::Duration;

use rand::Rng;

/// Fixed part of the delay between launches, in seconds.
const LAUNCH_DELAY_BASE: f64 = 3.0;

/// Random part of the delay between launches, in seconds.
const LAUNCH_DELAY_JITTER: std::ops::Range<f64> = 4.0..8.0;

/// Delay before the next firework launch: 7 to 11 seconds.
pub fn launch_delay<R: Rng>(rng: &mut R) -> Duration {
	Duration::from_secs_f64(LAUNCH_DELAY_BASE + rng.random_range(LAUNCH_DELAY_JITTER))
}

/// Draws every item once, in random order, before any item repeats.
///
/// The bag refills when it runs empty. The first draw after a refill never
/// repeats the draw just before it, unless the bag holds a single item.
#[derive(Clone, Debug)]
pub struct ShuffleBag<T> {
	items: Vec<T>,
	remaining: Vec<T>,
	last: Option<T>,
}

impl<T: Clone + PartialEq> ShuffleBag<T> {
	pub fn new(items: Vec<T>) -> Self {
		Self {
			remaining: items.clone(),
			items,
			last: None,
		}
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Items left before the next refill.
	pub fn remaining(&self) -> usize {
		self.remaining.len()
	}

	/// Take the next item, or `None` if the bag was built empty.
	pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<T> {
		if self.remaining.is_empty() {
			self.remaining = self.items.clone();
		}
		if self.remaining.is_empty() {
			return None;
		}
		let mut candidates: Vec<usize> = (0..self.remaining.len())
			.filter(|&i| self.last.as_ref() != Some(&self.remaining[i]))
			.collect();
		// Only repeats of the last draw are left.
		if candidates.is_empty() {
			candidates = (0..self.remaining.len()).collect();
		}
		let index = candidates[rng.random_range(0..candidates.len())];
		let item = self.remaining.swap_remove(index);
		self.last = Some(item.clone());
		Some(item)
	}
}
