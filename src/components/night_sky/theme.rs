//! Visual theming for the night sky.
//!
//! Provides the color type, the sky gradient anchors and the fixed styling of
//! stars and detonation flashes.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Linear interpolation between two colors, rounded per channel.
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// Like [`Color::lerp`] but `t` may leave `[0, 1]`. Channels saturate at `0..=255`.
	pub fn extrapolate(self, other: Color, t: f64) -> Self {
		let mix = |from: u8, to: u8| {
			(from as f64 + (to as f64 - from as f64) * t)
				.round()
				.clamp(0.0, 255.0) as u8
		};
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: (self.a * (1.0 - t) + other.a * t).clamp(0.0, 1.0),
		}
	}

	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// A fixed anchor of the sky gradient, positioned as a fraction of page height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
	/// Fraction of the full page height, in `[0, 1]`.
	pub position: f64,
	pub color: Color,
}

impl GradientStop {
	pub const fn new(position: f64, r: u8, g: u8, b: u8) -> Self {
		Self {
			position,
			color: Color::rgb(r, g, b),
		}
	}
}

/// Styling of the full-surface flash drawn after a detonation.
#[derive(Clone, Debug)]
pub struct FlashStyle {
	pub color: Color,
	/// Number of frames the overlay stays up after each trigger.
	pub frames: u32,
}

/// Styling of the ambient stars.
#[derive(Clone, Debug)]
pub struct StarStyle {
	pub color: Color,
	/// Edge length of the square drawn for each star, in device pixels.
	pub size: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct SkyTheme {
	pub name: &'static str,
	/// Gradient anchors ordered by position, first at 0 and last at 1.
	pub gradient: Vec<GradientStop>,
	pub flash: FlashStyle,
	pub stars: StarStyle,
	/// Browser chrome color matching the top of the sky.
	pub page_color: Color,
}

impl SkyTheme {
	/// Dusk purple fading into night blue.
	pub fn dusk() -> Self {
		Self {
			name: "dusk",
			gradient: vec![
				GradientStop::new(0.0, 40, 31, 56),
				GradientStop::new(0.7, 48, 35, 107),
				GradientStop::new(1.0, 56, 59, 102),
			],
			flash: FlashStyle {
				color: Color::rgba(255, 255, 255, 0.04),
				frames: 2,
			},
			stars: StarStyle {
				color: Color::WHITE,
				size: 2.0,
			},
			page_color: Color::rgb(40, 31, 56),
		}
	}
}

impl Default for SkyTheme {
	fn default() -> Self {
		Self::dusk()
	}
}
