//! Animated night sky background.
//!
//! Draws a full-window canvas behind the page with:
//! - A sky gradient that scrolls with the page through a sky taller than the window
//! - Twinkling stars scrolling with parallax depth
//! - Periodic fireworks bursting into particles tinted from pattern images
//!
//! The simulation is host-independent: it draws through [`render::Painter`]
//! and realises bitmaps through [`tint::BitmapSink`], with the browser
//! implementations living in [`render`].
//!
//! # Example
//!
//! ```ignore
//! use night_sky::{NightSkyCanvas, PageHint};
//!
//! let (hint, set_hint) = signal(PageHint::default());
//! view! { <NightSkyCanvas hint=set_hint /> }
//! ```

mod assets;
mod background;
mod component;
mod firework;
mod particle;
pub mod render;
mod scheduler;
mod simulator;
mod starfield;
pub mod theme;
pub mod tint;
mod types;
mod viewport;

#[cfg(test)]
mod test_support;

pub use assets::{Assets, LoadError, load_assets};
pub use component::NightSkyCanvas;
pub use render::{Bitmap, Painter, Rect};
pub use simulator::Simulator;
pub use theme::{Color, SkyTheme};
pub use tint::BitmapSink;
pub use types::{PageHint, PageMetrics, Pixels, SkyConfig};
pub use viewport::Viewport;
