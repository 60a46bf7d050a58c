//! Page-level visual components.

pub mod night_sky;
