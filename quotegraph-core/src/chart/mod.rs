//! Chart rendering and image encoding

pub mod codec;
pub mod font;
pub mod render;

pub use codec::{blank, decode, encode, placeholder_png, PLACEHOLDER_SIZE};
pub use render::{ChartRenderer, MIN_POINTS};
