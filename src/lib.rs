pub mod accumulator;
pub mod border;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod flow;
pub mod gradient;
pub mod grid;
pub mod math;
pub mod packing;
pub mod patterns;
pub mod pipeline;
pub mod rand;
pub mod raster;

pub use config::{Config, Settings};
pub use error::HalftoneError;
pub use pipeline::render;
pub use raster::Raster;
