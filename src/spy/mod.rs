//! Spy plots: layout, rasterisation and display

pub mod config;
pub mod layout;
pub mod render;
pub mod window;

pub use config::{FigureParameters, SpyConfig};
pub use layout::{markers, x_ticks, Marker, SpyPlot};
pub use render::{render_rgb, render_with_placement, Placement, Raster};
pub use window::show;
