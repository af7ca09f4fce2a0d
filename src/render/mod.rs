mod palette;
mod raster;
mod renderer;

pub use palette::Palette;
pub use raster::{draw_line, draw_polyline, fill_circle, stroke_circle};
pub use renderer::{render_globe, GlobeLayers};
