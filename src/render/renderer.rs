use ratatui::style::Color;

use super::palette::Palette;
use super::raster::{draw_polyline, fill_circle, stroke_circle};
use crate::braille::BrailleCanvas;
use crate::globe::{GlobeWidget, Shape};

/// One frame of the globe, split by color so the UI can paint back to front
pub struct GlobeLayers {
    pub atmosphere: BrailleCanvas,
    pub limb: BrailleCanvas,
    pub surface: BrailleCanvas,
    pub glow: BrailleCanvas,
    pub dots: BrailleCanvas,
    pub selected: BrailleCanvas,
    pub palette: Palette,
    pub marker_color: Color,
    pub glow_color: Color,
    /// Markers drawn this frame (front hemisphere only)
    pub drawn_markers: usize,
}

/// Rasterise the widget's scene onto `cols` x `rows` Braille cells.
/// The widget camera is expected to already match that canvas size.
pub fn render_globe(widget: &GlobeWidget, cols: usize, rows: usize) -> GlobeLayers {
    let camera = widget.camera();
    let config = widget.config();
    let dark_mode = widget.dark_mode();
    let palette = Palette::for_mode(dark_mode);
    let rotation = widget.orientation().matrix();
    let selected_id = widget.selected().map(|l| l.id);

    let mut layers = GlobeLayers {
        atmosphere: BrailleCanvas::new(cols, rows),
        limb: BrailleCanvas::new(cols, rows),
        surface: BrailleCanvas::new(cols, rows),
        glow: BrailleCanvas::new(cols, rows),
        dots: BrailleCanvas::new(cols, rows),
        selected: BrailleCanvas::new(cols, rows),
        palette,
        marker_color: palette.marker(widget.category(), dark_mode),
        glow_color: palette.glow(widget.category(), dark_mode),
        drawn_markers: 0,
    };

    let to_px = |(x, y): (f64, f64)| (x.round() as i32, y.round() as i32);

    // Limbs: sphere silhouettes around the projected origin
    if let Some(center) = camera.project(glam::DVec3::ZERO) {
        let (cx, cy) = to_px(center);
        let atmosphere_r = camera.silhouette_radius(config.atmosphere_radius).round() as i32;
        let globe_r = camera.silhouette_radius(config.globe_radius).round() as i32;
        stroke_circle(&mut layers.atmosphere, cx, cy, atmosphere_r);
        stroke_circle(&mut layers.limb, cx, cy, globe_r);
    }

    // Surface linework, front hemisphere only
    let max_jump = (camera.width.max(camera.height) / 2) as i32;
    if let Some(texture) = widget.texture() {
        for line in &texture.lines {
            let points = line.iter().map(|p| {
                let world = rotation * (*p * config.globe_radius);
                if camera.faces(world) {
                    camera.project(world).map(to_px)
                } else {
                    None
                }
            });
            draw_polyline(&mut layers.surface, points, max_jump);
        }
    }

    // Markers. Back-facing ones are hidden by the globe but stay pickable.
    for (_, mesh) in widget.markers().iter() {
        let world_center = rotation * mesh.shape.center();
        if !camera.faces(world_center) {
            continue;
        }
        let is_selected = selected_id == Some(mesh.location_id);
        match &mesh.shape {
            Shape::Dot { radius, .. } => {
                let Some(pos) = camera.project(world_center) else {
                    continue;
                };
                let (x, y) = to_px(pos);
                let r = camera.pixels_at(world_center, *radius).round().max(0.0) as i32;
                if is_selected {
                    fill_circle(&mut layers.selected, x, y, r + 1);
                } else {
                    fill_circle(&mut layers.dots, x, y, r);
                }
                layers.drawn_markers += 1;
            }
            Shape::Ring { outline, .. } => {
                let canvas = if is_selected { &mut layers.selected } else { &mut layers.glow };
                let closed = outline.iter().chain(outline.first());
                let points = closed.map(|p| camera.project(rotation * *p).map(to_px));
                draw_polyline(canvas, points, max_jump);
            }
        }
    }

    layers
}
