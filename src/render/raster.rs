use crate::braille::BrailleCanvas;

/// Bresenham line between two dot positions
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        canvas.set_pixel_signed(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Filled disc, used for marker dots
pub fn fill_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Midpoint circle outline, used for the globe and atmosphere limbs
pub fn stroke_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    if radius <= 0 {
        canvas.set_pixel_signed(cx, cy);
        return;
    }
    let (mut x, mut y) = (radius, 0);
    let mut err = 1 - radius;
    while x >= y {
        for (px, py) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
            canvas.set_pixel_signed(cx + px, cy + py);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Connect a polyline, skipping gaps where a point is `None`
pub fn draw_polyline(canvas: &mut BrailleCanvas, points: impl IntoIterator<Item = Option<(i32, i32)>>, max_jump: i32) {
    let mut prev: Option<(i32, i32)> = None;
    for p in points {
        match (prev, p) {
            (Some((x0, y0)), Some((x1, y1))) if (x1 - x0).abs() + (y1 - y0).abs() <= max_jump => {
                draw_line(canvas, x0, y0, x1, y1);
            }
            (None, Some((x, y))) => canvas.set_pixel_signed(x, y),
            _ => {}
        }
        prev = p;
    }
}
