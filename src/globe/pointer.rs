/// Where a pointer event came from. Touch follows the exact same rules as
/// the mouse; the tag only shows up in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Outcome of a pointer release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Release {
    /// Released without dragging: pick at this position
    Click { x: f64, y: f64 },
    /// The gesture was a drag
    DragEnd,
    /// Release without a matching press
    Ignored,
}

/// Press/drag/release tracking for one pointer.
#[derive(Clone, Debug, Default)]
pub struct DragGesture {
    last: Option<(f64, f64)>,
    /// Sum of |dx| + |dy| since the press
    travel: f64,
    has_dragged: bool,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    pub fn has_dragged(&self) -> bool {
        self.has_dragged
    }

    pub fn press(&mut self, x: f64, y: f64) {
        self.last = Some((x, y));
        self.travel = 0.0;
        self.has_dragged = false;
    }

    /// Delta since the previous move, or `None` when not dragging.
    /// Marks the gesture as a drag once the accumulated movement exceeds
    /// `threshold`.
    pub fn motion(&mut self, x: f64, y: f64, threshold: f64) -> Option<(f64, f64)> {
        let (lx, ly) = self.last?;
        let dx = x - lx;
        let dy = y - ly;
        self.travel += dx.abs() + dy.abs();
        if self.travel > threshold {
            self.has_dragged = true;
        }
        self.last = Some((x, y));
        Some((dx, dy))
    }

    pub fn release(&mut self, x: f64, y: f64) -> Release {
        if self.last.take().is_none() {
            return Release::Ignored;
        }
        if self.has_dragged {
            Release::DragEnd
        } else {
            Release::Click { x, y }
        }
    }

    /// Pointer left the surface: drop the gesture without a click.
    pub fn leave(&mut self) {
        self.last = None;
    }
}
