use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::time::Instant;

use crate::config::GlobeConfig;
use crate::globe::{Category, GlobeWidget, Location, PointerSource, TextureLoader};

/// Width of the side panel in terminal columns
const PANEL_WIDTH: u16 = 40;

/// Whether typed characters go to the search box
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Screen regions, recomputed on every resize
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppLayout {
    /// Globe pane including its border
    pub globe: Rect,
    /// Drawable globe canvas inside the border
    pub globe_inner: Rect,
    pub panel: Rect,
    pub tabs: Rect,
    pub search: Rect,
    pub heading: Rect,
    pub list: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(PANEL_WIDTH)])
            .split(rows[0]);

        let globe = cols[0];
        let panel = cols[1];
        let globe_inner = inset(globe);
        let panel_inner = inset(panel);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Category pills
                Constraint::Length(3), // Search box
                Constraint::Length(2), // Heading + count
                Constraint::Min(1),    // List
            ])
            .split(panel_inner);

        Self {
            globe,
            globe_inner,
            panel,
            tabs: parts[0],
            search: parts[1],
            heading: parts[2],
            list: parts[3],
            status: rows[1],
        }
    }

    /// Braille canvas size of the globe pane in dots
    pub fn canvas_pixels(&self) -> (usize, usize) {
        (self.globe_inner.width as usize * 2, self.globe_inner.height as usize * 4)
    }
}

fn inset(r: Rect) -> Rect {
    Rect {
        x: r.x.saturating_add(1),
        y: r.y.saturating_add(1),
        width: r.width.saturating_sub(2),
        height: r.height.saturating_sub(2),
    }
}

fn contains(r: Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

/// Application state: the mounted globe plus panel input state
pub struct App {
    pub widget: GlobeWidget,
    pub layout: AppLayout,
    pub input_mode: InputMode,
    pub search_input: String,
    /// Cursor into the visible location list
    pub list_cursor: usize,
    /// First list row on screen
    pub list_offset: usize,
    pub should_quit: bool,
    config: GlobeConfig,
    locations: Vec<Location>,
    loader: TextureLoader,
}

impl App {
    pub fn new(locations: Vec<Location>, dark_mode: bool, config: GlobeConfig, width: u16, height: u16) -> Self {
        let layout = AppLayout::compute(Rect::new(0, 0, width, height));
        let (pw, ph) = layout.canvas_pixels();
        let widget = GlobeWidget::new(locations.clone(), dark_mode, config.clone(), pw, ph);
        let mut app = Self {
            widget,
            layout,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            list_cursor: 0,
            list_offset: 0,
            should_quit: false,
            config,
            locations,
            loader: TextureLoader::new(),
        };
        app.pump_textures();
        app
    }

    /// Start queued texture loads and apply finished ones
    pub fn pump_textures(&mut self) {
        if let Some(req) = self.widget.take_texture_request() {
            log::debug!("requesting texture {} (dark={})", req.path.display(), req.dark_mode);
            self.loader.request(req);
        }
        while let Some(load) = self.loader.poll() {
            self.widget.apply_texture(load);
        }
    }

    /// Per-frame work: texture results and the fly-to animation
    pub fn update(&mut self, now: Instant) {
        self.pump_textures();
        self.widget.tick(now);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.layout = AppLayout::compute(Rect::new(0, 0, width, height));
        let (pw, ph) = self.layout.canvas_pixels();
        self.widget.resize(pw, ph);
        self.scroll_to_cursor();
    }

    /// Tear the widget down and mount a fresh one; everything resets
    pub fn remount(&mut self) {
        let dark_mode = self.widget.dark_mode();
        self.widget.teardown();
        let (pw, ph) = self.layout.canvas_pixels();
        self.widget = GlobeWidget::new(self.locations.clone(), dark_mode, self.config.clone(), pw, ph);
        self.input_mode = InputMode::Normal;
        self.search_input.clear();
        self.list_cursor = 0;
        self.list_offset = 0;
        self.pump_textures();
    }

    pub fn quit(&mut self) {
        self.widget.teardown();
        self.should_quit = true;
    }

    pub fn set_category(&mut self, category: Category) {
        self.widget.set_category(category);
        self.list_cursor = 0;
        self.list_offset = 0;
    }

    pub fn toggle_category(&mut self) {
        self.set_category(self.widget.category().other());
    }

    pub fn toggle_dark_mode(&mut self) {
        self.widget.set_dark_mode(!self.widget.dark_mode());
        self.pump_textures();
    }

    pub fn begin_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn end_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn search_push(&mut self, c: char) {
        self.search_input.push(c);
        self.apply_search();
    }

    pub fn search_pop(&mut self) {
        self.search_input.pop();
        self.apply_search();
    }

    pub fn search_clear(&mut self) {
        self.search_input.clear();
        self.apply_search();
    }

    fn apply_search(&mut self) {
        self.widget.set_search(&self.search_input);
        self.list_cursor = self.list_cursor.min(self.widget.visible_count().saturating_sub(1));
        self.scroll_to_cursor();
    }

    pub fn cursor_up(&mut self) {
        self.list_cursor = self.list_cursor.saturating_sub(1);
        self.scroll_to_cursor();
    }

    pub fn cursor_down(&mut self) {
        if self.list_cursor + 1 < self.widget.visible_count() {
            self.list_cursor += 1;
        }
        self.scroll_to_cursor();
    }

    fn list_rows(&self) -> usize {
        self.layout.list.height.max(1) as usize
    }

    fn scroll_to_cursor(&mut self) {
        let rows = self.list_rows();
        if self.list_cursor < self.list_offset {
            self.list_offset = self.list_cursor;
        } else if self.list_cursor >= self.list_offset + rows {
            self.list_offset = self.list_cursor + 1 - rows;
        }
    }

    /// Select the list item under the cursor
    pub fn select_cursor(&mut self, now: Instant) {
        let id = self.widget.visible_locations().nth(self.list_cursor).map(|l| l.id);
        if let Some(id) = id {
            self.widget.select_location(id, now);
        }
    }

    pub fn clear_selection(&mut self) {
        self.widget.clear_selection();
    }

    /// Terminal cell → globe canvas dot (center of the cell's 2x4 block)
    pub fn cell_to_canvas(&self, col: u16, row: u16) -> (f64, f64) {
        let inner = self.layout.globe_inner;
        let x = (col.saturating_sub(inner.x)) as f64 * 2.0 + 1.0;
        let y = (row.saturating_sub(inner.y)) as f64 * 4.0 + 2.0;
        (x, y)
    }

    pub fn mouse_down(&mut self, col: u16, row: u16, now: Instant) {
        if contains(self.layout.globe_inner, col, row) {
            let (x, y) = self.cell_to_canvas(col, row);
            self.widget.pointer_down(x, y, PointerSource::Mouse);
        } else if self.widget.selected().is_none() && contains(self.layout.list, col, row) {
            let idx = self.list_offset + (row - self.layout.list.y) as usize;
            if idx < self.widget.visible_count() {
                self.list_cursor = idx;
                self.select_cursor(now);
            }
        } else if contains(self.layout.tabs, col, row) && self.widget.selected().is_none() {
            let half = self.layout.tabs.x + self.layout.tabs.width / 2;
            self.set_category(if col < half { Category::Sales } else { Category::Technical });
        }
    }

    pub fn mouse_drag(&mut self, col: u16, row: u16) {
        if !self.widget.is_dragging() {
            return;
        }
        if contains(self.layout.globe_inner, col, row) {
            let (x, y) = self.cell_to_canvas(col, row);
            self.widget.pointer_move(x, y, PointerSource::Mouse);
        } else {
            self.widget.pointer_leave();
        }
    }

    pub fn mouse_up(&mut self, col: u16, row: u16, now: Instant) {
        if !self.widget.is_dragging() {
            return;
        }
        let (x, y) = self.cell_to_canvas(col, row);
        if self.widget.pointer_up(x, y, PointerSource::Mouse, now).is_some() {
            self.end_search();
        }
    }

    /// Status line text for the current orientation
    pub fn orientation_label(&self) -> String {
        let o = self.widget.orientation();
        format!("yaw {:.1}° pitch {:.1}°", o.yaw.to_degrees(), o.pitch.to_degrees())
    }
}
