use crate::app::{App, InputMode};
use crate::braille::BrailleCanvas;
use crate::globe::{Category, Location};
use crate::render::{render_globe, GlobeLayers, Palette};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_mode(app.widget.dark_mode());
    render_globe_pane(frame, app, &palette);
    render_panel(frame, app, &palette);
    render_status_bar(frame, app, &palette);
}

fn render_globe_pane(frame: &mut Frame, app: &App, palette: &Palette) {
    let layout = &app.layout;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(
            " Office Globe ",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(block, layout.globe);

    let inner = layout.globe_inner;
    let layers = render_globe(&app.widget, inner.width as usize, inner.height as usize);
    frame.render_widget(GlobeCanvasWidget { layers }, inner);

    if !app.widget.is_loaded() {
        let msg = "Loading Earth Texture...";
        let w = (msg.len() as u16 + 4).min(inner.width);
        let area = Rect {
            x: inner.x + inner.width.saturating_sub(w) / 2,
            y: inner.y + inner.height / 2,
            width: w,
            height: 1.min(inner.height),
        };
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(msg)
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.text)),
            area,
        );
    }
}

/// Braille layers painted back to front
struct GlobeCanvasWidget {
    layers: GlobeLayers,
}

impl GlobeCanvasWidget {
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                if let Some(ch) = canvas.cell(col as usize, row as usize) {
                    buf[(area.x + col, area.y + row)].set_char(ch).set_fg(color);
                }
            }
        }
    }
}

impl Widget for GlobeCanvasWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let l = &self.layers;
        let p = &l.palette;
        Self::render_layer(&l.atmosphere, p.atmosphere, area, buf);
        Self::render_layer(&l.limb, p.limb, area, buf);
        Self::render_layer(&l.surface, p.surface, area, buf);
        Self::render_layer(&l.glow, l.glow_color, area, buf);
        Self::render_layer(&l.dots, l.marker_color, area, buf);
        Self::render_layer(&l.selected, p.selected, area, buf);
    }
}

fn render_panel(frame: &mut Frame, app: &App, palette: &Palette) {
    let layout = &app.layout;
    let selected = app.widget.selected();
    let border = if selected.is_some() { palette.selected } else { palette.border };
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
        layout.panel,
    );

    match selected {
        Some(loc) => render_details(frame, loc, palette, layout_inner(layout.panel)),
        None => render_list(frame, app, palette),
    }
}

fn layout_inner(r: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(r)
}

fn render_list(frame: &mut Frame, app: &App, palette: &Palette) {
    let layout = &app.layout;
    let active = app.widget.category();

    // Category pills
    let pill = |cat: Category| {
        let style = if cat == active {
            Style::default().fg(Color::White).bg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.dim_text)
        };
        Span::styled(format!(" {} ", cat.label()), style)
    };
    let tabs = Line::from(vec![pill(Category::Sales), Span::raw("  "), pill(Category::Technical)]);
    frame.render_widget(Paragraph::new(tabs).alignment(Alignment::Center), layout.tabs);

    // Search box
    let searching = app.input_mode == InputMode::Search;
    let search_text = if app.search_input.is_empty() && !searching {
        Span::styled("Search locations...", Style::default().fg(palette.dim_text))
    } else {
        Span::styled(
            format!("{}{}", app.search_input, if searching { "▏" } else { "" }),
            Style::default().fg(palette.text),
        )
    };
    let search_border = if searching { palette.accent } else { palette.border };
    frame.render_widget(
        Paragraph::new(Line::from(search_text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(search_border))
                .title(" / "),
        ),
        layout.search,
    );

    // Heading and count
    let count = app.widget.visible_count();
    let heading = vec![
        Line::from(Span::styled(
            active.heading(),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} location{} {}",
                count,
                if count == 1 { "" } else { "s" },
                if app.search_input.trim().is_empty() { "worldwide" } else { "found" }
            ),
            Style::default().fg(palette.dim_text),
        )),
    ];
    frame.render_widget(Paragraph::new(heading).alignment(Alignment::Center), layout.heading);

    // List
    if count == 0 {
        frame.render_widget(
            Paragraph::new("No locations found")
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.dim_text)),
            layout.list,
        );
        return;
    }

    let rows = layout.list.height as usize;
    let lines: Vec<Line> = app
        .widget
        .visible_locations()
        .enumerate()
        .skip(app.list_offset)
        .take(rows)
        .map(|(i, loc)| {
            let marker = if i == app.list_cursor { "▶ " } else { "  " };
            let city_style = if i == app.list_cursor {
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(palette.accent)),
                Span::styled(loc.city.clone(), city_style),
                Span::styled(format!("  {}", loc.name), Style::default().fg(palette.dim_text)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), layout.list);
}

fn render_details(frame: &mut Frame, loc: &Location, palette: &Palette, area: Rect) {
    let label = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);
    let text = Style::default().fg(palette.text);
    let dim = Style::default().fg(palette.dim_text);

    let lines = vec![
        Line::from(Span::styled(
            format!("{} LOCATION", loc.category.label().to_uppercase()),
            label,
        )),
        Line::from(Span::styled(loc.city.clone(), text.add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(loc.name.clone(), dim)),
        Line::from(""),
        Line::from(Span::styled("FUNCTION", label)),
        Line::from(Span::styled(loc.description.clone(), text)),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{:>6}", loc.offices), text.add_modifier(Modifier::BOLD)),
            Span::styled(" Offices   ", dim),
            Span::styled(format!("{:>6}", loc.employees), text.add_modifier(Modifier::BOLD)),
            Span::styled(" Employees", dim),
        ]),
        Line::from(""),
        Line::from(Span::styled("[x] close", dim)),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette) {
    let dim = Style::default().fg(Color::DarkGray);
    let status = Line::from(vec![
        Span::styled(" ", dim),
        Span::styled(app.widget.category().label(), Style::default().fg(palette.accent)),
        Span::styled(format!(" {} markers ", app.widget.visible_count()), dim),
        Span::styled("| ", dim),
        Span::styled(app.orientation_label(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", dim),
        Span::styled(
            if app.widget.dark_mode() { "[D]ark" } else { "[d]ark" },
            Style::default().fg(if app.widget.dark_mode() { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(
            " | tab:category /:search ↑↓:list enter:select x:close r:reset q:quit",
            dim,
        ),
    ]);
    frame.render_widget(Paragraph::new(status), app.layout.status);
}
