use crate::app::App;
use crate::catalog::Rgb;
use crate::dashboard::Hover;
use crate::format::format_currency;
use crate::map::MapLayers;
use crate::tooltip::{PanelGeometry, PlacedPosition};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

const TEXT: Color = Color::Rgb(0x11, 0x18, 0x27);
const MUTED: Color = Color::Rgb(0x6B, 0x72, 0x80);
const SWATCH: Color = Color::Rgb(0xE5, 0xE7, 0xEB);
const PANEL_BG: Color = Color::Rgb(0xFF, 0xFF, 0xFF);

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
    render_tooltip(frame, app, area);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Revenue by Country ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app
        .surface
        .render(inner.width as usize, inner.height as usize, &viewport, app.pointed_shape());

    let fills = app
        .surface
        .shapes()
        .iter()
        .map(|shape| app.surface.fill_for(&shape.code))
        .collect();

    frame.render_widget(MapWidget { layers, fills }, inner);
    frame.render_widget(Legend, inner);
}

/// Choropleth fill as cell backgrounds with Braille border strokes on top
struct MapWidget {
    layers: MapLayers,
    /// Fill color per shape index
    fills: Vec<Rgb>,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = (area.height as usize).min(self.layers.fill.height());
        let cols = (area.width as usize).min(self.layers.fill.width());

        for row in 0..rows {
            for col in 0..cols {
                let bg = self
                    .layers
                    .fill
                    .get(col, row)
                    .and_then(|idx| self.fills.get(idx).copied())
                    .unwrap_or(Rgb::BACKGROUND);

                let (glyph, stroke) = match self.layers.highlight.glyph(col, row) {
                    Some(ch) => (ch, Rgb::STROKE_HOVER),
                    None => (self.layers.borders.glyph(col, row).unwrap_or(' '), Rgb::STROKE),
                };

                let x = area.x + col as u16;
                let y = area.y + row as u16;
                buf[(x, y)].set_char(glyph).set_fg(color(stroke)).set_bg(color(bg));
            }
        }
    }
}

/// Static legend pinned to the bottom-left of the map
struct Legend;

impl Legend {
    const ENTRIES: [&'static str; 2] = ["Company", "Administrator (Hi)"];
}

impl Widget for Legend {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = Self::ENTRIES.len() as u16;
        if area.height < height + 2 || area.width < 4 {
            return;
        }

        let top = area.bottom() - height - 1;
        for (i, label) in Self::ENTRIES.iter().enumerate() {
            let line = Line::from(vec![
                Span::styled("■ ", Style::default().fg(SWATCH)),
                Span::styled(*label, Style::default().fg(MUTED)),
            ]);
            buf.set_line(area.x + 2, top + i as u16, &line, area.width - 2);
        }
    }
}

/// Clip the placed panel to the drawable bounds. Placement may put the panel
/// partly off-screen in very small terminals.
pub fn panel_rect(pos: PlacedPosition, geometry: PanelGeometry, bounds: Rect) -> Option<Rect> {
    let left = pos.left.round() as i64;
    let top = pos.top.round() as i64;

    let x0 = left.max(bounds.x as i64);
    let y0 = top.max(bounds.y as i64);
    let x1 = (left + geometry.width as i64).min(bounds.right() as i64);
    let y1 = (top + geometry.height as i64).min(bounds.bottom() as i64);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16))
}

fn render_tooltip(frame: &mut Frame, app: &App, area: Rect) {
    let Some(hover) = app.dashboard.hover() else {
        return;
    };
    let Some(pos) = app.dashboard.placed(app.screen_size()) else {
        return;
    };
    let Some(rect) = panel_rect(pos, app.dashboard.geometry(), area) else {
        return;
    };

    frame.render_widget(Clear, rect);
    frame.render_widget(TooltipWidget { hover }, rect);
}

/// Country name, flag and total revenue
pub struct TooltipWidget<'a> {
    pub hover: &'a Hover,
}

impl Widget for TooltipWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(SWATCH))
            .style(Style::default().bg(PANEL_BG));

        let record = &self.hover.record;
        let lines = vec![
            Line::from(vec![
                Span::raw(format!("{} ", self.hover.flag)),
                Span::styled(
                    record.display_name.as_str(),
                    Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::default(),
            Line::from(Span::styled("Toplam Ciro", Style::default().fg(MUTED))),
            Line::from(Span::styled(
                format_currency(record.revenue_amount),
                Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
            )),
        ];

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hovered = app.pointed_code().unwrap_or("---");
    let hovered_color = match app.dashboard.hover() {
        Some(hover) => color(hover.record.fill_color),
        None => Color::DarkGray,
    };

    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(hovered.to_string(), Style::default().fg(hovered_color)),
        Span::styled(
            " | hjkl:pan +/-:zoom r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
