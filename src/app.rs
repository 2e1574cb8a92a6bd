use crate::dashboard::Dashboard;
use crate::map::Viewport;
use crate::surface::{MapSurface, PointerTracker};
use crate::tooltip::Size;

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub surface: MapSurface,
    pub dashboard: Dashboard,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position (terminal column/row)
    pub mouse_pos: Option<(u16, u16)>,
    tracker: PointerTracker,
    /// Terminal size in cells
    screen: (u16, u16),
}

/// Map area inside the border and above the status bar, in characters
fn inner_size(width: u16, height: u16) -> (usize, usize) {
    (
        width.saturating_sub(2) as usize,
        height.saturating_sub(3) as usize, // 2 for border + 1 for status bar
    )
}

impl App {
    pub fn new(width: u16, height: u16, surface: MapSurface, dashboard: Dashboard) -> Self {
        let (inner_width, inner_height) = inner_size(width, height);

        Self {
            // Braille gives 2x4 dots per character
            viewport: Viewport::world(inner_width * 2, inner_height * 4),
            surface,
            dashboard,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            tracker: PointerTracker::new(),
            screen: (width, height),
        }
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        let (inner_width, inner_height) = inner_size(width, height);
        self.viewport.width = inner_width * 2;
        self.viewport.height = inner_height * 4;
        self.screen = (width, height);
        self.refresh_hover();
    }

    /// Terminal size used as the tooltip viewport
    pub fn screen_size(&self) -> Size {
        Size::new(self.screen.0 as f64, self.screen.1 as f64)
    }

    /// Back to the initial framing
    pub fn reset_view(&mut self) {
        self.viewport = Viewport::world(self.viewport.width, self.viewport.height);
        self.refresh_hover();
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
        self.refresh_hover();
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.refresh_hover();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.refresh_hover();
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = Self::cell_to_dot(col, row);
        self.viewport.zoom_in_at(px, py);
        self.refresh_hover();
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = Self::cell_to_dot(col, row);
        self.viewport.zoom_out_at(px, py);
        self.refresh_hover();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Shape currently under the pointer, catalog country or not
    pub fn pointed_shape(&self) -> Option<usize> {
        self.tracker.current()
    }

    /// Code of the shape under the pointer
    pub fn pointed_code(&self) -> Option<&str> {
        self.tracker
            .current()
            .and_then(|idx| self.surface.shape(idx))
            .map(|shape| shape.code.as_str())
    }

    /// Pan by the drag delta since the last drag event
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - x as i32;
            let dy = last_y as i32 - y as i32;
            // Less sensitive when zoomed out
            let scale = if self.viewport.zoom < 2.0 {
                2
            } else if self.viewport.zoom < 4.0 {
                3
            } else {
                4
            };
            self.viewport.pan(dx * scale, dy * scale);
        }
        self.last_mouse = Some((x, y));
        self.pointer_moved(x, y);
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Pointer moved to a terminal cell
    pub fn pointer_moved(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        self.refresh_hover();
    }

    /// Pointer left the terminal window
    pub fn pointer_left(&mut self) {
        self.mouse_pos = None;
        if let Some(event) = self.tracker.release() {
            self.dashboard.handle(event);
        }
    }

    /// Re-run hit testing at the last pointer position. Needed after any
    /// viewport change since the map moves under a still pointer.
    fn refresh_hover(&mut self) {
        let Some((col, row)) = self.mouse_pos else {
            return;
        };
        let hit = self.hit_test(col, row);
        let events = self.tracker.track(&self.surface, hit, col as f64, row as f64);
        self.dashboard.handle_all(events);
    }

    /// Shape drawn at a terminal cell, sampled at the cell center like the fill
    pub fn hit_test(&self, col: u16, row: u16) -> Option<usize> {
        let (inner_width, inner_height) = (self.viewport.width / 2, self.viewport.height / 4);
        if col == 0 || row == 0 || col as usize > inner_width || row as usize > inner_height {
            return None;
        }

        let px = (col - 1) as f64 * 2.0 + 1.0;
        let py = (row - 1) as f64 * 4.0 + 2.0;
        let (lon, lat) = self.viewport.unproject(px, py);
        self.surface.shape_at(lon, lat)
    }

    /// Terminal cell to dot coordinates, accounting for the 1-cell border
    fn cell_to_dot(col: u16, row: u16) -> (i32, i32) {
        let px = (col.saturating_sub(1) as i32) * 2;
        let py = (row.saturating_sub(1) as i32) * 4;
        (px, py)
    }
}
