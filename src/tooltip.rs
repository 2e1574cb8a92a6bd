//! Floating tooltip placement.
//!
//! The panel is anchored just right of the pointer and vertically centered on
//! it, then pushed back inside the viewport. All coordinates share one unit
//! (pixels for the web geometry, terminal cells for the TUI geometry).

/// Pointer position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Viewport dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of the placed panel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedPosition {
    pub left: f64,
    pub top: f64,
}

/// Fixed panel dimensions and spacing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelGeometry {
    pub width: f64,
    pub height: f64,
    /// Minimum gap to keep between the panel and the viewport edge
    pub padding: f64,
    /// Horizontal gap between the pointer and the panel
    pub offset: f64,
}

impl PanelGeometry {
    /// Browser geometry in CSS pixels
    pub const PIXELS: PanelGeometry = PanelGeometry {
        width: 180.0,
        height: 120.0,
        padding: 20.0,
        offset: 15.0,
    };

    /// Terminal geometry in character cells
    pub const CELLS: PanelGeometry = PanelGeometry {
        width: 24.0,
        height: 6.0,
        padding: 1.0,
        offset: 2.0,
    };

    /// Smallest viewport in which placement is guaranteed to stay inside the padding
    pub fn min_viewport(&self) -> Size {
        Size::new(
            2.0 * self.padding + self.width,
            2.0 * self.padding + self.height,
        )
    }

    /// Compute the panel position for a pointer.
    ///
    /// The right-edge flip is applied once and not re-checked, so a viewport
    /// narrower than the panel may still clip on the left. Vertically the
    /// bottom clamp wins over the top clamp when the viewport is too short.
    pub fn place(&self, pointer: Point, viewport: Size) -> PlacedPosition {
        let mut left = pointer.x + self.offset;
        let mut top = pointer.y - self.height / 2.0;

        if left + self.width > viewport.width - self.padding {
            left = pointer.x - self.width - self.offset;
        }

        if top < self.padding {
            top = self.padding;
        }

        if top + self.height > viewport.height - self.padding {
            top = viewport.height - self.height - self.padding;
        }

        PlacedPosition { left, top }
    }
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self::CELLS
    }
}
