use crate::braille::BrailleCanvas;

/// Closed ring of (lon, lat) or projected (x, y) vertices
pub type Ring = Vec<(f64, f64)>;

/// Polygon as exterior ring followed by holes
pub type Polygon = Vec<Ring>;

/// Geographic bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BBox {
    /// Bounding box of every vertex in the polygons, `None` if there are none
    pub fn of_polygons(polygons: &[Polygon]) -> Option<Self> {
        let mut points = polygons.iter().flatten().flatten();
        let &(lon, lat) = points.next()?;
        let init = BBox {
            min_lon: lon,
            min_lat: lat,
            max_lon: lon,
            max_lat: lat,
        };
        Some(points.fold(init, |b, &(lon, lat)| BBox {
            min_lon: b.min_lon.min(lon),
            min_lat: b.min_lat.min(lat),
            max_lon: b.max_lon.max(lon),
            max_lat: b.max_lat.max(lat),
        }))
    }

    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

/// Even-odd point-in-polygon over all rings, so holes are excluded
pub fn polygon_contains(rings: &[Ring], x: f64, y: f64) -> bool {
    let mut inside = false;
    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = ring[i];
            let (xj, yj) = ring[j];
            if (yi > y) != (yj > y) && x < xj + (y - yj) / (yi - yj) * (xi - xj) {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}

/// Per-cell shape index produced by polygon fill
pub struct FillGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<usize>>,
}

impl FillGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells[row * self.width + col]
    }

    #[inline]
    fn set(&mut self, col: usize, row: usize, value: usize) {
        self.cells[row * self.width + col] = Some(value);
    }

    /// Scanline fill of one polygon given in cell coordinates.
    /// A cell is covered when its center lies inside (even-odd rule).
    pub fn fill_polygon(&mut self, rings: &[Ring], value: usize) {
        let (min_y, max_y) = rings
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
        if !min_y.is_finite() || !max_y.is_finite() || self.width == 0 {
            return;
        }

        let last_row = (max_y - 0.5).floor().min(self.height as f64 - 1.0);
        if last_row < 0.0 {
            return;
        }
        let first_row = (min_y - 0.5).ceil().max(0.0) as usize;
        let last_row = last_row as usize;

        let mut crossings = Vec::new();
        for row in first_row..=last_row {
            let y = row as f64 + 0.5;
            crossings.clear();

            for ring in rings {
                let n = ring.len();
                if n < 3 {
                    continue;
                }
                for i in 0..n {
                    let (x0, y0) = ring[i];
                    let (x1, y1) = ring[(i + 1) % n];
                    if (y0 <= y) != (y1 <= y) {
                        crossings.push(x0 + (y - y0) / (y1 - y0) * (x1 - x0));
                    }
                }
            }

            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0);
                let end = (span[1] - 0.5).floor().min(self.width as f64 - 1.0);
                if end < start {
                    continue;
                }
                for col in start as usize..=end as usize {
                    self.set(col, row, value);
                }
            }
        }
    }
}

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]
    }

    #[test]
    fn test_contains_with_hole() {
        let rings = vec![square(0.0, 0.0, 10.0, 10.0), square(4.0, 4.0, 6.0, 6.0)];
        assert!(polygon_contains(&rings, 1.0, 1.0));
        assert!(!polygon_contains(&rings, 5.0, 5.0));
        assert!(!polygon_contains(&rings, 11.0, 5.0));
    }

    #[test]
    fn test_bbox() {
        let polys = vec![vec![square(-5.0, 2.0, 3.0, 8.0)]];
        let bbox = BBox::of_polygons(&polys).unwrap();
        assert_eq!(bbox.min_lon, -5.0);
        assert_eq!(bbox.max_lat, 8.0);
        assert!(bbox.contains(0.0, 5.0));
        assert!(BBox::of_polygons(&[]).is_none());
    }

    #[test]
    fn test_fill_square() {
        let mut grid = FillGrid::new(6, 4);
        grid.fill_polygon(&[square(1.0, 1.0, 4.0, 3.0)], 7);
        // Cell centers 1.5..3.5 horizontally, 1.5..2.5 vertically
        for row in 0..4 {
            for col in 0..6 {
                let expected = (1..=3).contains(&col) && (1..=2).contains(&row);
                assert_eq!(grid.get(col, row) == Some(7), expected, "cell {col},{row}");
            }
        }
    }

    #[test]
    fn test_fill_clips_to_grid() {
        let mut grid = FillGrid::new(3, 3);
        grid.fill_polygon(&[square(-10.0, -10.0, 10.0, 10.0)], 1);
        assert_eq!(grid.get(0, 0), Some(1));
        assert_eq!(grid.get(2, 2), Some(1));

        let mut offscreen = FillGrid::new(3, 3);
        offscreen.fill_polygon(&[square(5.0, 5.0, 9.0, 9.0)], 1);
        assert!((0..3).all(|r| (0..3).all(|c| offscreen.get(c, r).is_none())));
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }
}
