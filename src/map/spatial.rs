use crate::map::geometry::BBox;
use std::collections::HashMap;

/// Bounding-box index over country shapes.
/// Each shape is inserted into every cell its bbox overlaps, so a point query
/// never misses a shape but may return ones that do not contain the point.
pub struct FeatureGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl FeatureGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Build from shape bounding boxes; indices follow iteration order
    pub fn build<'a>(bboxes: impl Iterator<Item = &'a BBox>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, bbox) in bboxes.enumerate() {
            grid.insert(idx, bbox);
        }
        grid
    }

    pub fn insert(&mut self, idx: usize, bbox: &BBox) {
        let min_cell = self.to_cell(bbox.min_lon, bbox.min_lat);
        let max_cell = self.to_cell(bbox.max_lon, bbox.max_lat);
        for y in min_cell.1..=max_cell.1 {
            for x in min_cell.0..=max_cell.0 {
                self.cells.entry((x, y)).or_default().push(idx);
            }
        }
    }

    /// Candidate shape indices for a point
    pub fn query_point(&self, lon: f64, lat: f64) -> &[usize] {
        self.cells
            .get(&self.to_cell(lon, lat))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> BBox {
        BBox {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    #[test]
    fn test_query_point() {
        let boxes = [bbox(-10.0, -10.0, 10.0, 10.0), bbox(30.0, 30.0, 35.0, 35.0)];
        let grid = FeatureGrid::build(boxes.iter(), 10.0);

        assert_eq!(grid.query_point(0.0, 0.0), &[0]);
        assert_eq!(grid.query_point(-9.0, 9.0), &[0]);
        assert_eq!(grid.query_point(32.0, 33.0), &[1]);
        assert!(grid.query_point(100.0, 0.0).is_empty());
    }

    #[test]
    fn test_overlapping_boxes_share_cells() {
        let boxes = [bbox(0.0, 0.0, 5.0, 5.0), bbox(2.0, 2.0, 8.0, 8.0)];
        let grid = FeatureGrid::build(boxes.iter(), 10.0);
        assert_eq!(grid.query_point(3.0, 3.0), &[0, 1]);
    }
}
