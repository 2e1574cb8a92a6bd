use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_line, polygon_contains, BBox, FillGrid, Polygon, Ring};
use crate::map::projection::Viewport;
use crate::map::spatial::FeatureGrid;
use rayon::prelude::*;

/// Index grid cell size in degrees
const INDEX_CELL_DEG: f64 = 5.0;

/// One country's outline, keyed by its ISO alpha-3 code
#[derive(Clone, Debug)]
pub struct CountryShape {
    pub code: String,
    pub name: Option<String>,
    pub polygons: Vec<Polygon>,
    pub bbox: BBox,
}

impl CountryShape {
    /// Build a shape; `None` when the polygons carry no vertices
    pub fn new(code: impl Into<String>, name: Option<String>, polygons: Vec<Polygon>) -> Option<Self> {
        let bbox = BBox::of_polygons(&polygons)?;
        Some(Self {
            code: code.into(),
            name,
            polygons,
            bbox,
        })
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.bbox.contains(lon, lat)
            && self
                .polygons
                .iter()
                .any(|rings| polygon_contains(rings, lon, lat))
    }
}

/// Rasterized map for one frame
pub struct MapLayers {
    /// Shape index covering each character cell
    pub fill: FillGrid,
    /// Country border strokes
    pub borders: BrailleCanvas,
    /// Border strokes of the highlighted shape, drawn over `borders`
    pub highlight: BrailleCanvas,
}

/// Shape projected into dot space; polygons -> rings -> points
struct Projected {
    index: usize,
    polygons: Vec<Vec<Ring>>,
}

/// Country geometry with a spatial index for hit testing
pub struct MapRenderer {
    shapes: Vec<CountryShape>,
    index: FeatureGrid,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            index: FeatureGrid::new(INDEX_CELL_DEG),
        }
    }

    pub fn add_shape(&mut self, shape: CountryShape) {
        self.index.insert(self.shapes.len(), &shape.bbox);
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[CountryShape] {
        &self.shapes
    }

    pub fn shape(&self, idx: usize) -> Option<&CountryShape> {
        self.shapes.get(idx)
    }

    pub fn has_data(&self) -> bool {
        !self.shapes.is_empty()
    }

    /// Index of the shape containing (lon, lat). Later shapes paint over
    /// earlier ones, so the last match wins.
    pub fn shape_at(&self, lon: f64, lat: f64) -> Option<usize> {
        self.index
            .query_point(lon, lat)
            .iter()
            .copied()
            .filter(|&idx| self.shapes[idx].contains(lon, lat))
            .max()
    }

    /// Project every shape that overlaps the viewport
    fn project_visible(&self, viewport: &Viewport) -> Vec<Projected> {
        self.shapes
            .par_iter()
            .enumerate()
            .filter_map(|(index, shape)| {
                // Mercator is monotonic in both axes, so corners bound the shape
                let (x0, y0) = viewport.project(shape.bbox.min_lon, shape.bbox.max_lat);
                let (x1, y1) = viewport.project(shape.bbox.max_lon, shape.bbox.min_lat);
                if !viewport.line_might_be_visible((x0, y0), (x1, y1)) {
                    return None;
                }

                let polygons = shape
                    .polygons
                    .iter()
                    .map(|rings| {
                        rings
                            .iter()
                            .map(|ring| {
                                ring.iter()
                                    .map(|&(lon, lat)| viewport.project_f(lon, lat))
                                    .collect::<Ring>()
                            })
                            .collect::<Vec<Ring>>()
                    })
                    .collect::<Vec<_>>();
                Some(Projected { index, polygons })
            })
            .collect()
    }

    /// Rasterize fills and borders into a `cols` x `rows` character area
    pub fn render(&self, cols: usize, rows: usize, viewport: &Viewport, highlight: Option<usize>) -> MapLayers {
        let mut layers = MapLayers {
            fill: FillGrid::new(cols, rows),
            borders: BrailleCanvas::new(cols, rows),
            highlight: BrailleCanvas::new(cols, rows),
        };

        let projected = self.project_visible(viewport);

        for shape in &projected {
            for rings in &shape.polygons {
                // Dots are 2 wide and 4 tall per cell
                let cell_rings: Vec<Ring> = rings
                    .iter()
                    .map(|ring| ring.iter().map(|&(x, y)| (x / 2.0, y / 4.0)).collect::<Ring>())
                    .collect();
                layers.fill.fill_polygon(&cell_rings, shape.index);
            }
        }

        for shape in &projected {
            let canvas = if Some(shape.index) == highlight {
                &mut layers.highlight
            } else {
                &mut layers.borders
            };
            for ring in shape.polygons.iter().flatten() {
                draw_ring(canvas, ring, viewport);
            }
        }

        layers
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Stroke a projected ring, skipping segments that jump across the map
fn draw_ring(canvas: &mut BrailleCanvas, ring: &[(f64, f64)], viewport: &Viewport) {
    if ring.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;
    for &(x, y) in ring {
        let (px, py) = (x as i32, y as i32);
        if let Some((prev_x, prev_y)) = prev {
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }
        prev = Some((px, py));
    }
}
