mod geometry;
mod projection;
mod renderer;
mod spatial;

pub use geometry::{BBox, FillGrid, Polygon, Ring};
pub use projection::Viewport;
pub use renderer::{CountryShape, MapLayers, MapRenderer};
