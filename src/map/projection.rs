use std::f64::consts::PI;

/// Latitude limit of Web Mercator; beyond this y diverges
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 40.0;
const ZOOM_STEP: f64 = 1.5;

/// Visible map area in Braille dot units
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude
    pub center_lat: f64,
    /// Zoom level (1.0 = whole world fits the width)
    pub zoom: f64,
    /// Canvas dot width
    pub width: usize,
    /// Canvas dot height
    pub height: usize,
}

/// Normalized Web Mercator coordinates in [0, 1]
#[inline]
fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = (lon + 180.0) / 360.0;
    let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    (x, y)
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Initial dashboard framing: centered on 10°E 20°N at zoom 1
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(10.0, 20.0, 1.0, width, height)
    }

    #[inline]
    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    /// Pan by a dot delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = 360.0 / self.scale().max(1.0);
        self.center_lon += dx as f64 * scale;
        self.center_lat -= dy as f64 * scale * 0.5;

        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }

        self.center_lat = self.center_lat.clamp(-80.0, 80.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom in keeping the geography under (px, py) fixed
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    /// Zoom out keeping the geography under (px, py) fixed
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px as f64, py as f64);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        // Pan so the same point lands back under the pointer
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Dot coordinates back to (lon, lat)
    pub fn unproject(&self, px: f64, py: f64) -> (f64, f64) {
        let scale = self.scale();
        let (center_x, center_y) = mercator(self.center_lon, self.center_lat);

        let x = (px - self.width as f64 / 2.0) / scale + center_x;
        let y = (py - self.height as f64 / 2.0) / scale + center_y;

        let lon = x * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
        (lon, lat)
    }

    /// (lon, lat) to fractional dot coordinates
    #[inline]
    pub fn project_f(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = mercator(lon, lat);
        let (center_x, center_y) = mercator(self.center_lon, self.center_lat);
        let scale = self.scale();

        (
            (x - center_x) * scale + self.width as f64 / 2.0,
            (y - center_y) * scale + self.height as f64 / 2.0,
        )
    }

    /// (lon, lat) to integer dot coordinates
    #[inline]
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (x, y) = self.project_f(lon, lat);
        (x as i32, y as i32)
    }

    /// Rough bounding-box visibility check for a segment
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
    }

    #[test]
    fn test_world_view_center() {
        let vp = Viewport::world(200, 100);
        assert_eq!(vp.project(10.0, 20.0), (100, 50));
    }

    #[test]
    fn test_unproject_roundtrip() {
        let vp = Viewport::new(10.0, 20.0, 2.0, 320, 160);
        let (px, py) = vp.project_f(-75.0, 45.0);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon + 75.0).abs() < 1e-9);
        assert!((lat - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_poles_stay_finite() {
        let vp = Viewport::world(200, 100);
        let (_, y) = vp.project_f(0.0, -90.0);
        assert!(y.is_finite());
    }

    #[test]
    fn test_pan_and_zoom_limits() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);

        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, MAX_ZOOM);
        for _ in 0..50 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 400, 200);
        let before = vp.unproject(300.0, 60.0);
        vp.zoom_in_at(300, 60);
        let after = vp.unproject(300.0, 60.0);
        // Pan works in whole dots, so allow a dot of drift
        let tolerance = 360.0 / (vp.zoom * 400.0) * 2.0;
        assert!((before.0 - after.0).abs() < tolerance);
    }
}
