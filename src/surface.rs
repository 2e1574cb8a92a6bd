use crate::catalog::{Rgb, RevenueCatalog};
use crate::map::{CountryShape, MapLayers, MapRenderer, Viewport};
use std::sync::Arc;

/// Pointer callbacks emitted by the map surface
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer crossed into a country shape
    Enter { code: String, x: f64, y: f64 },
    /// Pointer moved within the current shape
    Move { x: f64, y: f64 },
    /// Pointer left the current shape
    Leave,
}

/// Country shapes colored from the revenue catalog.
/// Holds no hover state; see [`PointerTracker`].
pub struct MapSurface {
    geography: MapRenderer,
    catalog: Arc<RevenueCatalog>,
}

impl MapSurface {
    pub fn new(geography: MapRenderer, catalog: Arc<RevenueCatalog>) -> Self {
        Self { geography, catalog }
    }

    pub fn catalog(&self) -> &RevenueCatalog {
        &self.catalog
    }

    pub fn shapes(&self) -> &[CountryShape] {
        self.geography.shapes()
    }

    pub fn shape(&self, idx: usize) -> Option<&CountryShape> {
        self.geography.shape(idx)
    }

    /// Catalog color for listed countries, the neutral fill otherwise
    pub fn fill_for(&self, code: &str) -> Rgb {
        self.catalog
            .lookup(code)
            .map(|record| record.fill_color)
            .unwrap_or(Rgb::NEUTRAL)
    }

    /// Fill color for a shape index
    pub fn fill_for_shape(&self, idx: usize) -> Rgb {
        self.geography
            .shape(idx)
            .map(|shape| self.fill_for(&shape.code))
            .unwrap_or(Rgb::NEUTRAL)
    }

    pub fn is_active(&self, idx: usize) -> bool {
        self.geography
            .shape(idx)
            .is_some_and(|shape| self.catalog.lookup(&shape.code).is_some())
    }

    /// Shape under a geographic position
    pub fn shape_at(&self, lon: f64, lat: f64) -> Option<usize> {
        self.geography.shape_at(lon, lat)
    }

    /// Rasterize the map. Only an active hovered shape gets the highlight stroke.
    pub fn render(&self, cols: usize, rows: usize, viewport: &Viewport, hovered: Option<usize>) -> MapLayers {
        let highlight = hovered.filter(|&idx| self.is_active(idx));
        self.geography.render(cols, rows, viewport, highlight)
    }
}

/// Turns raw pointer positions into Enter / Move / Leave callbacks.
/// Crossing from one shape straight into another yields Leave then Enter.
#[derive(Debug, Default)]
pub struct PointerTracker {
    current: Option<usize>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape the pointer is currently over
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Feed the shape hit at screen position (x, y)
    pub fn track(&mut self, surface: &MapSurface, hit: Option<usize>, x: f64, y: f64) -> Vec<PointerEvent> {
        let mut events = Vec::with_capacity(2);

        if hit == self.current {
            if hit.is_some() {
                events.push(PointerEvent::Move { x, y });
            }
            return events;
        }

        if self.current.is_some() {
            events.push(PointerEvent::Leave);
        }

        self.current = None;
        if let Some((idx, shape)) = hit.and_then(|idx| surface.shape(idx).map(|shape| (idx, shape))) {
            self.current = Some(idx);
            events.push(PointerEvent::Enter {
                code: shape.code.clone(),
                x,
                y,
            });
        }

        events
    }

    /// Pointer left the map entirely
    pub fn release(&mut self) -> Option<PointerEvent> {
        self.current.take().map(|_| PointerEvent::Leave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> MapSurface {
        let mut geography = MapRenderer::new();
        for (code, lon0, lon1) in [("CAN", -140.0, -60.0), ("FRA", -5.0, 8.0), ("DEU", 8.0, 15.0)] {
            let ring = vec![(lon0, 40.0), (lon1, 40.0), (lon1, 60.0), (lon0, 60.0), (lon0, 40.0)];
            geography.add_shape(CountryShape::new(code, None, vec![vec![ring]]).unwrap());
        }
        MapSurface::new(geography, Arc::new(RevenueCatalog::builtin()))
    }

    #[test]
    fn test_fill_colors() {
        let surface = surface();
        assert_eq!(surface.fill_for("FRA"), Rgb::NEUTRAL);
        assert_eq!(surface.fill_for("CAN"), Rgb(0x9D, 0xCE, 0xDC));

        let fra = surface.shape_at(0.0, 50.0).unwrap();
        assert_eq!(surface.shape(fra).unwrap().code, "FRA");
        assert_eq!(surface.fill_for_shape(fra), Rgb::NEUTRAL);
        assert!(!surface.is_active(fra));
        assert!(surface.is_active(surface.shape_at(-100.0, 50.0).unwrap()));
    }

    #[test]
    fn test_tracker_sequence() {
        let surface = surface();
        let mut tracker = PointerTracker::new();
        let can = surface.shape_at(-100.0, 50.0);
        let fra = surface.shape_at(0.0, 50.0);
        let deu = surface.shape_at(10.0, 50.0);

        // Over water: nothing
        assert!(tracker.track(&surface, None, 1.0, 1.0).is_empty());

        assert_eq!(
            tracker.track(&surface, can, 5.0, 6.0),
            vec![PointerEvent::Enter { code: "CAN".into(), x: 5.0, y: 6.0 }]
        );
        assert_eq!(
            tracker.track(&surface, can, 7.0, 6.0),
            vec![PointerEvent::Move { x: 7.0, y: 6.0 }]
        );
        assert_eq!(tracker.track(&surface, None, 9.0, 6.0), vec![PointerEvent::Leave]);

        tracker.track(&surface, fra, 20.0, 6.0);
        assert_eq!(
            tracker.track(&surface, deu, 21.0, 6.0),
            vec![
                PointerEvent::Leave,
                PointerEvent::Enter { code: "DEU".into(), x: 21.0, y: 6.0 }
            ]
        );
        assert_eq!(tracker.current(), deu);
    }

    #[test]
    fn test_release() {
        let surface = surface();
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.release(), None);

        tracker.track(&surface, surface.shape_at(10.0, 50.0), 0.0, 0.0);
        assert_eq!(tracker.release(), Some(PointerEvent::Leave));
        assert_eq!(tracker.current(), None);
    }
}
