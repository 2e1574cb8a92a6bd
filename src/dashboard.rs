use crate::catalog::{CountryRecord, RevenueCatalog};
use crate::surface::PointerEvent;
use crate::tooltip::{PanelGeometry, PlacedPosition, Point, Size};
use std::sync::Arc;
use tracing::debug;

/// Country currently under the pointer, with the last known pointer position
#[derive(Clone, Debug, PartialEq)]
pub struct Hover {
    pub record: CountryRecord,
    pub flag: String,
    pub pointer: Point,
}

/// Transient UI state: either nothing is hovered or one catalog country is
#[derive(Clone, Debug, Default, PartialEq)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(Hover),
}

/// Owns the hover state and drives it from surface pointer events
pub struct Dashboard {
    catalog: Arc<RevenueCatalog>,
    state: HoverState,
    geometry: PanelGeometry,
}

impl Dashboard {
    pub fn new(catalog: Arc<RevenueCatalog>, geometry: PanelGeometry) -> Self {
        Self {
            catalog,
            state: HoverState::Idle,
            geometry,
        }
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    pub fn hover(&self) -> Option<&Hover> {
        match &self.state {
            HoverState::Hovering(hover) => Some(hover),
            HoverState::Idle => None,
        }
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    /// Apply one pointer event
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Enter { code, x, y } => {
                // The surface always sends Leave before a new Enter; if one
                // arrives while hovering it replaces the hover outright.
                self.state = match self.catalog.lookup(&code) {
                    Some(record) => {
                        debug!(code = %code, x, y, "hover start");
                        HoverState::Hovering(Hover {
                            record: record.clone(),
                            flag: record.flag_glyph.clone(),
                            pointer: Point::new(x, y),
                        })
                    }
                    None => HoverState::Idle,
                };
            }
            PointerEvent::Move { x, y } => {
                // Record and flag were resolved on enter; only the pointer moves
                if let HoverState::Hovering(hover) = &mut self.state {
                    hover.pointer = Point::new(x, y);
                }
            }
            PointerEvent::Leave => {
                if let HoverState::Hovering(hover) = &self.state {
                    debug!(code = %hover.record.code, "hover end");
                }
                self.state = HoverState::Idle;
            }
        }
    }

    /// Apply a batch of events in order
    pub fn handle_all(&mut self, events: impl IntoIterator<Item = PointerEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Tooltip position for the current hover, if any
    pub fn placed(&self, viewport: Size) -> Option<PlacedPosition> {
        self.hover()
            .map(|hover| self.geometry.place(hover.pointer, viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::new(Arc::new(RevenueCatalog::builtin()), PanelGeometry::PIXELS)
    }

    fn enter(code: &str, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Enter {
            code: code.to_string(),
            x,
            y,
        }
    }

    #[test]
    fn test_enter_and_leave_catalog_country() {
        let mut dash = dashboard();
        let viewport = Size::new(800.0, 600.0);

        dash.handle(enter("CAN", 500.0, 300.0));
        let hover = dash.hover().expect("should be hovering");
        assert_eq!(hover.record.display_name, "Canada");
        assert_eq!(hover.record.revenue_amount, 4281);
        assert_eq!(hover.flag, "🇨🇦");
        assert_eq!(hover.pointer, Point::new(500.0, 300.0));
        assert_eq!(
            dash.placed(viewport),
            Some(PlacedPosition { left: 515.0, top: 240.0 })
        );

        dash.handle(PointerEvent::Leave);
        assert_eq!(dash.state(), &HoverState::Idle);
        assert_eq!(dash.placed(viewport), None);
    }

    #[test]
    fn test_enter_neutral_country_stays_idle() {
        let mut dash = dashboard();
        dash.handle(enter("FRA", 400.0, 200.0));
        assert_eq!(dash.state(), &HoverState::Idle);

        // Moving over a neutral shape never produces a tooltip
        dash.handle(PointerEvent::Move { x: 410.0, y: 205.0 });
        assert_eq!(dash.state(), &HoverState::Idle);
    }

    #[test]
    fn test_move_updates_pointer_only() {
        let mut dash = dashboard();
        dash.handle(enter("IND", 100.0, 100.0));
        dash.handle(PointerEvent::Move { x: 120.0, y: 130.0 });

        let hover = dash.hover().unwrap();
        assert_eq!(hover.record.code, "IND");
        assert_eq!(hover.pointer, Point::new(120.0, 130.0));
    }

    #[test]
    fn test_leave_while_idle_is_noop() {
        let mut dash = dashboard();
        dash.handle(PointerEvent::Leave);
        assert_eq!(dash.state(), &HoverState::Idle);
    }

    #[test]
    fn test_enter_while_hovering_replaces() {
        let mut dash = dashboard();
        dash.handle_all([enter("BRA", 10.0, 10.0), enter("AUS", 50.0, 60.0)]);
        assert_eq!(dash.hover().unwrap().record.code, "AUS");

        dash.handle(enter("USA", 70.0, 60.0));
        assert_eq!(dash.state(), &HoverState::Idle);
    }

    #[test]
    fn test_placement_follows_pointer() {
        let mut dash = dashboard();
        let viewport = Size::new(800.0, 600.0);
        dash.handle(enter("DEU", 100.0, 300.0));
        let first = dash.placed(viewport).unwrap();

        dash.handle(PointerEvent::Move { x: 700.0, y: 590.0 });
        let second = dash.placed(viewport).unwrap();
        assert_ne!(first, second);
        assert_eq!(second, PlacedPosition { left: 505.0, top: 460.0 });
    }
}
