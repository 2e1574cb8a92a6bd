//! Terminal choropleth world map of per-country revenue.
//!
//! Countries listed in the [`catalog::RevenueCatalog`] are filled with their
//! catalog color; hovering one shows a tooltip with its revenue, placed by
//! [`tooltip::PanelGeometry::place`] so it stays inside the terminal.

pub mod app;
pub mod braille;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod format;
pub mod map;
pub mod surface;
pub mod tooltip;
pub mod ui;
