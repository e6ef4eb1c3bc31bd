//! Choropleth of PFAS readings per town.
//!
//! The library holds everything that does not need a window: the threshold
//! registry, loading, filtering, per-town reduction, legend colours, town
//! boundaries and the debounced application state. The `pfas-map` binary
//! draws it with egui.

pub mod color;
pub mod config;
pub mod data;
pub mod debounce;
pub mod geo;
pub mod state;
