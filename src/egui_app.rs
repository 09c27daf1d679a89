//! egui front end: controller state machine, UI state, and rendering.

/// Analysis state machine driving the UI.
pub mod controller;
/// Shared UI state types.
pub mod state;
/// egui rendering.
pub mod ui;
/// Display-ready derivations of prediction responses.
pub mod view_model;
