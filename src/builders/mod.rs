//! Explicit factories that turn configuration into owned controllers.

pub mod controller_builder;

pub use controller_builder::{build_controller, build_controllers};
