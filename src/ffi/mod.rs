//! C FFI layer for embedding the simulator in a host application.
//!
//! This module exports C ABI functions operating on an opaque `Simulation`
//! handle. All functions are marked with `#[no_mangle]` and use `extern "C"`.
//!
//! The actual logic is in `state` and `automaton`. These functions are thin
//! wrappers that handle null checks, pointer safety, and C-to-Rust conversions.
//! Errors never cross the boundary; they are logged and mapped to a sentinel.

pub mod dimension;
pub mod field;
pub mod grid;
pub mod lifecycle;
pub mod region;

pub use dimension::la_estimate_dimension;
pub use field::{la_field_fill, la_field_get, la_field_set};
pub use grid::{la_get_cell, la_set_cell, la_step};
pub use lifecycle::{la_create, la_destroy, la_get_generation};
pub use region::{la_extract_region, la_import_region};
