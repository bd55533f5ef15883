//! ImagineThat API Library Crate
//!
//! This library contains the HTTP surface around the idea pipeline: the
//! application state, configuration, request gate, handlers and routing.
//! The `api` binary is a thin wrapper around this library.

pub mod config;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
