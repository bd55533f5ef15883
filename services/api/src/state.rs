//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the idea pipeline,
//! the request gate and the loaded configuration.

use crate::{config::Config, gate::RequestGate};
use imaginethat_core::IdeaPipeline;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
/// All fields are public to be accessible from other modules.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IdeaPipeline>,
    pub gate: Arc<RequestGate>,
    pub config: Arc<Config>,
}
