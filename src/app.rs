use std::sync::Arc;

use crate::controller::ChatController;
use crate::status_indicator::StatusIndicator;

/// Top-level application context: owns the controller handle and the bits
/// of UI state the views and event handlers share. Passed down explicitly,
/// never ambient.
pub struct App {
    pub controller: Arc<ChatController>,
    pub input: String,
    pub status_indicator: StatusIndicator,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: Arc<ChatController>) -> Self {
        Self {
            controller,
            input: String::new(),
            status_indicator: StatusIndicator::new(),
            should_quit: false,
        }
    }
}
