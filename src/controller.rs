use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::api::ModelClient;
use crate::conversation::ConversationStore;
use crate::layout::{self, LayoutConfig};
use crate::models::{Message, Sender};

/// States of the send cycle. At most one exchange is in flight at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Waiting,
}

/// Serializes the send/await/append cycle and owns the scroll offset.
///
/// The controller is the facade the presentation layer talks to: it accepts
/// submissions and wheel deltas, and exposes a message snapshot plus the
/// current scroll offset for rendering. Failures never escape it; a failed
/// exchange becomes a bot message and the controller returns to `Idle`.
pub struct ChatController {
    client: Arc<dyn ModelClient>,
    store: Arc<ConversationStore>,
    layout: LayoutConfig,
    state: Mutex<SendState>,
    scroll_offset: Mutex<f32>,
    viewport_height: Mutex<f32>,
}

impl ChatController {
    pub fn new(
        client: Arc<dyn ModelClient>,
        store: Arc<ConversationStore>,
        layout: LayoutConfig,
    ) -> Self {
        Self {
            client,
            store,
            layout,
            state: Mutex::new(SendState::Idle),
            scroll_offset: Mutex::new(0.0),
            viewport_height: Mutex::new(0.0),
        }
    }

    /// Starts one user -> bot exchange on the current tokio runtime.
    ///
    /// The user message is appended and the view snapped to the bottom
    /// before this returns; the model call and the bot append happen on a
    /// spawned task. Empty input and submissions made while a previous
    /// exchange is still in flight are dropped, not queued.
    pub fn submit(self: &Arc<Self>, text: &str) {
        if text.is_empty() {
            return;
        }
        {
            let mut state = self.state.lock().unwrap();
            if *state == SendState::Waiting {
                debug!("submit dropped, an exchange is already in flight");
                return;
            }
            *state = SendState::Waiting;
        }

        self.store.append(text, Sender::User);
        self.snap_to_bottom();

        let controller = Arc::clone(self);
        let prompt = text.to_string();
        tokio::spawn(async move {
            controller.exchange(prompt).await;
        });
    }

    async fn exchange(&self, prompt: String) {
        match self.client.send(&prompt).await {
            Ok(completion) => {
                self.store.append(completion, Sender::Bot);
            }
            Err(err) => {
                warn!("model request failed: {err}");
                self.store.append(self.failure_notice(), Sender::Bot);
            }
        }
        // Runs on both branches; the controller is always usable afterwards.
        *self.state.lock().unwrap() = SendState::Idle;
    }

    fn failure_notice(&self) -> String {
        format!(
            "Error: Make sure {} is running with model \"{}\"",
            self.client.backend_name(),
            self.client.model()
        )
    }

    /// Read-only snapshot of the conversation for rendering.
    pub fn messages(&self) -> Vec<Message> {
        self.store.all()
    }

    pub fn state(&self) -> SendState {
        *self.state.lock().unwrap()
    }

    pub fn is_waiting(&self) -> bool {
        self.state() == SendState::Waiting
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn scroll_offset(&self) -> f32 {
        *self.scroll_offset.lock().unwrap()
    }

    /// Applies a wheel delta, clamped to the scrollable range.
    pub fn scroll(&self, delta: f32) {
        let viewport = *self.viewport_height.lock().unwrap();
        let messages = self.store.all();
        let mut offset = self.scroll_offset.lock().unwrap();
        *offset = layout::clamp_offset(&self.layout, &messages, viewport, *offset + delta);
    }

    /// Records the viewport height the scroll bounds are computed against.
    pub fn set_viewport_height(&self, height: f32) {
        *self.viewport_height.lock().unwrap() = height;
    }

    fn snap_to_bottom(&self) {
        let viewport = *self.viewport_height.lock().unwrap();
        let messages = self.store.all();
        *self.scroll_offset.lock().unwrap() =
            layout::bottom_offset(&self.layout, &messages, viewport);
    }
}
