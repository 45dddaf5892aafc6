//! Vertical layout of the message log and the scroll-bound arithmetic.
//!
//! Everything here is a pure function over a [`LayoutConfig`] and a message
//! slice, so the same math serves any renderer. Units are abstract: the
//! defaults describe the 800x600 pixel canvas the chat was designed around,
//! the terminal front-end instantiates the config in cell units instead.

use crate::models::Message;

#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    /// Characters per wrapped line.
    pub wrap_cols: usize,
    /// Height of one wrapped text line.
    pub line_height: f32,
    /// Fixed per-message chrome: bubble padding plus the timestamp row.
    pub message_chrome: f32,
    /// Gap between consecutive bubbles.
    pub message_spacing: f32,
    /// Bubble width as a fraction of the viewport width.
    pub bubble_width_frac: f32,
    /// Horizontal inset of a bubble from its viewport edge.
    pub side_margin: f32,
    /// Height reserved at the bottom of the viewport for the input bar.
    pub input_bar_height: f32,
    /// Gap above the first bubble.
    pub top_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            wrap_cols: 80,
            line_height: 30.0,
            message_chrome: 40.0,
            message_spacing: 15.0,
            bubble_width_frac: 0.7,
            side_margin: 20.0,
            input_bar_height: 60.0,
            top_margin: 40.0,
        }
    }
}

/// Cumulative vertical position of one bubble, relative to the top of the
/// content (scroll offset and top margin not applied).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MessageExtent {
    pub top: f32,
    pub height: f32,
}

impl MessageExtent {
    /// Whether any part of the bubble lands inside the viewport at the
    /// given scroll offset. Culling only skips drawing; positions are the
    /// same whether or not a bubble is culled.
    pub fn visible(&self, cfg: &LayoutConfig, offset: f32, viewport_height: f32) -> bool {
        let screen_top = cfg.top_margin + self.top + offset;
        screen_top + self.height > 0.0 && screen_top < viewport_height - cfg.input_bar_height
    }
}

/// Splits `text` into chunks of at most `wrap_cols` characters, in order.
/// Chunking is by raw character count alone; word boundaries and grapheme
/// clusters are ignored.
pub fn wrap(text: &str, wrap_cols: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= wrap_cols {
        return vec![text.to_string()];
    }
    chars
        .chunks(wrap_cols)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Height of one bubble: its wrapped line count times the line height,
/// plus the fixed chrome.
pub fn message_height(cfg: &LayoutConfig, message: &Message) -> f32 {
    wrap(&message.text, cfg.wrap_cols).len() as f32 * cfg.line_height + cfg.message_chrome
}

/// Height of the whole log, spacing included.
pub fn total_height(cfg: &LayoutConfig, messages: &[Message]) -> f32 {
    messages
        .iter()
        .map(|message| message_height(cfg, message) + cfg.message_spacing)
        .sum()
}

/// How far the view can scroll back from the bottom anchor. Zero when the
/// content fits in the viewport.
pub fn max_scroll(cfg: &LayoutConfig, messages: &[Message], viewport_height: f32) -> f32 {
    let visible = viewport_height - cfg.input_bar_height - cfg.top_margin;
    (total_height(cfg, messages) - visible).max(0.0)
}

/// Clamps a proposed offset into `[-max_scroll, 0]`.
pub fn clamp_offset(
    cfg: &LayoutConfig,
    messages: &[Message],
    viewport_height: f32,
    proposed: f32,
) -> f32 {
    proposed.clamp(-max_scroll(cfg, messages, viewport_height), 0.0)
}

/// The offset that anchors the view to the newest message.
pub fn bottom_offset(cfg: &LayoutConfig, messages: &[Message], viewport_height: f32) -> f32 {
    -max_scroll(cfg, messages, viewport_height)
}

/// Origin and height of every bubble, in display order.
pub fn message_extents(cfg: &LayoutConfig, messages: &[Message]) -> Vec<MessageExtent> {
    let mut y = 0.0;
    messages
        .iter()
        .map(|message| {
            let height = message_height(cfg, message);
            let extent = MessageExtent { top: y, height };
            y += height + cfg.message_spacing;
            extent
        })
        .collect()
}

/// Width of a bubble for a given viewport width.
pub fn bubble_width(cfg: &LayoutConfig, viewport_width: f32) -> f32 {
    viewport_width * cfg.bubble_width_frac
}

#[cfg(test)]
mod tests {
    use crate::models::Sender;

    use super::*;

    fn message(text: &str) -> Message {
        Message::new(text, Sender::Bot)
    }

    #[test]
    fn wrap_is_identity_for_short_strings() {
        assert_eq!(wrap("hi", 80), vec!["hi".to_string()]);
        let exactly_80 = "x".repeat(80);
        assert_eq!(wrap(&exactly_80, 80), vec![exactly_80.clone()]);
    }

    #[test]
    fn wrap_chunks_long_strings_in_order() {
        let text = format!("{}{}{}", "a".repeat(80), "b".repeat(80), "c".repeat(40));
        let lines = wrap(&text, 80);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "a".repeat(80));
        assert_eq!(lines[1], "b".repeat(80));
        assert_eq!(lines[2], "c".repeat(40));
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        // 100 two-byte characters must wrap on the character count.
        let text = "é".repeat(100);
        let lines = wrap(&text, 80);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].chars().count(), 80);
        assert_eq!(lines[1].chars().count(), 20);
    }

    #[test]
    fn message_height_counts_lines_plus_chrome() {
        let cfg = LayoutConfig::default();
        // One line: 1 * 30 + 40
        assert_eq!(message_height(&cfg, &message("hi")), 70.0);
        // Three lines: 3 * 30 + 40
        assert_eq!(message_height(&cfg, &message(&"x".repeat(200))), 130.0);
    }

    #[test]
    fn fifty_three_line_messages_fill_7250_units() {
        let cfg = LayoutConfig::default();
        let messages: Vec<Message> = (0..50).map(|_| message(&"x".repeat(200))).collect();

        assert_eq!(total_height(&cfg, &messages), 7250.0);
        assert_eq!(max_scroll(&cfg, &messages, 600.0), 6750.0);
        assert_eq!(bottom_offset(&cfg, &messages, 600.0), -6750.0);
    }

    #[test]
    fn max_scroll_is_zero_when_content_fits() {
        let cfg = LayoutConfig::default();
        let messages = vec![message("hi")];
        assert_eq!(max_scroll(&cfg, &messages, 600.0), 0.0);
        assert_eq!(max_scroll(&cfg, &[], 600.0), 0.0);
    }

    #[test]
    fn clamp_offset_stays_in_range_for_any_delta() {
        let cfg = LayoutConfig::default();
        let messages: Vec<Message> = (0..50).map(|_| message(&"x".repeat(200))).collect();
        let limit = max_scroll(&cfg, &messages, 600.0);

        for proposed in [-1e9, -7000.0, -1.0, 0.0, 3.5, 250.0, 1e9] {
            let clamped = clamp_offset(&cfg, &messages, 600.0, proposed);
            assert!(clamped <= 0.0);
            assert!(clamped >= -limit);
        }

        assert_eq!(clamp_offset(&cfg, &messages, 600.0, -1e9), -6750.0);
        assert_eq!(clamp_offset(&cfg, &messages, 600.0, 1e9), 0.0);
    }

    #[test]
    fn extents_accumulate_heights_and_spacing() {
        let cfg = LayoutConfig::default();
        let messages = vec![message("hi"), message(&"x".repeat(200)), message("ok")];
        let extents = message_extents(&cfg, &messages);

        assert_eq!(extents[0], MessageExtent { top: 0.0, height: 70.0 });
        assert_eq!(extents[1], MessageExtent { top: 85.0, height: 130.0 });
        assert_eq!(extents[2], MessageExtent { top: 230.0, height: 70.0 });
    }

    #[test]
    fn culling_does_not_move_surviving_bubbles() {
        let cfg = LayoutConfig::default();
        let messages: Vec<Message> = (0..50).map(|_| message(&"x".repeat(200))).collect();
        let extents = message_extents(&cfg, &messages);

        // Bottom-anchored view: early bubbles are culled, late ones are not,
        // and extents are identical to the unscrolled computation.
        let offset = bottom_offset(&cfg, &messages, 600.0);
        assert!(!extents[0].visible(&cfg, offset, 600.0));
        assert!(extents[49].visible(&cfg, offset, 600.0));
        assert_eq!(extents, message_extents(&cfg, &messages));
    }

    #[test]
    fn bubble_width_follows_the_viewport() {
        let cfg = LayoutConfig::default();
        assert_eq!(bubble_width(&cfg, 800.0), 560.0);
    }
}
