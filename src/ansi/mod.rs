//! ANSI color decoding for the device log stream.
//!
//! The firmware prints colored log lines through its serial console. Each
//! websocket frame carries one line, and a color set in one frame keeps
//! applying to the following frames until it is reset, so the foreground
//! state is carried between calls in an explicit [`AnsiState`].
//!
//! Coloring is per line: the decoded record carries a single color, not spans.

mod color;

pub use color::ColorToken;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// SGR sequences only (`ESC [ <params> m`). Other CSI sequences pass through.
static SGR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[([0-9;]*)m").expect("SGR regex pattern is valid"));

/// Foreground color carried across frames of one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnsiState {
    pub current_foreground: Option<ColorToken>,
}

impl AnsiState {
    /// Apply the raw parameter list of one SGR sequence.
    ///
    /// An empty list means reset. Codes that are not numbers or not in the
    /// color table are ignored.
    pub fn apply_sgr(&mut self, raw_params: &str) {
        if raw_params.is_empty() {
            self.current_foreground = None;
            return;
        }

        for code in raw_params.split(';').filter_map(|p| p.parse::<u16>().ok()) {
            if code == 0 || code == 39 {
                self.current_foreground = None;
            } else if let Some(color) = ColorToken::from_sgr(code) {
                self.current_foreground = Some(color);
            }
        }
    }
}

/// One decoded log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub text: String,
    pub color: Option<ColorToken>,
}

impl LineRecord {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }
}

/// Decode one frame against `state`, updating it in place.
///
/// The line keeps the color it started with unless a sequence inside it
/// selects a color; a reset later in the same line only affects the next
/// frames.
pub fn decode_line(state: &mut AnsiState, raw: &str) -> LineRecord {
    let mut text = String::with_capacity(raw.len());
    let mut line_color = state.current_foreground;
    let mut cursor = 0;

    for caps in SGR_PATTERN.captures_iter(raw) {
        let Some(full) = caps.get(0) else { continue };
        text.push_str(&raw[cursor..full.start()]);
        state.apply_sgr(caps.get(1).map_or("", |m| m.as_str()));
        if state.current_foreground.is_some() {
            line_color = state.current_foreground;
        }
        cursor = full.end();
    }
    text.push_str(&raw[cursor..]);

    LineRecord {
        text,
        color: line_color,
    }
}

/// Stateful decoder owning the color state of a single stream.
#[derive(Debug, Default, Clone)]
pub struct AnsiLineDecoder {
    state: AnsiState,
}

impl AnsiLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AnsiState) -> Self {
        Self { state }
    }

    /// Decode the next frame in arrival order.
    pub fn decode(&mut self, raw: &str) -> LineRecord {
        decode_line(&mut self.state, raw)
    }

    pub fn state(&self) -> AnsiState {
        self.state
    }

    /// Forget any color carried over from earlier frames (new connection).
    pub fn reset(&mut self) {
        self.state = AnsiState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_text_passes_through() {
        let mut decoder = AnsiLineDecoder::new();
        let line = decoder.decode("boot: heap ok");
        assert_eq!(line.text, "boot: heap ok");
        assert_eq!(line.color, None);
    }

    #[test]
    fn test_color_with_trailing_reset_keeps_line_color() {
        let mut decoder = AnsiLineDecoder::new();
        let line = decoder.decode("\x1b[31mred\x1b[0m plain");
        assert_eq!(line.text, "red plain");
        assert_eq!(line.color.map(ColorToken::sgr_code), Some(31));
        assert_eq!(decoder.state().current_foreground, None);
    }

    #[test]
    fn test_color_carries_into_next_frame() {
        let mut decoder = AnsiLineDecoder::new();
        decoder.decode("\x1b[33mwarning starts");
        let next = decoder.decode("continued");
        assert_eq!(next.color, Some(ColorToken::Yellow));
        assert_eq!(next.text, "continued");
    }

    #[test]
    fn test_code_39_clears_foreground() {
        let mut decoder = AnsiLineDecoder::new();
        decoder.decode("\x1b[32mok");
        let line = decoder.decode("\x1b[39mdefault");
        assert_eq!(line.color, Some(ColorToken::Green));
        assert_eq!(decoder.decode("after").color, None);
    }

    #[test]
    fn test_empty_params_reset() {
        let mut decoder = AnsiLineDecoder::new();
        decoder.decode("\x1b[34mblue");
        decoder.decode("\x1b[m");
        assert_eq!(decoder.state().current_foreground, None);
    }

    #[test]
    fn test_last_color_in_line_wins() {
        let mut decoder = AnsiLineDecoder::new();
        let line = decoder.decode("\x1b[31ma\x1b[92mb");
        assert_eq!(line.text, "ab");
        assert_eq!(line.color, Some(ColorToken::BrightGreen));
    }

    #[test]
    fn test_combined_params_apply_in_order() {
        let mut state = AnsiState::default();
        state.apply_sgr("1;31");
        assert_eq!(state.current_foreground, Some(ColorToken::Red));
        state.apply_sgr("31;0");
        assert_eq!(state.current_foreground, None);
    }

    #[test]
    fn test_unknown_codes_ignored() {
        let mut decoder = AnsiLineDecoder::with_state(AnsiState {
            current_foreground: Some(ColorToken::Cyan),
        });
        let line = decoder.decode("\x1b[38;5;196mextended\x1b[1m");
        assert_eq!(line.text, "extended");
        assert_eq!(line.color, Some(ColorToken::Cyan));
    }

    #[test]
    fn test_non_sgr_sequences_pass_through() {
        let mut decoder = AnsiLineDecoder::new();
        let line = decoder.decode("\x1b[2Kclear");
        assert_eq!(line.text, "\x1b[2Kclear");
    }

    #[test]
    fn test_independent_decoders_do_not_share_state() {
        let mut a = AnsiLineDecoder::new();
        let mut b = AnsiLineDecoder::new();
        a.decode("\x1b[35mmagenta");
        assert_eq!(b.decode("plain").color, None);
        assert_eq!(a.decode("plain").color, Some(ColorToken::Magenta));
    }

    #[test]
    fn test_reset_forgets_color() {
        let mut decoder = AnsiLineDecoder::new();
        decoder.decode("\x1b[31mred");
        decoder.reset();
        assert_eq!(decoder.decode("x").color, None);
    }

    proptest! {
        #[test]
        fn prop_text_without_escapes_is_unchanged(
            text in "[^\x1b]{0,80}",
            code in prop::sample::select(vec![0u16, 31, 32, 90, 97]),
        ) {
            let mut state = AnsiState::default();
            state.apply_sgr(&code.to_string());
            let before = state.current_foreground;

            let line = decode_line(&mut state, &text);
            prop_assert_eq!(line.text, text);
            prop_assert_eq!(line.color, before);
            prop_assert_eq!(state.current_foreground, before);
        }
    }
}
