//! Foreground color table for SGR codes.

use serde::{Deserialize, Serialize};

/// One of the 16 standard terminal foreground colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl ColorToken {
    /// Look up the color selected by an SGR foreground code (30-37, 90-97).
    pub fn from_sgr(code: u16) -> Option<Self> {
        let token = match code {
            30 => ColorToken::Black,
            31 => ColorToken::Red,
            32 => ColorToken::Green,
            33 => ColorToken::Yellow,
            34 => ColorToken::Blue,
            35 => ColorToken::Magenta,
            36 => ColorToken::Cyan,
            37 => ColorToken::White,
            90 => ColorToken::BrightBlack,
            91 => ColorToken::BrightRed,
            92 => ColorToken::BrightGreen,
            93 => ColorToken::BrightYellow,
            94 => ColorToken::BrightBlue,
            95 => ColorToken::BrightMagenta,
            96 => ColorToken::BrightCyan,
            97 => ColorToken::BrightWhite,
            _ => return None,
        };
        Some(token)
    }

    /// The SGR code that selects this color.
    pub fn sgr_code(self) -> u16 {
        match self {
            ColorToken::Black => 30,
            ColorToken::Red => 31,
            ColorToken::Green => 32,
            ColorToken::Yellow => 33,
            ColorToken::Blue => 34,
            ColorToken::Magenta => 35,
            ColorToken::Cyan => 36,
            ColorToken::White => 37,
            ColorToken::BrightBlack => 90,
            ColorToken::BrightRed => 91,
            ColorToken::BrightGreen => 92,
            ColorToken::BrightYellow => 93,
            ColorToken::BrightBlue => 94,
            ColorToken::BrightMagenta => 95,
            ColorToken::BrightCyan => 96,
            ColorToken::BrightWhite => 97,
        }
    }

    /// Display palette used by the web console (dark theme).
    pub fn hex(self) -> &'static str {
        match self {
            ColorToken::Black => "#94a3b8",
            ColorToken::Red => "#ef4444",
            ColorToken::Green => "#22c55e",
            ColorToken::Yellow => "#f59e0b",
            ColorToken::Blue => "#60a5fa",
            ColorToken::Magenta => "#f472b6",
            ColorToken::Cyan => "#22d3ee",
            ColorToken::White => "#e2e8f0",
            ColorToken::BrightBlack => "#64748b",
            ColorToken::BrightRed => "#f87171",
            ColorToken::BrightGreen => "#4ade80",
            ColorToken::BrightYellow => "#fbbf24",
            ColorToken::BrightBlue => "#93c5fd",
            ColorToken::BrightMagenta => "#f9a8d4",
            ColorToken::BrightCyan => "#67e8f9",
            ColorToken::BrightWhite => "#f8fafc",
        }
    }

    /// Terminal color for CLI rendering.
    pub fn terminal_color(self) -> colored::Color {
        use colored::Color;
        match self {
            ColorToken::Black => Color::Black,
            ColorToken::Red => Color::Red,
            ColorToken::Green => Color::Green,
            ColorToken::Yellow => Color::Yellow,
            ColorToken::Blue => Color::Blue,
            ColorToken::Magenta => Color::Magenta,
            ColorToken::Cyan => Color::Cyan,
            ColorToken::White => Color::White,
            ColorToken::BrightBlack => Color::BrightBlack,
            ColorToken::BrightRed => Color::BrightRed,
            ColorToken::BrightGreen => Color::BrightGreen,
            ColorToken::BrightYellow => Color::BrightYellow,
            ColorToken::BrightBlue => Color::BrightBlue,
            ColorToken::BrightMagenta => Color::BrightMagenta,
            ColorToken::BrightCyan => Color::BrightCyan,
            ColorToken::BrightWhite => Color::BrightWhite,
        }
    }
}
