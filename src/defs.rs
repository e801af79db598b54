// src/defs.rs
// Shared constants and basic types for the bingo operator client.

use std::ops::RangeInclusive;

pub type Number = u8;
pub type CardId = u32;

/// A single card cell: `None` is the free marker.
pub type Cell = Option<Number>;

pub const GRID_SIZE: usize = 5;

pub const FIRSTNUMBER: Number = 1;
pub const LASTNUMBER: Number = 75;
pub const NUMBERS_PER_COLUMN: Number = 15;

/// Number of cards the operator can pick from.
pub const TOTAL_CARDS: CardId = 200;

pub const COLUMNS: [char; GRID_SIZE] = ['B', 'I', 'N', 'G', 'O'];

/// Numeric range allowed in column `col` (0 = B .. 4 = O).
pub const fn column_range(col: usize) -> RangeInclusive<Number> {
    let start = FIRSTNUMBER + (col as Number) * NUMBERS_PER_COLUMN;
    start..=start + NUMBERS_PER_COLUMN - 1
}

/// ANSI colour codes used by the terminal renderers.
pub struct Colors;

impl Colors {
    pub fn green() -> &'static str {
        "\x1b[1;32m"
    }

    pub fn yellow() -> &'static str {
        "\x1b[1;33m"
    }

    pub fn red() -> &'static str {
        "\x1b[1;31m"
    }

    pub fn magenta() -> &'static str {
        "\x1b[1;35m"
    }

    pub fn reset() -> &'static str {
        "\x1b[0m"
    }
}
