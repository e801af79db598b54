// src/settings.rs
// Round configuration chosen on the card-selection screen and the prize it yields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defs::{CardId, TOTAL_CARDS};
use crate::error::{ClientError, Result};
use crate::pattern::WinningPattern;

pub const DEFAULT_BET: u64 = 5000;

/// Shop commission taken from the pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Commission {
    Twenty,
    #[default]
    Thirty,
}

impl Commission {
    pub fn percent(&self) -> u8 {
        match self {
            Commission::Twenty => 20,
            Commission::Thirty => 30,
        }
    }

    /// Fraction sent to the API, e.g. 0.3.
    pub fn rate(&self) -> f64 {
        f64::from(self.percent()) / 100.0
    }
}

impl fmt::Display for Commission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl FromStr for Commission {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_end_matches('%').trim() {
            "20" => Ok(Commission::Twenty),
            "30" => Ok(Commission::Thirty),
            _ => Err(ClientError::InvalidSetting { key: "commission", value: s.to_string() }),
        }
    }
}

/// Delay between two called numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallInterval {
    #[default]
    Four,
    Five,
    Seven,
}

impl CallInterval {
    pub fn seconds(&self) -> u64 {
        match self {
            CallInterval::Four => 4,
            CallInterval::Five => 5,
            CallInterval::Seven => 7,
        }
    }

    pub fn millis(&self) -> u64 {
        self.seconds() * 1000
    }
}

impl fmt::Display for CallInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sec", self.seconds())
    }
}

impl FromStr for CallInterval {
    type Err = ClientError;

    /// Accepts "4 sec", "4s" or plain "4".
    fn from_str(s: &str) -> Result<Self> {
        let seconds = s.split_whitespace().next().unwrap_or("").trim_end_matches('s');
        match seconds {
            "4" => Ok(CallInterval::Four),
            "5" => Ok(CallInterval::Five),
            "7" => Ok(CallInterval::Seven),
            _ => Err(ClientError::InvalidSetting { key: "interval", value: s.to_string() }),
        }
    }
}

/// Language used for call and result announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Arabic,
    English,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Arabic => write!(f, "Arabic"),
            Language::English => write!(f, "English"),
        }
    }
}

impl FromStr for Language {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arabic" | "ar" => Ok(Language::Arabic),
            "english" | "en" => Ok(Language::English),
            _ => Err(ClientError::InvalidSetting { key: "language", value: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub bet_per_card: u64,
    pub commission: Commission,
    pub interval: CallInterval,
    pub pattern: WinningPattern,
    pub language: Language,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            bet_per_card: DEFAULT_BET,
            commission: Commission::default(),
            interval: CallInterval::default(),
            pattern: WinningPattern::default(),
            language: Language::default(),
        }
    }
}

impl GameSettings {
    /// Pot after commission: `cards * bet * (1 - rate)`, zero with no cards or no bet.
    pub fn calculate_prize(&self, selected_cards: usize) -> f64 {
        if selected_cards == 0 || self.bet_per_card == 0 {
            return 0.0;
        }
        let total_bet = selected_cards as f64 * self.bet_per_card as f64;
        total_bet * (1.0 - self.commission.rate())
    }
}

/// Cards picked by the operator, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardSelection {
    cards: Vec<CardId>,
    last_opened: Option<CardId>,
}

impl CardSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the card if it is not selected, deselect it otherwise.
    /// Returns true when the card ends up selected.
    pub fn toggle(&mut self, card: CardId) -> Result<bool> {
        if !(1..=TOTAL_CARDS).contains(&card) {
            return Err(ClientError::InvalidCardNumber(card));
        }
        if let Some(pos) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(pos);
            Ok(false)
        } else {
            self.cards.push(card);
            self.last_opened = Some(card);
            Ok(true)
        }
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    pub fn selected(&self) -> &[CardId] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card most recently added to the selection.
    pub fn last_opened(&self) -> Option<CardId> {
        self.last_opened
    }
}

impl TryFrom<&[CardId]> for CardSelection {
    type Error = ClientError;

    fn try_from(cards: &[CardId]) -> Result<Self> {
        let mut selection = Self::new();
        for &card in cards {
            if !selection.contains(card) {
                selection.toggle(card)?;
            }
        }
        Ok(selection)
    }
}
