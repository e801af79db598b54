// src/card.rs
// Bingo card model, grid transposition, validation, generation and the card catalog.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::defs::{CardId, Cell, Number, COLUMNS, GRID_SIZE, TOTAL_CARDS, column_range};
use crate::error::{CardError, ClientError, Result};

/// Row-major 5x5 arrangement of a card: `grid[row][col]`.
pub type Grid = [[Cell; GRID_SIZE]; GRID_SIZE];

/// A card as the API and catalog files store it: column-major, one list per letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BingoCard {
    pub card_id: CardId,
    #[serde(rename = "B")]
    pub b: Vec<Cell>,
    #[serde(rename = "I")]
    pub i: Vec<Cell>,
    #[serde(rename = "N")]
    pub n: Vec<Cell>,
    #[serde(rename = "G")]
    pub g: Vec<Cell>,
    #[serde(rename = "O")]
    pub o: Vec<Cell>,
}

impl BingoCard {
    pub fn from_columns(card_id: CardId, columns: [Vec<Cell>; GRID_SIZE]) -> Self {
        let [b, i, n, g, o] = columns;
        Self { card_id, b, i, n, g, o }
    }

    /// Column by index, 0 = B .. 4 = O.
    pub fn column(&self, col: usize) -> &[Cell] {
        match col {
            0 => &self.b,
            1 => &self.i,
            2 => &self.n,
            3 => &self.g,
            _ => &self.o,
        }
    }

    /// Transpose the lettered columns into row-major order.
    /// Missing cells in a short column read as free; `validate` rejects such cards.
    pub fn to_grid(&self) -> Grid {
        let mut grid: Grid = [[None; GRID_SIZE]; GRID_SIZE];
        for (r, row) in grid.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.column(c).get(r).copied().flatten();
            }
        }
        grid
    }

    /// All numeric values on the card, column by column.
    pub fn numbers(&self) -> Vec<Number> {
        (0..GRID_SIZE)
            .flat_map(|c| self.column(c).iter().flatten().copied())
            .collect()
    }

    pub fn validate(&self) -> std::result::Result<(), CardError> {
        let mut seen = HashSet::new();
        for (col, &letter) in COLUMNS.iter().enumerate() {
            let cells = self.column(col);
            if cells.len() != GRID_SIZE {
                return Err(CardError::ColumnLength { card_id: self.card_id, column: letter, len: cells.len() });
            }
            for &number in cells.iter().flatten() {
                if !column_range(col).contains(&number) {
                    return Err(CardError::OutOfRange { card_id: self.card_id, column: letter, number });
                }
                if !seen.insert(number) {
                    return Err(CardError::Duplicate { card_id: self.card_id, number });
                }
            }
        }
        Ok(())
    }
}

/// Produces valid random cards with the centre cell free.
pub struct CardGenerator<R: Rng> {
    rng: R,
}

impl CardGenerator<StdRng> {
    /// Reproducible generator; the same seed always yields the same catalog.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> CardGenerator<R> {
    pub fn generate_card(&mut self, card_id: CardId) -> BingoCard {
        let columns: [Vec<Cell>; GRID_SIZE] = std::array::from_fn(|col| {
            let mut pool: Vec<Number> = column_range(col).collect();
            pool.shuffle(&mut self.rng);
            pool.into_iter().take(GRID_SIZE).map(Some).collect()
        });
        let mut card = BingoCard::from_columns(card_id, columns);
        card.n[GRID_SIZE / 2] = None;
        card
    }

    /// Cards numbered `1..=count`.
    pub fn generate_catalog(&mut self, count: CardId) -> CardCatalog {
        let cards = (1..=count).map(|id| (id, self.generate_card(id))).collect();
        CardCatalog { cards }
    }
}

/// All cards the shop can play with, keyed by card id.
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: BTreeMap<CardId, BingoCard>,
}

impl CardCatalog {
    pub fn from_cards(cards: Vec<BingoCard>) -> std::result::Result<Self, CardError> {
        let mut map = BTreeMap::new();
        for card in cards {
            card.validate()?;
            let card_id = card.card_id;
            if map.insert(card_id, card).is_some() {
                return Err(CardError::DuplicateId(card_id));
            }
        }
        Ok(Self { cards: map })
    }

    /// Standard catalog of `TOTAL_CARDS` cards derived from `seed`.
    pub fn standard(seed: u64) -> Self {
        CardGenerator::seeded(seed).generate_catalog(TOTAL_CARDS)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ClientError::FileRead { path: path.to_path_buf(), source })?;
        let cards: Vec<BingoCard> = serde_json::from_str(&content)?;
        Ok(Self::from_cards(cards)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let cards: Vec<&BingoCard> = self.cards.values().collect();
        fs::write(path, serde_json::to_string_pretty(&cards)?)?;
        Ok(())
    }

    pub fn get(&self, card_id: CardId) -> Option<&BingoCard> {
        self.cards.get(&card_id)
    }

    pub fn cards(&self) -> impl Iterator<Item = &BingoCard> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
