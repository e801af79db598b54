// src/results.rs
// State behind the results screen: which cards are shown, how each cell is
// classified, and which failed cards the operator has locked.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::called::CalledNumbers;
use crate::card::{BingoCard, CardCatalog};
use crate::defs::{CardId, Number, GRID_SIZE};
use crate::notify::{NotificationEvent, Notifier};
use crate::pattern::{self, Line, WinningCells};
use crate::settings::Language;

pub const EMPTY_MESSAGE: &str = "No cards to display yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultStatus {
    #[default]
    Won,
    Failed,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Won => write!(f, "won"),
            ResultStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ResultStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "won" | "win" => Ok(ResultStatus::Won),
            "failed" | "fail" | "lost" => Ok(ResultStatus::Failed),
            _ => Err(format!("unknown result status '{s}'")),
        }
    }
}

/// How a single cell is shown. A free cell is always `Free`, even inside a winning line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Free,
    Winning,
    Called,
    Unmarked,
}

pub type CardCells = [[CellState; GRID_SIZE]; GRID_SIZE];

/// Classify every cell of `card` against the called numbers.
pub fn classify_cells(card: &BingoCard, called: &CalledNumbers) -> CardCells {
    let grid = card.to_grid();
    let winning = pattern::evaluate(&grid, called);
    std::array::from_fn(|r| {
        std::array::from_fn(|c| {
            let cell = grid[r][c];
            if cell.is_none() {
                CellState::Free
            } else if winning.contains(&(r, c)) {
                CellState::Winning
            } else if pattern::is_marked(cell, called) {
                CellState::Called
            } else {
                CellState::Unmarked
            }
        })
    })
}

pub struct ResultsView<'a> {
    catalog: &'a CardCatalog,
    winning_ids: Vec<CardId>,
    failed_ids: Vec<CardId>,
    called: CalledNumbers,
    status: ResultStatus,
    language: Language,
    locked: BTreeSet<CardId>,
    cache: HashMap<CardId, (u64, CardCells)>,
}

impl<'a> ResultsView<'a> {
    pub fn new(catalog: &'a CardCatalog, called: CalledNumbers, status: ResultStatus, language: Language) -> Self {
        Self {
            catalog,
            winning_ids: Vec::new(),
            failed_ids: Vec::new(),
            called,
            status,
            language,
            locked: BTreeSet::new(),
            cache: HashMap::new(),
        }
    }

    pub fn with_winning(mut self, ids: Vec<CardId>) -> Self {
        self.winning_ids = ids;
        self
    }

    pub fn with_failed(mut self, ids: Vec<CardId>) -> Self {
        self.failed_ids = ids;
        self
    }

    pub fn status(&self) -> ResultStatus {
        self.status
    }

    pub fn called(&self) -> &CalledNumbers {
        &self.called
    }

    /// Play the result announcement when the screen opens.
    /// A win with no winning cards stays silent.
    pub fn open(&self, notifier: &dyn Notifier) {
        match self.status {
            ResultStatus::Won if !self.winning_ids.is_empty() => notifier.notify(NotificationEvent::Won, self.language),
            ResultStatus::Won => {}
            ResultStatus::Failed => notifier.notify(NotificationEvent::Failed, self.language),
        }
    }

    /// Cards to show, in catalog order.
    pub fn displayed_cards(&self) -> Vec<&'a BingoCard> {
        let ids = match self.status {
            ResultStatus::Won => &self.winning_ids,
            ResultStatus::Failed => &self.failed_ids,
        };
        self.catalog.cards().filter(|card| ids.contains(&card.card_id)).collect()
    }

    pub fn title(&self) -> String {
        let count = self.displayed_cards().len();
        let plural = if count > 1 { "s" } else { "" };
        match self.status {
            ResultStatus::Won => format!("🎉 {count} Winning Card{plural}!"),
            ResultStatus::Failed => format!("❌ {count} Failed Card{plural}!"),
        }
    }

    /// Label above the card at position `index` of `displayed_cards`.
    pub fn card_label(&self, index: usize) -> String {
        match self.status {
            ResultStatus::Won => format!("Winner#{}", index + 1),
            ResultStatus::Failed => format!("Card#{}", index + 1),
        }
    }

    /// Lock a failed card as checked. Returns true only the first time.
    pub fn lock(&mut self, card_id: CardId, notifier: &dyn Notifier) -> bool {
        if self.status != ResultStatus::Failed || !self.failed_ids.contains(&card_id) {
            return false;
        }
        if !self.locked.insert(card_id) {
            return false;
        }
        notifier.notify(NotificationEvent::Locked, self.language);
        true
    }

    pub fn is_locked(&self, card_id: CardId) -> bool {
        self.locked.contains(&card_id)
    }

    pub fn locked_cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.locked.iter().copied()
    }

    /// Record a newly called number; cached cell states become stale through the version.
    pub fn call_number(&mut self, number: Number) -> bool {
        self.called.insert(number)
    }

    /// Replace the called numbers wholesale, e.g. when the feed resynchronises.
    pub fn set_called(&mut self, called: CalledNumbers) {
        self.called = called;
        self.cache.clear();
    }

    /// Cell states for a card, memoised on (card id, called-numbers version).
    pub fn cell_states(&mut self, card: &BingoCard) -> CardCells {
        let version = self.called.version();
        if let Some((cached_version, cells)) = self.cache.get(&card.card_id) {
            if *cached_version == version {
                return *cells;
            }
        }
        let cells = classify_cells(card, &self.called);
        self.cache.insert(card.card_id, (version, cells));
        cells
    }

    pub fn winning_cells(&self, card: &BingoCard) -> WinningCells {
        pattern::evaluate(&card.to_grid(), &self.called)
    }

    pub fn completed_lines(&self, card: &BingoCard) -> Vec<Line> {
        pattern::completed_lines(&card.to_grid(), &self.called)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::tests::sample_card;
    use crate::notify::{Announcement, RecordingNotifier};

    fn catalog() -> CardCatalog {
        let mut second = sample_card();
        second.card_id = 30;
        let mut third = sample_card();
        third.card_id = 4;
        CardCatalog::from_cards(vec![sample_card(), second, third]).unwrap()
    }

    fn row0_called() -> CalledNumbers {
        [5, 20, 33, 50, 65, 1].into_iter().collect()
    }

    #[test]
    fn test_classify_cells() {
        let cells = classify_cells(&sample_card(), &row0_called());
        assert_eq!(cells[0], [CellState::Winning; 5]);
        // 1 sits at row 1, column B
        assert_eq!(cells[1][0], CellState::Called);
        assert_eq!(cells[1][1], CellState::Unmarked);
        assert_eq!(cells[2][2], CellState::Free);
    }

    #[test]
    fn test_free_cell_stays_free_inside_winning_line() {
        let called: CalledNumbers = [9, 29, 59, 62].into_iter().collect();
        let cells = classify_cells(&sample_card(), &called);
        assert_eq!(cells[2], [CellState::Winning, CellState::Winning, CellState::Free, CellState::Winning, CellState::Winning]);
    }

    #[test]
    fn test_displayed_cards_follow_status() {
        let catalog = catalog();
        let won = ResultsView::new(&catalog, row0_called(), ResultStatus::Won, Language::English)
            .with_winning(vec![30, 12])
            .with_failed(vec![4]);
        let ids: Vec<CardId> = won.displayed_cards().iter().map(|c| c.card_id).collect();
        assert_eq!(ids, vec![12, 30]);
        assert_eq!(won.title(), "🎉 2 Winning Cards!");
        assert_eq!(won.card_label(0), "Winner#1");

        let failed = ResultsView::new(&catalog, row0_called(), ResultStatus::Failed, Language::English)
            .with_winning(vec![30, 12])
            .with_failed(vec![4]);
        let ids: Vec<CardId> = failed.displayed_cards().iter().map(|c| c.card_id).collect();
        assert_eq!(ids, vec![4]);
        assert_eq!(failed.title(), "❌ 1 Failed Card!");
        assert_eq!(failed.card_label(1), "Card#2");
    }

    #[test]
    fn test_empty_results() {
        let catalog = catalog();
        let view = ResultsView::new(&catalog, CalledNumbers::new(), ResultStatus::Won, Language::Arabic);
        assert!(view.displayed_cards().is_empty());
        assert_eq!(view.title(), "🎉 0 Winning Card!");

        let notifier = RecordingNotifier::new();
        view.open(&notifier);
        assert!(notifier.events().is_empty());
    }

    #[test]
    fn test_open_announces_result() {
        let catalog = catalog();
        let notifier = RecordingNotifier::new();
        ResultsView::new(&catalog, row0_called(), ResultStatus::Won, Language::Arabic)
            .with_winning(vec![12])
            .open(&notifier);
        ResultsView::new(&catalog, row0_called(), ResultStatus::Failed, Language::English).open(&notifier);

        let events = notifier.events();
        assert_eq!(events[0].1, Announcement::Audio("/game/arabic/win.mp3"));
        assert_eq!(events[1].1, Announcement::Speech("This player lost"));
    }

    #[test]
    fn test_lock_failed_card_once() {
        let catalog = catalog();
        let notifier = RecordingNotifier::new();
        let mut view = ResultsView::new(&catalog, row0_called(), ResultStatus::Failed, Language::Arabic)
            .with_failed(vec![4, 30]);

        assert!(view.lock(4, &notifier));
        assert!(!view.lock(4, &notifier));
        assert!(!view.lock(12, &notifier));
        assert!(view.is_locked(4));
        assert!(!view.is_locked(30));
        assert_eq!(view.locked_cards().collect::<Vec<_>>(), vec![4]);
        assert_eq!(notifier.events(), vec![(NotificationEvent::Locked, Announcement::Audio("/game/lock.m4a"))]);
    }

    #[test]
    fn test_lock_ignored_for_winning_results() {
        let catalog = catalog();
        let notifier = RecordingNotifier::new();
        let mut view = ResultsView::new(&catalog, row0_called(), ResultStatus::Won, Language::Arabic)
            .with_winning(vec![12])
            .with_failed(vec![12]);
        assert!(!view.lock(12, &notifier));
        assert!(notifier.events().is_empty());
    }

    #[test]
    fn test_cell_states_follow_new_calls() {
        let catalog = catalog();
        let card = sample_card();
        let mut view = ResultsView::new(&catalog, CalledNumbers::new(), ResultStatus::Won, Language::English)
            .with_winning(vec![12]);

        assert_eq!(view.cell_states(&card)[0][0], CellState::Unmarked);
        for number in [5, 20, 33, 50] {
            view.call_number(number);
        }
        assert_eq!(view.cell_states(&card)[0][0], CellState::Called);
        assert!(view.winning_cells(&card).is_empty());

        view.call_number(65);
        assert_eq!(view.cell_states(&card)[0], [CellState::Winning; 5]);
        assert_eq!(view.completed_lines(&card), vec![Line::Row(0)]);

        view.set_called(CalledNumbers::new());
        assert_eq!(view.cell_states(&card)[0][0], CellState::Unmarked);
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("won".parse::<ResultStatus>(), Ok(ResultStatus::Won));
        assert_eq!("FAILED".parse::<ResultStatus>(), Ok(ResultStatus::Failed));
        assert!("draw".parse::<ResultStatus>().is_err());
    }
}
