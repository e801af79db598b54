// src/terminal.rs
// Terminal rendering for the selection summary and the results screen,
// plus the raw-mode key prompt used to lock failed cards.

use std::fmt::Write as _;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::card::BingoCard;
use crate::defs::{CardId, Colors, COLUMNS, GRID_SIZE, TOTAL_CARDS};
use crate::results::{CardCells, CellState, ResultStatus, ResultsView, EMPTY_MESSAGE};
use crate::settings::{CardSelection, GameSettings};

const CELL_WIDTH: usize = 5;
const INNER_WIDTH: usize = CELL_WIDTH * GRID_SIZE + GRID_SIZE - 1;
const CARDS_PER_ROW: usize = 20;

fn paint(text: &str, color: Option<&str>, colored: bool) -> String {
    match color {
        Some(code) if colored => format!("{code}{text}{}", Colors::reset()),
        _ => text.to_string(),
    }
}

fn border(left: char, joint: char, right: char) -> String {
    let segment = "─".repeat(CELL_WIDTH);
    let mut line = String::new();
    line.push(left);
    line.push_str(&vec![segment; GRID_SIZE].join(&joint.to_string()));
    line.push(right);
    line
}

/// Draw one card as a B I N G O table. Numbers are zero padded, the free cell reads FREE.
pub fn render_card(label: &str, card: &BingoCard, cells: &CardCells, colored: bool) -> String {
    let grid = card.to_grid();
    let mut out = String::new();

    let _ = writeln!(out, "┌{}┐", "─".repeat(INNER_WIDTH));
    let title = format!("{label}  Card ID: {}", card.card_id);
    let padding = INNER_WIDTH.saturating_sub(title.chars().count() + 1);
    let _ = writeln!(out, "│ {title}{}│", " ".repeat(padding));
    let _ = writeln!(out, "{}", border('├', '┬', '┤'));

    let header: Vec<String> = COLUMNS.iter().map(|letter| format!("{letter:^CELL_WIDTH$}")).collect();
    let _ = writeln!(out, "│{}│", header.join("│"));
    let _ = writeln!(out, "{}", border('├', '┼', '┤'));

    for (r, row) in grid.iter().enumerate() {
        let rendered: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                let text = match cell {
                    Some(number) => format!("{number:02}"),
                    None => "FREE".to_string(),
                };
                let color = match cells[r][c] {
                    CellState::Free => Some(Colors::magenta()),
                    CellState::Winning => Some(Colors::green()),
                    CellState::Called => Some(Colors::yellow()),
                    CellState::Unmarked => None,
                };
                paint(&format!("{text:^CELL_WIDTH$}"), color, colored)
            })
            .collect();
        let _ = writeln!(out, "│{}│", rendered.join("│"));
    }

    let _ = writeln!(out, "{}", border('└', '┴', '┘'));
    out
}

/// Whole results screen: title, then every displayed card with its lock state.
pub fn render_results(view: &mut ResultsView<'_>, colored: bool) -> String {
    let mut out = String::new();
    let title_color = match view.status() {
        ResultStatus::Won => Colors::yellow(),
        ResultStatus::Failed => Colors::red(),
    };
    let _ = writeln!(out, "{}", paint(&view.title(), Some(title_color), colored));
    match view.called().last() {
        Some(last) => {
            let _ = writeln!(out, "Called numbers: {} (last: {last:02})\n", view.called().len());
        }
        None => {
            let _ = writeln!(out, "Called numbers: none\n");
        }
    }

    let cards = view.displayed_cards();
    if cards.is_empty() {
        let _ = writeln!(out, "{EMPTY_MESSAGE}");
        return out;
    }

    for (index, card) in cards.into_iter().enumerate() {
        let cells = view.cell_states(card);
        out.push_str(&render_card(&view.card_label(index), card, &cells, colored));

        let lines = view.completed_lines(card);
        if !lines.is_empty() {
            let names: Vec<String> = lines.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "Lines: {}", names.join(", "));
        }
        if view.status() == ResultStatus::Failed {
            if view.is_locked(card.card_id) {
                let _ = writeln!(out, "{}", paint("This card is already checked.", Some(Colors::red()), colored));
            } else {
                let _ = writeln!(out, "[L] LOCK");
            }
        }
        out.push('\n');
    }
    out
}

/// Sidebar values and the 1..=200 card board, selected cards bracketed.
pub fn render_selection(selection: &CardSelection, settings: &GameSettings, balance: Option<f64>, colored: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "الفرحة (Alfarha) Bingo");
    match balance {
        Some(balance) => {
            let _ = writeln!(out, "Balance: {balance:.2}");
        }
        None => {
            let _ = writeln!(out, "Balance: unavailable");
        }
    }
    let _ = writeln!(out, "Selected Cards: {}", selection.len());
    let _ = writeln!(out, "Bet Per Card (SSP): {}", settings.bet_per_card);
    let _ = writeln!(out, "Commission: {}", settings.commission);
    let _ = writeln!(out, "Call Interval: {}", settings.interval);
    let _ = writeln!(out, "Winning Pattern: {}", settings.pattern);
    let _ = writeln!(out, "Language: {}", settings.language);
    let _ = writeln!(out, "Prize: {:.2}\n", settings.calculate_prize(selection.len()));

    let ids: Vec<CardId> = (1..=TOTAL_CARDS).collect();
    for chunk in ids.chunks(CARDS_PER_ROW) {
        let row: Vec<String> = chunk
            .iter()
            .map(|&id| {
                if selection.contains(id) {
                    paint(&format!("[{id:>3}]"), Some(Colors::yellow()), colored)
                } else {
                    format!(" {id:>3} ")
                }
            })
            .collect();
        let _ = writeln!(out, "{}", row.join(""));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Lock,
    Skip,
    Exit,
}

pub fn key_action(code: KeyCode) -> KeyAction {
    match code {
        KeyCode::Char('l') | KeyCode::Char('L') => KeyAction::Lock,
        KeyCode::Esc => KeyAction::Exit,
        _ => KeyAction::Skip,
    }
}

/// Wait for one key press in raw mode: L locks, ESC exits, anything else skips.
pub fn prompt_lock_key() -> io::Result<KeyAction> {
    enable_raw_mode()?;
    let result = read_key();
    disable_raw_mode()?;
    result
}

fn read_key() -> io::Result<KeyAction> {
    // Drop anything typed before the prompt
    while event::poll(Duration::from_millis(0))? {
        event::read()?;
    }

    loop {
        if let Event::Key(key_event) = event::read()? {
            if key_event.kind == KeyEventKind::Press {
                return Ok(key_action(key_event.code));
            }
        }
    }
}
