// src/pattern.rs
// Win-pattern evaluation over a 5x5 card grid.
//
// Everything here is a pure function of (grid, called numbers): no state is
// kept between calls, so it can be re-run whenever a number is called or a
// different card is shown.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::called::CalledNumbers;
use crate::card::Grid;
use crate::defs::{Cell, GRID_SIZE};

/// (row, column) coordinate of a grid cell.
pub type Coord = (usize, usize);

/// Coordinates of all cells belonging to at least one completed line.
pub type WinningCells = BTreeSet<Coord>;

/// The free cell is always marked, whatever has been called.
pub fn is_marked(cell: Cell, called: &CalledNumbers) -> bool {
    match cell {
        None => true,
        Some(number) => called.contains(number),
    }
}

/// A straight line of five cells that can complete a bingo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Line {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right, row == column.
    MainDiagonal,
    /// Top-right to bottom-left, row + column == 4.
    AntiDiagonal,
}

impl Line {
    /// All 12 lines: rows first, then columns, then the two diagonals.
    pub fn all() -> impl Iterator<Item = Line> {
        (0..GRID_SIZE)
            .map(Line::Row)
            .chain((0..GRID_SIZE).map(Line::Column))
            .chain([Line::MainDiagonal, Line::AntiDiagonal])
    }

    pub fn cells(self) -> [Coord; GRID_SIZE] {
        std::array::from_fn(|i| match self {
            Line::Row(r) => (r, i),
            Line::Column(c) => (i, c),
            Line::MainDiagonal => (i, i),
            Line::AntiDiagonal => (i, GRID_SIZE - 1 - i),
        })
    }

    pub fn is_complete(self, grid: &Grid, called: &CalledNumbers) -> bool {
        self.cells().iter().all(|&(r, c)| is_marked(grid[r][c], called))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Row(r) => write!(f, "row {}", r + 1),
            Line::Column(c) => write!(f, "column {}", crate::defs::COLUMNS[*c]),
            Line::MainDiagonal => write!(f, "diagonal ↘"),
            Line::AntiDiagonal => write!(f, "diagonal ↙"),
        }
    }
}

/// Cells of every fully marked row, column and diagonal.
pub fn evaluate(grid: &Grid, called: &CalledNumbers) -> WinningCells {
    let mut winning = WinningCells::new();

    for r in 0..GRID_SIZE {
        if grid[r].iter().all(|&cell| is_marked(cell, called)) {
            winning.extend((0..GRID_SIZE).map(|c| (r, c)));
        }
    }

    for c in 0..GRID_SIZE {
        if grid.iter().all(|row| is_marked(row[c], called)) {
            winning.extend((0..GRID_SIZE).map(|r| (r, c)));
        }
    }

    if (0..GRID_SIZE).all(|i| is_marked(grid[i][i], called)) {
        winning.extend((0..GRID_SIZE).map(|i| (i, i)));
    }

    let last = GRID_SIZE - 1;
    if (0..GRID_SIZE).all(|i| is_marked(grid[i][last - i], called)) {
        winning.extend((0..GRID_SIZE).map(|i| (i, last - i)));
    }

    winning
}

/// The lines that are complete, in `Line::all` order.
pub fn completed_lines(grid: &Grid, called: &CalledNumbers) -> Vec<Line> {
    Line::all().filter(|line| line.is_complete(grid, called)).collect()
}

const FOUR_CORNERS: [Coord; 4] = [(0, 0), (0, 4), (4, 0), (4, 4)];
const INNER_CORNERS_AND_CENTER: [Coord; 5] = [(1, 1), (1, 3), (3, 1), (3, 3), (2, 2)];

/// Prize pattern a round is played for. Serialised with the names the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WinningPattern {
    #[default]
    All,
    #[serde(rename = "1 Line")]
    OneLine,
    #[serde(rename = "2 Lines")]
    TwoLines,
    #[serde(rename = "Four Corners")]
    FourCorners,
    Cross,
    #[serde(rename = "Inner Corners + Center")]
    InnerCornersCenter,
    #[serde(rename = "Full House")]
    FullHouse,
}

impl WinningPattern {
    pub const ALL_PATTERNS: [WinningPattern; 7] = [
        WinningPattern::All,
        WinningPattern::OneLine,
        WinningPattern::TwoLines,
        WinningPattern::FourCorners,
        WinningPattern::Cross,
        WinningPattern::InnerCornersCenter,
        WinningPattern::FullHouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WinningPattern::All => "All",
            WinningPattern::OneLine => "1 Line",
            WinningPattern::TwoLines => "2 Lines",
            WinningPattern::FourCorners => "Four Corners",
            WinningPattern::Cross => "Cross",
            WinningPattern::InnerCornersCenter => "Inner Corners + Center",
            WinningPattern::FullHouse => "Full House",
        }
    }

    /// Whether the card grid satisfies this pattern.
    pub fn is_satisfied(&self, grid: &Grid, called: &CalledNumbers) -> bool {
        let marked = |cells: &[Coord]| cells.iter().all(|&(r, c)| is_marked(grid[r][c], called));
        let centre = GRID_SIZE / 2;
        match self {
            WinningPattern::OneLine => !completed_lines(grid, called).is_empty(),
            WinningPattern::TwoLines => completed_lines(grid, called).len() >= 2,
            WinningPattern::FourCorners => marked(&FOUR_CORNERS),
            WinningPattern::Cross => {
                Line::Row(centre).is_complete(grid, called) && Line::Column(centre).is_complete(grid, called)
            }
            WinningPattern::InnerCornersCenter => marked(&INNER_CORNERS_AND_CENTER),
            WinningPattern::FullHouse => grid.iter().flatten().all(|&cell| is_marked(cell, called)),
            WinningPattern::All => Self::ALL_PATTERNS[1..].iter().any(|p| p.is_satisfied(grid, called)),
        }
    }
}

impl fmt::Display for WinningPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WinningPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_PATTERNS
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown winning pattern '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW0: [u8; 5] = [5, 20, 33, 50, 65];

    // Distinct numbers in every cell, none of them in ROW0, no free cell.
    fn full_grid() -> Grid {
        std::array::from_fn(|r| std::array::from_fn(|c| Some((c * 15 + r + 6) as u8)))
    }

    fn grid_with_free_centre() -> Grid {
        let mut grid = full_grid();
        grid[0] = ROW0.map(Some);
        grid[2][2] = None;
        grid
    }

    fn called(numbers: &[u8]) -> CalledNumbers {
        numbers.iter().copied().collect()
    }

    fn coords(cells: &[Coord]) -> WinningCells {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_free_cell_is_always_marked() {
        let none = CalledNumbers::new();
        assert!(is_marked(None, &none));
        assert!(!is_marked(Some(5), &none));
        assert!(is_marked(Some(5), &called(&[5])));
    }

    #[test]
    fn test_nothing_called_no_free_cell() {
        assert!(evaluate(&full_grid(), &CalledNumbers::new()).is_empty());
    }

    #[test]
    fn test_free_centre_alone_completes_nothing() {
        let grid = grid_with_free_centre();
        let result = evaluate(&grid, &CalledNumbers::new());
        assert!(result.is_empty());
        assert!(completed_lines(&grid, &CalledNumbers::new()).is_empty());
    }

    #[test]
    fn test_free_cell_away_from_centre() {
        let mut grid = full_grid();
        grid[4][0] = None;
        let others: Vec<u8> = (1..5).filter_map(|c| grid[4][c]).collect();
        let result = evaluate(&grid, &called(&others));
        assert_eq!(result, coords(&[(4, 0), (4, 1), (4, 2), (4, 3), (4, 4)]));
    }

    #[test]
    fn test_complete_first_row() {
        let grid = grid_with_free_centre();
        let result = evaluate(&grid, &called(&ROW0));
        assert_eq!(result, coords(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]));
        assert_eq!(completed_lines(&grid, &called(&ROW0)), vec![Line::Row(0)]);
    }

    #[test]
    fn test_main_diagonal_through_free_cell() {
        let mut grid = full_grid();
        grid[0][0] = Some(5);
        grid[1][1] = Some(20);
        grid[2][2] = None;
        grid[3][3] = Some(50);
        grid[4][4] = Some(65);
        let result = evaluate(&grid, &called(&[5, 20, 50, 65]));
        assert_eq!(result, coords(&[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]));
    }

    #[test]
    fn test_anti_diagonal() {
        let grid = full_grid();
        let numbers: Vec<u8> = (0..5).filter_map(|i| grid[i][4 - i]).collect();
        let result = evaluate(&grid, &called(&numbers));
        assert_eq!(result, coords(&[(0, 4), (1, 3), (2, 2), (3, 1), (4, 0)]));
        assert_eq!(completed_lines(&grid, &called(&numbers)), vec![Line::AntiDiagonal]);
    }

    #[test]
    fn test_row_and_column_share_one_cell() {
        let grid = full_grid();
        let mut numbers: Vec<u8> = grid[1].iter().flatten().copied().collect();
        numbers.extend(grid.iter().filter_map(|row| row[3]));
        let result = evaluate(&grid, &called(&numbers));
        assert_eq!(result.len(), 9);
        assert!(result.contains(&(1, 3)));
        assert_eq!(completed_lines(&grid, &called(&numbers)), vec![Line::Row(1), Line::Column(3)]);
    }

    #[test]
    fn test_evaluate_is_idempotent_and_pure() {
        let grid = grid_with_free_centre();
        let calls = called(&[5, 20, 33, 50, 65, 2, 17]);
        let version = calls.version();
        let first = evaluate(&grid, &calls);
        let second = evaluate(&grid, &calls);
        assert_eq!(first, second);
        assert_eq!(calls.version(), version);
        assert_eq!(grid, grid_with_free_centre());
    }

    #[test]
    fn test_completed_lines_agree_with_evaluate() {
        let grid = grid_with_free_centre();
        let calls = called(&[5, 20, 33, 50, 65, 37, 39, 40, 9]);
        let union: WinningCells = completed_lines(&grid, &calls)
            .into_iter()
            .flat_map(Line::cells)
            .collect();
        assert_eq!(union, evaluate(&grid, &calls));
        assert_eq!(union.len(), 9);
    }

    #[test]
    fn test_line_cells() {
        assert_eq!(Line::Row(2).cells(), [(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)]);
        assert_eq!(Line::Column(0).cells(), [(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
        assert_eq!(Line::all().count(), 12);
        assert_eq!(Line::Column(1).to_string(), "column I");
    }

    #[test]
    fn test_pattern_four_corners_and_inner() {
        let grid = grid_with_free_centre();
        let corners: Vec<u8> = FOUR_CORNERS.iter().filter_map(|&(r, c)| grid[r][c]).collect();
        let calls = called(&corners);
        assert!(WinningPattern::FourCorners.is_satisfied(&grid, &calls));
        assert!(WinningPattern::All.is_satisfied(&grid, &calls));
        assert!(!WinningPattern::OneLine.is_satisfied(&grid, &calls));
        assert!(evaluate(&grid, &calls).is_empty());

        let inner: Vec<u8> = INNER_CORNERS_AND_CENTER.iter().filter_map(|&(r, c)| grid[r][c]).collect();
        assert!(WinningPattern::InnerCornersCenter.is_satisfied(&grid, &called(&inner)));
        assert!(!WinningPattern::FourCorners.is_satisfied(&grid, &called(&inner)));
    }

    #[test]
    fn test_pattern_lines_cross_and_full_house() {
        let grid = grid_with_free_centre();
        let row_calls = called(&ROW0);
        assert!(WinningPattern::OneLine.is_satisfied(&grid, &row_calls));
        assert!(!WinningPattern::TwoLines.is_satisfied(&grid, &row_calls));

        let mut cross: Vec<u8> = grid[2].iter().flatten().copied().collect();
        cross.extend(grid.iter().filter_map(|row| row[2]));
        let cross_calls = called(&cross);
        assert!(WinningPattern::Cross.is_satisfied(&grid, &cross_calls));
        assert!(WinningPattern::TwoLines.is_satisfied(&grid, &cross_calls));
        assert!(!WinningPattern::FullHouse.is_satisfied(&grid, &cross_calls));

        let everything: Vec<u8> = grid.iter().flatten().flatten().copied().collect();
        assert!(WinningPattern::FullHouse.is_satisfied(&grid, &called(&everything)));
        assert_eq!(evaluate(&grid, &called(&everything)).len(), 25);
    }

    #[test]
    fn test_pattern_names() {
        for pattern in WinningPattern::ALL_PATTERNS {
            assert_eq!(pattern.as_str().parse::<WinningPattern>(), Ok(pattern));
            assert_eq!(serde_json::to_value(pattern).unwrap(), pattern.as_str());
        }
        assert_eq!("full house".parse::<WinningPattern>(), Ok(WinningPattern::FullHouse));
        assert!("Diamond".parse::<WinningPattern>().is_err());
        assert_eq!(WinningPattern::default(), WinningPattern::All);
    }
}
