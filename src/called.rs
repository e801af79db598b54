// src/called.rs
// Numbers announced during the current round.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::defs::{Number, FIRSTNUMBER, LASTNUMBER};

/// Called numbers for one round. Grows monotonically until `reset`.
///
/// `version` changes every time a new number is added, so callers can key
/// cached evaluations on `(card_id, version)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Number>", into = "Vec<Number>")]
pub struct CalledNumbers {
    order: Vec<Number>,
    set: HashSet<Number>,
    version: u64,
}

impl CalledNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the number was not called before.
    pub fn insert(&mut self, number: Number) -> bool {
        if !self.set.insert(number) {
            return false;
        }
        self.order.push(number);
        self.version += 1;
        true
    }

    pub fn contains(&self, number: Number) -> bool {
        self.set.contains(&number)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Start a new round.
    pub fn reset(&mut self) {
        self.order.clear();
        self.set.clear();
        self.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Numbers in call order.
    pub fn iter(&self) -> impl Iterator<Item = Number> + '_ {
        self.order.iter().copied()
    }

    pub fn last(&self) -> Option<Number> {
        self.order.last().copied()
    }

    /// Parse a comma or whitespace separated list such as `"5, 20 33"`.
    /// Values outside 1..=75 are rejected.
    pub fn parse_list(input: &str) -> Result<Self, String> {
        let mut called = Self::new();
        for token in input.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
            let number: Number = token.parse().map_err(|_| format!("'{token}' is not a number"))?;
            if !(FIRSTNUMBER..=LASTNUMBER).contains(&number) {
                return Err(format!("{number} is not between {FIRSTNUMBER} and {LASTNUMBER}"));
            }
            called.insert(number);
        }
        Ok(called)
    }
}

impl FromIterator<Number> for CalledNumbers {
    fn from_iter<T: IntoIterator<Item = Number>>(iter: T) -> Self {
        let mut called = Self::new();
        for number in iter {
            called.insert(number);
        }
        called
    }
}

impl From<Vec<Number>> for CalledNumbers {
    fn from(numbers: Vec<Number>) -> Self {
        numbers.into_iter().collect()
    }
}

impl From<CalledNumbers> for Vec<Number> {
    fn from(called: CalledNumbers) -> Self {
        called.order
    }
}
