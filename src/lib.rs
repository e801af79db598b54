// lib.rs
// Library modules for the Alfarha bingo operator client

pub mod defs;
pub mod error;
pub mod logging;
pub mod config;
pub mod called;
pub mod card;
pub mod pattern;
pub mod settings;
pub mod session;
pub mod api;
pub mod notify;
pub mod results;
pub mod terminal;
pub mod stub;
