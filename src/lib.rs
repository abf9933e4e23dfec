//! # Connect Four
//!
//! A two-player Connect Four game. Pieces drop to the lowest empty cell of a
//! column; four in a row, column, or diagonal wins, a full board without one
//! is a tie. Ships with a terminal UI built with Ratatui.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, players, state, engine, session events
//! - [`ui`] — Terminal UI: board view, keyboard and mouse input
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod ui;
