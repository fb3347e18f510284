//! WordSketch Application
//!
//! The drawing surface children draw on, the word game flow around it, and
//! the command line tool for rendering saved drawings.

pub mod cli;
mod config;
mod game;
mod surface;

pub use config::{AppConfig, ConfigError};
pub use game::{Advance, SubmitOutcome, WordGame, load_word_set};
pub use surface::{DrawingSurface, ExportError};
