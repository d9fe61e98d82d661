//! Cardpress core library — domain types, deck-list ingestion, config, errors.
//!
//! Public API surface:
//! - [`types`] — [`CardName`], [`TemplateName`], [`CardId`] newtypes
//! - [`table`] — [`Table`] / [`Row`] deck-list model
//! - [`config`] — [`DeckConfig`] project file
//! - [`error`] — [`TableError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod table;
pub mod types;

pub use config::{load_config, load_config_if_present, DeckConfig, CONFIG_FILE};
pub use error::{ConfigError, TableError};
pub use table::{Row, Table};
pub use types::{CardId, CardName, TemplateName};
