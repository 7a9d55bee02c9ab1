//! Speleo CLI library.
//!
//! Terminal styling and output formatting shared by the `speleo-cli`
//! subcommands.

pub mod output;
pub mod terminal;
