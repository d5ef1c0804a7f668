//! Shell alias definitions and alias expansion.
//!
//! An [`AliasTable`] holds aliases in definition order. [`expand`] rewrites
//! a command line by replacing every alias key that sits in command position
//! and is not escaped with a backslash. Which positions count as command
//! positions is decided by a [`CommandPosition`] implementation supplied by
//! the caller; [`ShellGrammar`] covers the common separators.
//!
//! ```
//! use shalias::{expand, AliasTable, ShellGrammar};
//!
//! let mut table = AliasTable::new();
//! table.define("ll", "ls -la", &ShellGrammar).unwrap();
//!
//! assert_eq!(expand("ll /tmp", &table, &ShellGrammar), "ls -la /tmp");
//! assert_eq!(expand("echo ll", &table, &ShellGrammar), "echo ll");
//! assert_eq!(expand("\\ll", &table, &ShellGrammar), "ll");
//! ```

pub mod complete;
pub mod config;
pub mod error;
pub mod expand;
pub mod grammar;
pub mod listing;
pub mod session;
pub mod table;

pub use complete::KeyCache;
pub use config::{ExpansionMode, Settings, Truncation};
pub use error::{AliasError, AliasResult, ConfigError};
pub use expand::{expand, try_expand};
pub use grammar::{CommandPosition, ShellGrammar};
pub use session::Session;
pub use table::{AliasEntry, AliasTable};
