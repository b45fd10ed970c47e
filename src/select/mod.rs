//! Review and selection of discovered upgrades
//!
//! This module provides:
//! - Identifier filter policies
//! - The selection model with toggling, filtering, paging and commit
//! - Parsing of operator input lines

mod filter;
mod input;
mod model;

pub use filter::FilterPolicy;
pub use input::{spawn_stdin_reader, UserEvent, HELP};
pub use model::{ListItem, Page, SelectionModel, DEFAULT_PAGE_SIZE};
