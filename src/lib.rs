//! treesort - sort a directory tree into single-letter buckets.
//!
//! Every regular file found below the entry directory is copied to
//! `<dist>/<first letter, lowercased>/<file name>`. Subdirectories are
//! flattened. The entry directory can be deleted once the sort succeeded.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utility;

pub use crate::cli::args::{CLIArgs, CollisionPolicy, SortOptions};
pub use crate::core::copy::delete_tree;
pub use crate::core::sorter::{SortReport, TreeSorter};
pub use crate::error::{SortError, SortResult};
