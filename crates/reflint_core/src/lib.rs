//! # reflint_core
//!
//! Cross-reference resolution engine for mod script assets.
//!
//! This crate provides:
//! - Corpus selection over a mod directory tree
//! - Occurrence extraction for flags, event targets and scripted localisation
//! - Set reconciliation with false-positive suppression
//! - Located, deduplicated defect reports
//!
//! ## Example
//!
//! ```rust,ignore
//! use reflint_core::{Corpus, Report, variables};
//!
//! let corpus = Corpus::open("path/to/mod")?;
//! let mut report = Report::new(true);
//! let issues = variables::run(&corpus, &mut report, None)?;
//! println!("{issues} issues found");
//! ```

pub mod corpus;
mod error;
pub mod extract;
pub mod filter;
pub mod locate;
pub mod reconcile;
pub mod report;
pub mod scripted_loc;
pub mod variables;

pub use corpus::{Corpus, FileScope, read_text};
pub use error::ValidatorError;
pub use extract::{FlagKind, OccurrenceSet};
pub use report::Report;
