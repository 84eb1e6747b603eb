//! # Data Loader Crate
//!
//! This crate turns raw Epinions input lines into typed records.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (RatingRecord, TrustEdge, InputRecord)
//! - **parser**: Classify tab-delimited rows and read input files
//! - **summary**: Count what a batch of lines contains
//! - **synthetic**: Seeded generator of Epinions-shaped input lines
//! - **error**: Row-level and file-level error types
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{parse_line, read_lines, InputRecord};
//! use std::path::Path;
//!
//! let lines = read_lines(Path::new("data/epinions.tsv"))?;
//! for line in &lines {
//!     match parse_line(line) {
//!         Some(InputRecord::Rating(r)) => println!("{} rated {}", r.user_id, r.item_id),
//!         Some(InputRecord::Trust(e)) if e.is_positive() => println!("{} trusts {}", e.truster, e.trustee),
//!         _ => {}
//!     }
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod summary;
pub mod synthetic;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result, RowError};
pub use parser::{parse_line, read_lines};
pub use summary::ParseSummary;
pub use synthetic::SyntheticSpec;
pub use types::{
    // Type aliases
    UserId,
    ItemId,
    // Core types
    RatingRecord,
    TrustEdge,
    InputRecord,
};
