//! Tabular ingestion for startup deal-flow CSV exports.
//!
//! Raw CSV text is tokenized, its headers are mapped onto a canonical
//! schema (heuristically, or with a caller-supplied mapping), and each data
//! row becomes a [`domain::NormalizedRecord`]. Rows missing a name or sector
//! are skipped and reported in [`pipeline::IngestDiagnostics`] rather than
//! failing the batch. Founder entities can be mined from each record's
//! founders text, and records can be exported back to CSV.
//!
//! The whole pipeline is synchronous and holds no state between calls.
//! File and network I/O belong to callers such as the bundled binary.

pub mod config;
pub mod domain;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod types;

pub use domain::NormalizedRecord;
pub use error::{IngestError, Result};
pub use pipeline::{IngestOutcome, IngestPipeline};
pub use types::{CanonicalField, ColumnMapping, RawRow};
