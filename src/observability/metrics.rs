//! Metrics for the ingestion pipeline.
//!
//! Every stage records through the `metrics` facade. Without an installed
//! recorder the calls are no-ops, so the library stays side-effect free for
//! callers that do not care about metrics.

use std::fmt;

/// Enum representing all metric names used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Tokenizer metrics
    TokenizerRowsEmitted,
    TokenizerBlankLinesDropped,
    TokenizerBytesProcessed,

    // Mapping metrics
    MappingSuggestions,
    MappingHeadersMatched,
    MappingHeadersUnmatched,
    MappingExplicitUsed,

    // Record builder metrics
    BuildRecordsAccepted,
    BuildRowsSkipped,
    BuildMissingScores,
    BuildBatchSize,

    // Founder metrics
    FoundersExtracted,
    FoundersOverridden,

    // Export metrics
    ExportRecordsWritten,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::TokenizerRowsEmitted => "deal_ingest_tokenizer_rows_emitted_total",
            MetricName::TokenizerBlankLinesDropped => "deal_ingest_tokenizer_blank_lines_dropped_total",
            MetricName::TokenizerBytesProcessed => "deal_ingest_tokenizer_bytes_processed",

            MetricName::MappingSuggestions => "deal_ingest_mapping_suggestions_total",
            MetricName::MappingHeadersMatched => "deal_ingest_mapping_headers_matched_total",
            MetricName::MappingHeadersUnmatched => "deal_ingest_mapping_headers_unmatched_total",
            MetricName::MappingExplicitUsed => "deal_ingest_mapping_explicit_used_total",

            MetricName::BuildRecordsAccepted => "deal_ingest_build_records_accepted_total",
            MetricName::BuildRowsSkipped => "deal_ingest_build_rows_skipped_total",
            MetricName::BuildMissingScores => "deal_ingest_build_missing_scores_total",
            MetricName::BuildBatchSize => "deal_ingest_build_batch_size",

            MetricName::FoundersExtracted => "deal_ingest_founders_extracted_total",
            MetricName::FoundersOverridden => "deal_ingest_founders_overridden_total",

            MetricName::ExportRecordsWritten => "deal_ingest_export_records_written_total",
        }
    }

    /// Get all metric names (used to pre-register descriptions)
    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            TokenizerRowsEmitted,
            TokenizerBlankLinesDropped,
            TokenizerBytesProcessed,
            MappingSuggestions,
            MappingHeadersMatched,
            MappingHeadersUnmatched,
            MappingExplicitUsed,
            BuildRecordsAccepted,
            BuildRowsSkipped,
            BuildMissingScores,
            BuildBatchSize,
            FoundersExtracted,
            FoundersOverridden,
            ExportRecordsWritten,
        ]
        .into_iter()
    }

    /// Human-readable description for the exposition output
    pub fn description(&self) -> &'static str {
        match self {
            MetricName::TokenizerRowsEmitted => "Rows emitted by the CSV tokenizer",
            MetricName::TokenizerBlankLinesDropped => "Blank or all-empty lines dropped by the tokenizer",
            MetricName::TokenizerBytesProcessed => "Size of CSV text handed to the tokenizer",
            MetricName::MappingSuggestions => "Heuristic mapping suggestions computed",
            MetricName::MappingHeadersMatched => "Headers matched by a mapping rule",
            MetricName::MappingHeadersUnmatched => "Headers no mapping rule matched",
            MetricName::MappingExplicitUsed => "Ingestions run with an explicit column mapping",
            MetricName::BuildRecordsAccepted => "Rows accepted as normalized records",
            MetricName::BuildRowsSkipped => "Rows skipped for missing required fields",
            MetricName::BuildMissingScores => "Rows whose score defaulted to 0",
            MetricName::BuildBatchSize => "Data rows per build batch",
            MetricName::FoundersExtracted => "Founder entities produced",
            MetricName::FoundersOverridden => "Records whose founders came from an override list",
            MetricName::ExportRecordsWritten => "Records serialized to CSV",
        }
    }
}

/// Register descriptions for every metric with the installed recorder.
pub fn describe_all() {
    for name in MetricName::all_metrics() {
        match name {
            MetricName::TokenizerBytesProcessed | MetricName::BuildBatchSize => {
                ::metrics::describe_histogram!(name.as_str(), name.description());
            }
            _ => {
                ::metrics::describe_counter!(name.as_str(), name.description());
            }
        }
    }
}

// ============================================================================
// Tokenizer Metrics
// ============================================================================

pub mod tokenizer {
    use super::MetricName;

    pub fn rows_emitted(count: usize) {
        ::metrics::counter!(MetricName::TokenizerRowsEmitted.as_str()).increment(count as u64);
    }

    pub fn blank_lines_dropped(count: usize) {
        ::metrics::counter!(MetricName::TokenizerBlankLinesDropped.as_str()).increment(count as u64);
    }

    pub fn bytes_processed(bytes: usize) {
        ::metrics::histogram!(MetricName::TokenizerBytesProcessed.as_str()).record(bytes as f64);
    }
}

// ============================================================================
// Mapping Metrics
// ============================================================================

pub mod mapping {
    use super::MetricName;

    pub fn suggestion_computed(matched: usize, unmatched: usize) {
        ::metrics::counter!(MetricName::MappingSuggestions.as_str()).increment(1);
        ::metrics::counter!(MetricName::MappingHeadersMatched.as_str()).increment(matched as u64);
        ::metrics::counter!(MetricName::MappingHeadersUnmatched.as_str()).increment(unmatched as u64);
    }

    pub fn explicit_used() {
        ::metrics::counter!(MetricName::MappingExplicitUsed.as_str()).increment(1);
    }
}

// ============================================================================
// Record Builder Metrics
// ============================================================================

pub mod build {
    use super::MetricName;

    /// Record the outcome of one build batch
    pub fn batch_completed(accepted: usize, skipped: usize, missing_scores: usize) {
        ::metrics::counter!(MetricName::BuildRecordsAccepted.as_str()).increment(accepted as u64);
        ::metrics::counter!(MetricName::BuildRowsSkipped.as_str()).increment(skipped as u64);
        ::metrics::counter!(MetricName::BuildMissingScores.as_str()).increment(missing_scores as u64);
        ::metrics::histogram!(MetricName::BuildBatchSize.as_str()).record((accepted + skipped) as f64);
    }
}

// ============================================================================
// Founder Metrics
// ============================================================================

pub mod founders {
    use super::MetricName;

    pub fn extracted(count: usize) {
        ::metrics::counter!(MetricName::FoundersExtracted.as_str()).increment(count as u64);
    }

    pub fn overridden() {
        ::metrics::counter!(MetricName::FoundersOverridden.as_str()).increment(1);
    }
}

// ============================================================================
// Export Metrics
// ============================================================================

pub mod export {
    use super::MetricName;

    pub fn records_written(count: usize) {
        ::metrics::counter!(MetricName::ExportRecordsWritten.as_str()).increment(count as u64);
    }
}
