// CSV ingestion pipeline: tokenize -> map -> build -> extract founders, plus export

pub mod export;
pub mod ingestion;
pub mod processing;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::domain::NormalizedRecord;
use crate::error::{IngestError, Result};
use crate::types::ColumnMapping;

pub use export::{escape_field, serialize, EXPORT_COLUMNS, NO_DATA};
pub use ingestion::{preview, tokenize, tokenize_line, PreviewSample};
pub use processing::founders::{
    extract_all, extract_founders, extract_founders_with_overrides, parse_founders, FounderEntity,
    FounderGrammar, FounderOverride, FounderOverrides,
};
pub use processing::mapping::{resolve_mapping, suggest_mapping, MappingSource};
pub use processing::normalize::{build_records, IngestDiagnostics, RecordBuilder, SkipReason};

/// Result of one ingestion call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    pub records: Vec<NormalizedRecord>,
    pub diagnostics: IngestDiagnostics,
    /// The mapping that was applied to the rows
    pub mapping: ColumnMapping,
    pub mapping_source: MappingSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founders: Option<Vec<FounderEntity>>,
}

/// Stateless entry points for callers. Every call works on its own input
/// only, so one value can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestPipeline;

impl IngestPipeline {
    pub fn new() -> Self {
        Self
    }

    pub fn preview(&self, text: &str) -> Result<PreviewSample> {
        preview(text)
    }

    /// Heuristic mapping for the file's header row.
    pub fn suggest(&self, text: &str) -> Result<ColumnMapping> {
        let rows = tokenize(text);
        let headers = rows.first().ok_or(IngestError::EmptyInput)?;
        Ok(suggest_mapping(headers.fields()))
    }

    /// Tokenize, map and build. An explicit mapping replaces the heuristic one.
    pub fn ingest(&self, text: &str, mapping: Option<&ColumnMapping>) -> Result<IngestOutcome> {
        let span = info_span!("ingest", bytes = text.len());
        let _enter = span.enter();

        let rows = tokenize(text);
        if rows.is_empty() {
            return Err(IngestError::EmptyInput);
        }

        let (mapping, mapping_source) = resolve_mapping(rows[0].fields(), mapping);
        let output = RecordBuilder::new(mapping.clone()).build(&rows)?;

        info!(
            "Ingest finished ({:?} mapping): {}",
            mapping_source,
            output.diagnostics.summary()
        );

        Ok(IngestOutcome {
            records: output.records,
            diagnostics: output.diagnostics,
            mapping,
            mapping_source,
            founders: None,
        })
    }

    /// [`ingest`](Self::ingest) followed by founder extraction on every record.
    pub fn ingest_with_founders(
        &self,
        text: &str,
        mapping: Option<&ColumnMapping>,
        overrides: &FounderOverrides,
    ) -> Result<IngestOutcome> {
        let mut outcome = self.ingest(text, mapping)?;
        let founders = extract_all(&outcome.records, overrides);
        info!("Extracted {} founder(s) from {} record(s)", founders.len(), outcome.records.len());
        outcome.founders = Some(founders);
        Ok(outcome)
    }

    pub fn export(&self, records: &[NormalizedRecord]) -> String {
        serialize(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CanonicalField;

    #[test]
    fn test_ingest_empty_input() {
        let pipeline = IngestPipeline::new();
        assert!(matches!(pipeline.ingest("", None), Err(IngestError::EmptyInput)));
        assert!(matches!(pipeline.suggest("\n"), Err(IngestError::EmptyInput)));
    }

    #[test]
    fn test_ingest_header_only() {
        let err = IngestPipeline::new().ingest("Name,Sector\n", None).unwrap_err();
        assert!(matches!(err, IngestError::InsufficientRows { found: 1 }));
    }

    #[test]
    fn test_ingest_reports_applied_mapping() {
        let outcome = IngestPipeline::new()
            .ingest("Startup,Industry\nAcme,Fintech\n", None)
            .unwrap();
        assert_eq!(outcome.mapping_source, MappingSource::Suggested);
        assert_eq!(outcome.mapping.get(CanonicalField::Name), Some("Startup"));
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.founders.is_none());
    }

    #[test]
    fn test_explicit_mapping_is_not_merged() {
        let explicit: ColumnMapping = [
            (CanonicalField::Name, "Startup"),
            (CanonicalField::Sector, "Industry"),
        ]
        .into_iter()
        .collect();

        let outcome = IngestPipeline::new()
            .ingest("Startup,Industry,Country\nAcme,Fintech,US\n", Some(&explicit))
            .unwrap();

        assert_eq!(outcome.mapping_source, MappingSource::Explicit);
        // Country would be picked up heuristically, but the explicit mapping omits it.
        assert_eq!(outcome.records[0].country, None);
    }

    #[test]
    fn test_ingest_with_founders() {
        let csv = "ID,Name,Sector,Founders\n\
                   a,Acme,Fintech,\"Jane Doe: Ex-Google PM; John Smith: Stanford MBA\"\n\
                   b,Beta,AI,Ann & Raj\n";
        let outcome = IngestPipeline::new()
            .ingest_with_founders(csv, None, &FounderOverrides::new())
            .unwrap();

        let founders = outcome.founders.unwrap();
        let ids: Vec<_> = founders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a-founder-0", "a-founder-1", "b-founder-0", "b-founder-1"]);
        assert_eq!(founders[3].name, "Raj");
    }
}
