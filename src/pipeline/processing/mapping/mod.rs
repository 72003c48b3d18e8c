// Column mapping: heuristic header suggestions and explicit caller mappings

pub mod rules;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use rules::{match_header, HeaderMatch, MappingRule, MAPPING_RULES};

use crate::observability::metrics;
use crate::types::ColumnMapping;

/// Where the mapping applied to a batch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappingSource {
    Explicit,
    Suggested,
}

/// Best-guess mapping from canonical fields to `headers`.
///
/// Headers are visited left to right and each one is matched against
/// [`MAPPING_RULES`]. When two headers resolve to the same field the leftmost
/// keeps it. Headers that match nothing are left out. Never fails.
pub fn suggest_mapping<S: AsRef<str>>(headers: &[S]) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();
    let mut unmatched = 0usize;

    for header in headers {
        let header = header.as_ref();
        match match_header(header) {
            Some(field) => {
                if !mapping.insert_if_absent(field, header) {
                    debug!("suggest_mapping: '{}' also matches {}, keeping earlier header", header, field);
                }
            }
            None => unmatched += 1,
        }
    }

    debug!(
        "suggest_mapping: headers={} mapped={} unmatched={}",
        headers.len(),
        mapping.len(),
        unmatched
    );
    metrics::mapping::suggestion_computed(headers.len() - unmatched, unmatched);

    mapping
}

/// The explicit mapping when given, otherwise the heuristic suggestion.
/// The two are never merged.
pub fn resolve_mapping<S: AsRef<str>>(
    headers: &[S],
    explicit: Option<&ColumnMapping>,
) -> (ColumnMapping, MappingSource) {
    match explicit {
        Some(mapping) => {
            metrics::mapping::explicit_used();
            (mapping.clone(), MappingSource::Explicit)
        }
        None => (suggest_mapping(headers), MappingSource::Suggested),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CanonicalField;

    #[test]
    fn test_suggest_mapping_typical_export() {
        let headers = [
            "Company Name",
            "Industry",
            "Stage",
            "Country",
            "Score",
            "Founders",
            "Website",
            "Notes",
        ];
        let mapping = suggest_mapping(&headers);

        assert_eq!(mapping.get(CanonicalField::Name), Some("Company Name"));
        assert_eq!(mapping.get(CanonicalField::Sector), Some("Industry"));
        assert_eq!(mapping.get(CanonicalField::Stage), Some("Stage"));
        assert_eq!(mapping.get(CanonicalField::Country), Some("Country"));
        assert_eq!(mapping.get(CanonicalField::Score), Some("Score"));
        assert_eq!(mapping.get(CanonicalField::Founders), Some("Founders"));
        assert_eq!(mapping.get(CanonicalField::Website), Some("Website"));
        assert_eq!(mapping.len(), 7);
    }

    #[test]
    fn test_leftmost_header_keeps_field() {
        let mapping = suggest_mapping(&["Industry", "Sub-Industry"]);
        assert_eq!(mapping.get(CanonicalField::Sector), Some("Industry"));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_no_headers_match() {
        assert!(suggest_mapping(&["foo", "bar"]).is_empty());
        assert!(suggest_mapping::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_suggest_mapping_is_pure() {
        let headers = vec!["Name".to_string(), "Sector".to_string(), "Rating".to_string()];
        assert_eq!(suggest_mapping(&headers), suggest_mapping(&headers));
    }

    #[test]
    fn test_explicit_mapping_replaces_heuristics() {
        let headers = ["Company Name", "Industry", "Vertical"];
        let explicit: ColumnMapping = [
            (CanonicalField::Name, "Company Name"),
            (CanonicalField::Sector, "Vertical"),
        ]
        .into_iter()
        .collect();

        let (mapping, source) = resolve_mapping(&headers, Some(&explicit));
        assert_eq!(source, MappingSource::Explicit);
        assert_eq!(mapping, explicit);

        let (mapping, source) = resolve_mapping(&headers, None);
        assert_eq!(source, MappingSource::Suggested);
        assert_eq!(mapping.get(CanonicalField::Sector), Some("Industry"));
    }
}
