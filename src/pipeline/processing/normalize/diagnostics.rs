use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a data row did not become a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipReason {
    /// 1-based row number in the tokenized input (the header is row 1)
    pub row: usize,
    pub reason: String,
}

/// Batch report returned alongside the records. Not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestDiagnostics {
    pub parsed: usize,
    pub skipped: usize,
    pub missing_scores: usize,
    pub skip_reasons: Vec<SkipReason>,
}

impl IngestDiagnostics {
    /// Data rows seen, accepted or not
    pub fn total_rows(&self) -> usize {
        self.parsed + self.skipped
    }

    pub fn has_skips(&self) -> bool {
        self.skipped > 0
    }

    pub(crate) fn record_parsed(mut self, missing_score: bool) -> Self {
        self.parsed += 1;
        if missing_score {
            self.missing_scores += 1;
        }
        self
    }

    pub(crate) fn record_skip(mut self, row: usize, reason: String) -> Self {
        self.skipped += 1;
        self.skip_reasons.push(SkipReason { row, reason });
        self
    }

    /// One-line summary, e.g. "parsed 480 of 500 rows; 3 missing scores defaulted to 0"
    pub fn summary(&self) -> String {
        let mut out = format!("parsed {} of {} rows", self.parsed, self.total_rows());
        if self.skipped > 0 {
            out.push_str(&format!("; {} skipped", self.skipped));
        }
        if self.missing_scores > 0 {
            out.push_str(&format!(
                "; {} missing score{} defaulted to 0",
                self.missing_scores,
                if self.missing_scores == 1 { "" } else { "s" }
            ));
        }
        out
    }
}

impl fmt::Display for IngestDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let diagnostics = IngestDiagnostics {
            parsed: 480,
            skipped: 20,
            missing_scores: 3,
            skip_reasons: Vec::new(),
        };
        assert_eq!(
            diagnostics.summary(),
            "parsed 480 of 500 rows; 20 skipped; 3 missing scores defaulted to 0"
        );
    }

    #[test]
    fn test_summary_clean_batch() {
        let diagnostics = IngestDiagnostics::default().record_parsed(false);
        assert_eq!(diagnostics.summary(), "parsed 1 of 1 rows");
        assert!(!diagnostics.has_skips());
    }

    #[test]
    fn test_serialized_shape() {
        let diagnostics = IngestDiagnostics::default()
            .record_parsed(true)
            .record_skip(3, "missing required field(s): sector".to_string());
        let json = serde_json::to_value(&diagnostics).unwrap();

        assert_eq!(json["parsed"], 1);
        assert_eq!(json["skipped"], 1);
        assert_eq!(json["missingScores"], 1);
        assert_eq!(json["skipReasons"][0]["row"], 3);
    }
}
