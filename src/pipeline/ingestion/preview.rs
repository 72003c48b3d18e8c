use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tokenizer::tokenize;
use crate::error::{IngestError, Result};

/// Number of data rows returned for mapping UIs
pub const PREVIEW_SAMPLE_ROWS: usize = 3;

/// Headers, a few leading data rows and the full data row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSample {
    pub headers: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
    /// All data rows, not just the sampled ones
    pub row_count: usize,
}

pub fn preview(text: &str) -> Result<PreviewSample> {
    let mut rows = tokenize(text).into_iter();
    let headers = rows.next().ok_or(IngestError::EmptyInput)?.into_fields();

    let data: Vec<_> = rows.collect();
    let row_count = data.len();
    let sample_rows = data
        .into_iter()
        .take(PREVIEW_SAMPLE_ROWS)
        .map(|row| row.into_fields())
        .collect();

    debug!("preview: headers={} rows={}", headers.len(), row_count);

    Ok(PreviewSample {
        headers,
        sample_rows,
        row_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_caps_sample_but_counts_all_rows() {
        let csv = "Name,Sector\nA,x\nB,y\nC,z\nD,w\nE,v\n";
        let sample = preview(csv).unwrap();

        assert_eq!(sample.headers, vec!["Name", "Sector"]);
        assert_eq!(sample.sample_rows.len(), 3);
        assert_eq!(sample.sample_rows[2], vec!["C", "z"]);
        assert_eq!(sample.row_count, 5);
    }

    #[test]
    fn test_preview_with_fewer_rows_than_cap() {
        let sample = preview("Name,Sector\nA,x\n").unwrap();
        assert_eq!(sample.sample_rows.len(), 1);
        assert_eq!(sample.row_count, 1);
    }

    #[test]
    fn test_preview_header_only() {
        let sample = preview("Name,Sector").unwrap();
        assert!(sample.sample_rows.is_empty());
        assert_eq!(sample.row_count, 0);
    }

    #[test]
    fn test_preview_empty_input() {
        assert!(matches!(preview(""), Err(IngestError::EmptyInput)));
        assert!(matches!(preview("\n ,\n"), Err(IngestError::EmptyInput)));
    }

    #[test]
    fn test_preview_serializes_camel_case() {
        let sample = preview("Name\nA").unwrap();
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["rowCount"], 1);
        assert_eq!(json["sampleRows"][0][0], "A");
    }
}
