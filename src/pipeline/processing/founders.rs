// Founder extraction: free-text founders field into discrete founder entities

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::domain::NormalizedRecord;
use crate::error::Result;
use crate::observability::metrics;

/// Separators for the simple grammar: commas, ampersands, or a standalone "and"
static SIMPLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i),|&|\band\b").expect("founder separator regex is valid"));

/// One founder parsed out of a record, with the company context copied in.
///
/// The id is `{record id}-founder-{ordinal}` and is only stable as long as
/// the source text keeps the same founder order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FounderEntity {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_experience: Option<String>,
    pub company: CompanyRef,
}

/// Company display fields denormalized onto a founder, plus the back-reference id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    pub company_id: String,
    pub name: String,
    pub sector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl CompanyRef {
    fn from_record(record: &NormalizedRecord) -> Self {
        Self {
            company_id: record.id.clone(),
            name: record.name.clone(),
            sector: record.sector.clone(),
            rank: record.company.rank,
            website: record.company.website.clone(),
            linkedin: record.company.linkedin.clone(),
            description: record.description.clone(),
            country: record.country.clone(),
        }
    }
}

/// A founder supplied by the caller instead of parsed from text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FounderOverride {
    pub name: String,
    #[serde(default)]
    pub background: Option<String>,
}

impl FounderOverride {
    pub fn new(name: impl Into<String>, background: Option<&str>) -> Self {
        Self {
            name: name.into(),
            background: background.map(str::to_string),
        }
    }
}

/// Explicit founder lists keyed by record id. A record with an entry is not
/// parsed; its override list is used instead, minus entries with blank names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FounderOverrides(HashMap<String, Vec<FounderOverride>>);

impl FounderOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record_id: impl Into<String>, founders: Vec<FounderOverride>) {
        self.0.insert(record_id.into(), founders);
    }

    pub fn get(&self, record_id: &str) -> Option<&[FounderOverride]> {
        self.0.get(record_id).map(Vec::as_slice)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Which grammar a founders string was read with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FounderGrammar {
    /// `Name: background; Name: background`
    Structured,
    /// `Name, Name & Name and Name`
    Simple,
}

impl FounderGrammar {
    pub fn detect(text: &str) -> Self {
        if text.contains(';') && text.contains(':') {
            FounderGrammar::Structured
        } else {
            FounderGrammar::Simple
        }
    }
}

/// Split founders text into `(name, background)` pairs.
pub fn parse_founders(text: &str) -> Vec<(String, Option<String>)> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    match FounderGrammar::detect(text) {
        FounderGrammar::Structured => text
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once(':') {
                Some((name, background)) => {
                    let background = background.trim();
                    (
                        name.trim().to_string(),
                        (!background.is_empty()).then(|| background.to_string()),
                    )
                }
                None => (entry.to_string(), None),
            })
            .filter(|(name, _)| !name.is_empty())
            .collect(),
        FounderGrammar::Simple => SIMPLE_SEPARATOR
            .split(text)
            .map(str::trim)
            .filter(|piece| !piece.is_empty() && !piece.eq_ignore_ascii_case("and"))
            .map(|piece| (piece.to_string(), None))
            .collect(),
    }
}

fn to_entities<I>(record: &NormalizedRecord, founders: I) -> Vec<FounderEntity>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    let company = CompanyRef::from_record(record);
    founders
        .into_iter()
        .enumerate()
        .map(|(ordinal, (name, background))| {
            let (education, prior_experience) = if background.is_some() {
                (None, None)
            } else {
                (
                    record.team.education.clone(),
                    record.team.prior_experience.clone(),
                )
            };
            FounderEntity {
                id: format!("{}-founder-{}", record.id, ordinal),
                name,
                background,
                education,
                prior_experience,
                company: company.clone(),
            }
        })
        .collect()
}

/// Founder entities for one record, parsed from its founders field.
pub fn extract_founders(record: &NormalizedRecord) -> Vec<FounderEntity> {
    let parsed = record
        .team
        .founders
        .as_deref()
        .map(parse_founders)
        .unwrap_or_default();
    let founders = to_entities(record, parsed);
    metrics::founders::extracted(founders.len());
    founders
}

/// Like [`extract_founders`], but an override list for the record wins over
/// its founders text.
pub fn extract_founders_with_overrides(
    record: &NormalizedRecord,
    overrides: &FounderOverrides,
) -> Vec<FounderEntity> {
    match overrides.get(&record.id) {
        Some(list) => {
            debug!("extract_founders: using {} override(s) for {}", list.len(), record.id);
            metrics::founders::overridden();
            let founders = to_entities(
                record,
                list.iter()
                    .filter(|f| !f.name.trim().is_empty())
                    .map(|f| {
                        let background = f.background.as_deref().map(str::trim).filter(|b| !b.is_empty());
                        (f.name.trim().to_string(), background.map(str::to_string))
                    }),
            );
            metrics::founders::extracted(founders.len());
            founders
        }
        None => extract_founders(record),
    }
}

/// Per-record extraction over a batch, flattened. No cross-record dedup.
pub fn extract_all(records: &[NormalizedRecord], overrides: &FounderOverrides) -> Vec<FounderEntity> {
    let founders: Vec<FounderEntity> = records
        .iter()
        .flat_map(|record| extract_founders_with_overrides(record, overrides))
        .collect();
    debug!("extract_all: records={} founders={}", records.len(), founders.len());
    founders
}
