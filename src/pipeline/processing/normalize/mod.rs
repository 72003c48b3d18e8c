// Record building: mapped CSV rows into normalized company records

pub mod diagnostics;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

pub use diagnostics::{IngestDiagnostics, SkipReason};

use crate::domain::{
    BusinessModelInfo, CompanyInfo, CompetitiveInfo, DetailedMetrics, MarketInfo,
    NormalizedRecord, OpportunityInfo, ProductInfo, RiskInfo, SalesInfo, TeamInfo,
};
use crate::error::{IngestError, Result};
use crate::observability::metrics;
use crate::types::{CanonicalField as F, ColumnMapping, RawRow};

/// Header text -> column position. A repeated header resolves to its last column.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex(HashMap<String, usize>);

impl HeaderIndex {
    pub fn from_row(headers: &RawRow) -> Self {
        Self(
            headers
                .iter()
                .enumerate()
                .map(|(position, header)| (header.to_string(), position))
                .collect(),
        )
    }

    pub fn position(&self, header: &str) -> Option<usize> {
        self.0.get(header).copied()
    }
}

/// Read access to one data row through the header index and mapping.
pub struct RowView<'a> {
    row: &'a RawRow,
    index: &'a HeaderIndex,
    mapping: &'a ColumnMapping,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a RawRow, index: &'a HeaderIndex, mapping: &'a ColumnMapping) -> Self {
        Self { row, index, mapping }
    }

    /// Trimmed cell for `field`; `None` when the field is unmapped, its
    /// header is not in the file, or the cell is blank.
    pub fn value(&self, field: F) -> Option<&'a str> {
        let header = self.mapping.get(field)?;
        let position = self.index.position(header)?;
        let cell = self.row.get(position)?.trim();
        (!cell.is_empty()).then_some(cell)
    }

    pub fn text(&self, field: F) -> Option<String> {
        self.value(field).map(str::to_string)
    }

    /// Cell for `field` as a number, see [`parse_numeric`].
    pub fn number(&self, field: F) -> Option<f64> {
        self.value(field).and_then(parse_numeric)
    }
}

/// Leading decimal number, optionally signed and with an exponent
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("leading number regex is valid")
});

/// Parse a spreadsheet-style number, ignoring `%`, `,`, `$` and whitespace.
///
/// Reads the longest numeric prefix, so `8/10` is 8 and `18 months` is 18.
/// Returns `None` when the cleaned text does not start with a finite number.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '%' | ',' | '$') && !c.is_whitespace())
        .collect();
    LEADING_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Records built from one batch plus the batch report
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub records: Vec<NormalizedRecord>,
    pub diagnostics: IngestDiagnostics,
}

/// Builds normalized records from tokenized rows with a fixed column mapping.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    mapping: ColumnMapping,
}

impl RecordBuilder {
    pub fn new(mapping: ColumnMapping) -> Self {
        Self { mapping }
    }

    /// Build one record per acceptable data row. `rows[0]` is the header.
    ///
    /// Rows missing `name` or `sector` are skipped and reported in the
    /// diagnostics; they never abort the batch.
    pub fn build(&self, rows: &[RawRow]) -> Result<BuildOutput> {
        if rows.len() < 2 {
            return Err(IngestError::InsufficientRows { found: rows.len() });
        }

        let index = HeaderIndex::from_row(&rows[0]);
        debug!(
            "RecordBuilder: start data_rows={} mapped_fields={}",
            rows.len() - 1,
            self.mapping.len()
        );

        let output = rows.iter().enumerate().skip(1).fold(
            BuildOutput::default(),
            |BuildOutput { mut records, diagnostics }, (position, row)| {
                let row_number = position + 1;
                let view = RowView::new(row, &index, &self.mapping);

                match build_record(&view, row_number) {
                    Ok((record, missing_score)) => {
                        if missing_score {
                            debug!("RecordBuilder: row {} has no usable score, defaulting to 0", row_number);
                        }
                        records.push(record);
                        BuildOutput {
                            records,
                            diagnostics: diagnostics.record_parsed(missing_score),
                        }
                    }
                    Err(missing) => {
                        let reason = format!("missing required field(s): {}", join_fields(&missing));
                        warn!("RecordBuilder: skipping row {}: {}", row_number, reason);
                        BuildOutput {
                            records,
                            diagnostics: diagnostics.record_skip(row_number, reason),
                        }
                    }
                }
            },
        );

        let d = &output.diagnostics;
        metrics::build::batch_completed(d.parsed, d.skipped, d.missing_scores);
        debug!("RecordBuilder: {}", d.summary());

        Ok(output)
    }
}

/// Convenience wrapper around [`RecordBuilder::build`].
pub fn build_records(rows: &[RawRow], mapping: &ColumnMapping) -> Result<BuildOutput> {
    RecordBuilder::new(mapping.clone()).build(rows)
}

fn join_fields(fields: &[F]) -> String {
    fields.iter().map(F::as_str).collect::<Vec<_>>().join(", ")
}

/// Returns the record and whether its score had to be defaulted, or the
/// required fields that were missing.
fn build_record(view: &RowView<'_>, row_number: usize) -> std::result::Result<(NormalizedRecord, bool), Vec<F>> {
    let name = view.text(F::Name);
    let sector = view.text(F::Sector);

    let (name, sector) = match (name, sector) {
        (Some(name), Some(sector)) => (name, sector),
        (name, sector) => {
            let mut missing = Vec::new();
            if name.is_none() {
                missing.push(F::Name);
            }
            if sector.is_none() {
                missing.push(F::Sector);
            }
            return Err(missing);
        }
    };

    let score = view.number(F::Score).or_else(|| view.number(F::Rating));

    let record = NormalizedRecord {
        id: view
            .text(F::Id)
            .unwrap_or_else(|| format!("company-{}", row_number)),
        name,
        sector,
        stage: view.text(F::Stage),
        country: view.text(F::Country),
        description: view.text(F::Description),
        score: score.unwrap_or(0.0),
        company: CompanyInfo {
            rank: view.number(F::Rank),
            website: view.text(F::Website),
            linkedin: view.text(F::Linkedin),
            founded_year: view.number(F::FoundedYear),
            headquarters: view.text(F::Headquarters),
            employee_count: view.number(F::EmployeeCount),
            funding_raised: view.number(F::FundingRaised),
        },
        market: MarketInfo {
            market_size: view.text(F::MarketSize),
            market_growth: view.text(F::MarketGrowth),
            target_market: view.text(F::TargetMarket),
        },
        product: ProductInfo {
            product_description: view.text(F::ProductDescription),
            product_stage: view.text(F::ProductStage),
            technology: view.text(F::Technology),
        },
        business_model: BusinessModelInfo {
            revenue_model: view.text(F::RevenueModel),
            pricing: view.text(F::Pricing),
            revenue: view.text(F::Revenue),
        },
        sales: SalesInfo {
            sales_channels: view.text(F::SalesChannels),
            customers: view.text(F::Customers),
            traction: view.text(F::Traction),
        },
        team: TeamInfo {
            founders: view.text(F::Founders),
            team_size: view.number(F::TeamSize),
            education: view.text(F::Education),
            prior_experience: view.text(F::PriorExperience),
        },
        competitive: CompetitiveInfo {
            competitors: view.text(F::Competitors),
            competitive_advantage: view.text(F::CompetitiveAdvantage),
        },
        risk: RiskInfo {
            risks: view.text(F::Risks),
        },
        opportunity: OpportunityInfo {
            opportunities: view.text(F::Opportunities),
        },
        detailed_metrics: DetailedMetrics {
            burn_rate: view.number(F::BurnRate),
            runway: view.number(F::Runway),
            growth_rate: view.number(F::GrowthRate),
            ltv: view.number(F::Ltv),
            cac: view.number(F::Cac),
        },
    };

    Ok((record, score.is_none()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingestion::tokenize;
    use crate::pipeline::processing::mapping::suggest_mapping;

    fn build_csv(csv: &str) -> Result<BuildOutput> {
        let rows = tokenize(csv);
        let mapping = suggest_mapping(rows[0].fields());
        build_records(&rows, &mapping)
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("42"), Some(42.0));
        assert_eq!(parse_numeric(" $1,250,000 "), Some(1_250_000.0));
        assert_eq!(parse_numeric("12.5%"), Some(12.5));
        assert_eq!(parse_numeric("-3"), Some(-3.0));
        assert_eq!(parse_numeric("n/a"), None);
        assert_eq!(parse_numeric("$"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("inf"), None);
    }

    #[test]
    fn test_parse_numeric_reads_leading_number() {
        assert_eq!(parse_numeric("8/10"), Some(8.0));
        assert_eq!(parse_numeric("18 months"), Some(18.0));
        assert_eq!(parse_numeric("~12"), None);
        assert_eq!(parse_numeric(".5x"), Some(0.5));
        assert_eq!(parse_numeric("1.2e3k"), Some(1200.0));
        assert_eq!(parse_numeric("3e"), Some(3.0));
        assert_eq!(parse_numeric("-"), None);
    }

    #[test]
    fn test_fractional_rating_is_not_a_missing_score() {
        let csv = "Name,Sector,Score,Rating,Runway\nAcme,Fintech,,8/10,18 months\n";
        let output = build_csv(csv).unwrap();

        assert_eq!(output.records[0].score, 8.0);
        assert_eq!(output.records[0].detailed_metrics.runway, Some(18.0));
        assert_eq!(output.diagnostics.missing_scores, 0);
    }

    #[test]
    fn test_header_index_last_occurrence_wins() {
        let index = HeaderIndex::from_row(&RawRow::from(vec!["Name", "Score", "Name"]));
        assert_eq!(index.position("Name"), Some(2));
        assert_eq!(index.position("Score"), Some(1));
        assert_eq!(index.position("Sector"), None);
    }

    #[test]
    fn test_insufficient_rows() {
        let err = build_records(&[RawRow::from(vec!["Name"])], &ColumnMapping::new()).unwrap_err();
        assert!(matches!(err, IngestError::InsufficientRows { found: 1 }));

        let err = build_records(&[], &ColumnMapping::new()).unwrap_err();
        assert!(matches!(err, IngestError::InsufficientRows { found: 0 }));
    }

    #[test]
    fn test_builds_identity_and_groups() {
        let csv = "ID,Company Name,Industry,Stage,Country,Score,Rank,Website,Founders,Education,Burn Rate,Market Size\n\
                   c-1,Acme,Fintech,Seed,US,87.5,3,acme.io,\"Jane Doe, John Smith\",Stanford,\"$120,000\",$4B\n";
        let output = build_csv(csv).unwrap();
        let record = &output.records[0];

        assert_eq!(record.id, "c-1");
        assert_eq!(record.name, "Acme");
        assert_eq!(record.sector, "Fintech");
        assert_eq!(record.stage.as_deref(), Some("Seed"));
        assert_eq!(record.country.as_deref(), Some("US"));
        assert_eq!(record.score, 87.5);
        assert_eq!(record.company.rank, Some(3.0));
        assert_eq!(record.company.website.as_deref(), Some("acme.io"));
        assert_eq!(record.team.founders.as_deref(), Some("Jane Doe, John Smith"));
        assert_eq!(record.team.education.as_deref(), Some("Stanford"));
        assert_eq!(record.detailed_metrics.burn_rate, Some(120_000.0));
        assert_eq!(record.market.market_size.as_deref(), Some("$4B"));
        assert_eq!(record.description, None);
        assert_eq!(record.company.linkedin, None);
    }

    #[test]
    fn test_missing_required_fields_skip_row_only() {
        let csv = "Name,Sector,Score\nAcme,Fintech,10\n,Health,20\nBeta,,30\n,,\nGamma,AI,40\n";
        let output = build_csv(csv).unwrap();

        let names: Vec<_> = output.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Gamma"]);
        assert_eq!(output.diagnostics.parsed, 2);
        assert_eq!(output.diagnostics.skipped, 2);
        assert_eq!(
            output.diagnostics.skip_reasons,
            vec![
                SkipReason { row: 3, reason: "missing required field(s): name".to_string() },
                SkipReason { row: 4, reason: "missing required field(s): sector".to_string() },
            ]
        );
    }

    #[test]
    fn test_row_missing_both_required_fields() {
        let csv = "Name,Sector,Stage\n,,Seed\n";
        let output = build_csv(csv).unwrap();
        assert!(output.records.is_empty());
        assert_eq!(
            output.diagnostics.skip_reasons[0].reason,
            "missing required field(s): name, sector"
        );
    }

    #[test]
    fn test_unmapped_required_field_skips_every_row() {
        let csv = "Name,Vertical\nAcme,Fintech\n";
        let output = build_csv(csv).unwrap();
        assert!(output.records.is_empty());
        assert_eq!(output.diagnostics.skipped, 1);
    }

    #[test]
    fn test_score_falls_back_to_rating() {
        let csv = "Name,Sector,Score,Rating\nAcme,Fintech,n/a,7.5\nBeta,AI,,\nGamma,AI,9,1\n";
        let output = build_csv(csv).unwrap();

        assert_eq!(output.records[0].score, 7.5);
        assert_eq!(output.records[1].score, 0.0);
        assert_eq!(output.records[2].score, 9.0);
        assert_eq!(output.diagnostics.missing_scores, 1);
        assert_eq!(output.diagnostics.parsed, 3);
        assert_eq!(output.diagnostics.skipped, 0);
    }

    #[test]
    fn test_synthesized_id_uses_row_number() {
        let csv = "Name,Sector\nAcme,Fintech\nBeta,AI\n";
        let output = build_csv(csv).unwrap();
        assert_eq!(output.records[0].id, "company-2");
        assert_eq!(output.records[1].id, "company-3");
    }

    #[test]
    fn test_short_rows_read_as_absent() {
        let csv = "Name,Sector,Country\nAcme,Fintech\n";
        let output = build_csv(csv).unwrap();
        assert_eq!(output.records[0].country, None);
    }

    #[test]
    fn test_explicit_mapping_with_unknown_header() {
        let rows = tokenize("Company,Vertical\nAcme,Fintech\n");
        let mapping: ColumnMapping = [(F::Name, "Company"), (F::Sector, "Segment")]
            .into_iter()
            .collect();
        let output = build_records(&rows, &mapping).unwrap();
        assert!(output.records.is_empty());
        assert_eq!(output.diagnostics.skip_reasons[0].row, 2);
    }
}
