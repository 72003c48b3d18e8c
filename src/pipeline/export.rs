// CSV export: normalized records back to text with a fixed column schema

use tracing::debug;

use crate::domain::NormalizedRecord;
use crate::observability::metrics;

/// Returned instead of CSV when there is nothing to export
pub const NO_DATA: &str = "No data to export";

/// Export header row. Independent of whatever mapping the records were
/// ingested with.
pub const EXPORT_COLUMNS: [&str; 36] = [
    "ID",
    "Name",
    "Sector",
    "Stage",
    "Country",
    "Description",
    "Score",
    "Rank",
    "Website",
    "LinkedIn",
    "Founded Year",
    "Headquarters",
    "Employee Count",
    "Funding Raised",
    "Market Size",
    "Market Growth",
    "Target Market",
    "Product Description",
    "Product Stage",
    "Technology",
    "Revenue Model",
    "Pricing",
    "Revenue",
    "Sales Channels",
    "Customers",
    "Traction",
    "Founders",
    "Team Size",
    "Education",
    "Prior Experience",
    "Competitors",
    "Competitive Advantage",
    "Risks",
    "Opportunities",
    "Burn Rate",
    "Runway",
];

/// Quote a value when it contains a comma, double quote or line break.
/// Absent values become the empty string.
pub fn escape_field(value: Option<&str>) -> String {
    let value = value.unwrap_or_default();
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn number(value: Option<f64>) -> Option<String> {
    value.map(|n| n.to_string())
}

fn export_row(r: &NormalizedRecord) -> [Option<String>; 36] {
    [
        Some(r.id.clone()),
        Some(r.name.clone()),
        Some(r.sector.clone()),
        r.stage.clone(),
        r.country.clone(),
        r.description.clone(),
        Some(r.score.to_string()),
        number(r.company.rank),
        r.company.website.clone(),
        r.company.linkedin.clone(),
        number(r.company.founded_year),
        r.company.headquarters.clone(),
        number(r.company.employee_count),
        number(r.company.funding_raised),
        r.market.market_size.clone(),
        r.market.market_growth.clone(),
        r.market.target_market.clone(),
        r.product.product_description.clone(),
        r.product.product_stage.clone(),
        r.product.technology.clone(),
        r.business_model.revenue_model.clone(),
        r.business_model.pricing.clone(),
        r.business_model.revenue.clone(),
        r.sales.sales_channels.clone(),
        r.sales.customers.clone(),
        r.sales.traction.clone(),
        r.team.founders.clone(),
        number(r.team.team_size),
        r.team.education.clone(),
        r.team.prior_experience.clone(),
        r.competitive.competitors.clone(),
        r.competitive.competitive_advantage.clone(),
        r.risk.risks.clone(),
        r.opportunity.opportunities.clone(),
        number(r.detailed_metrics.burn_rate),
        number(r.detailed_metrics.runway),
    ]
}

/// Serialize records to CSV text, or [`NO_DATA`] for an empty slice.
pub fn serialize(records: &[NormalizedRecord]) -> String {
    if records.is_empty() {
        return NO_DATA.to_string();
    }

    let header = EXPORT_COLUMNS
        .iter()
        .map(|column| escape_field(Some(*column)))
        .collect::<Vec<_>>()
        .join(",");

    let lines = records.iter().map(|record| {
        export_row(record)
            .iter()
            .map(|value| escape_field(value.as_deref()))
            .collect::<Vec<_>>()
            .join(",")
    });

    let out = std::iter::once(header).chain(lines).collect::<Vec<_>>().join("\n");

    debug!("serialize: records={} bytes={}", records.len(), out.len());
    metrics::export::records_written(records.len());
    out
}
