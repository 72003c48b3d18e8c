use serde::{Deserialize, Serialize};

/// A company record normalized from one CSV data row.
///
/// Only `name` and `sector` are guaranteed non-empty. Every leaf inside the
/// nested groups is independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub id: String,
    pub name: String,
    pub sector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub score: f64,
    #[serde(default)]
    pub company: CompanyInfo,
    #[serde(default)]
    pub market: MarketInfo,
    #[serde(default)]
    pub product: ProductInfo,
    #[serde(default)]
    pub business_model: BusinessModelInfo,
    #[serde(default)]
    pub sales: SalesInfo,
    #[serde(default)]
    pub team: TeamInfo,
    #[serde(default)]
    pub competitive: CompetitiveInfo,
    #[serde(default)]
    pub risk: RiskInfo,
    #[serde(default)]
    pub opportunity: OpportunityInfo,
    #[serde(default)]
    pub detailed_metrics: DetailedMetrics,
}

impl NormalizedRecord {
    /// A record with only the required identity filled in.
    pub fn new(id: impl Into<String>, name: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sector: sector.into(),
            stage: None,
            country: None,
            description: None,
            score: 0.0,
            company: CompanyInfo::default(),
            market: MarketInfo::default(),
            product: ProductInfo::default(),
            business_model: BusinessModelInfo::default(),
            sales: SalesInfo::default(),
            team: TeamInfo::default(),
            competitive: CompetitiveInfo::default(),
            risk: RiskInfo::default(),
            opportunity: OpportunityInfo::default(),
            detailed_metrics: DetailedMetrics::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_raised: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_growth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_market: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessModelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_channels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traction: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founders: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_experience: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_advantage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunities: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runway: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cac: Option<f64>,
}
