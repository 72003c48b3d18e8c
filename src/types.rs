use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One tokenized CSV line: trimmed fields in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow(Vec<String>);

impl RawRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for RawRow {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}

impl From<Vec<&str>> for RawRow {
    fn from(fields: Vec<&str>) -> Self {
        Self(fields.into_iter().map(str::to_string).collect())
    }
}

/// Schema names downstream consumers depend on, independent of whatever the
/// source CSV calls its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    // Identity
    Id,
    Name,
    Sector,
    Stage,
    Country,
    Description,
    Score,
    Rating,

    // Company
    Rank,
    Website,
    Linkedin,
    FoundedYear,
    Headquarters,
    EmployeeCount,
    FundingRaised,

    // Market
    MarketSize,
    MarketGrowth,
    TargetMarket,

    // Product
    ProductDescription,
    ProductStage,
    Technology,

    // Business model
    RevenueModel,
    Pricing,
    Revenue,

    // Sales
    SalesChannels,
    Customers,
    Traction,

    // Team
    Founders,
    TeamSize,
    Education,
    PriorExperience,

    // Competitive
    Competitors,
    CompetitiveAdvantage,

    // Risk / opportunity
    Risks,
    Opportunities,

    // Detailed metrics
    BurnRate,
    Runway,
    GrowthRate,
    Ltv,
    Cac,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 40] = [
        CanonicalField::Id,
        CanonicalField::Name,
        CanonicalField::Sector,
        CanonicalField::Stage,
        CanonicalField::Country,
        CanonicalField::Description,
        CanonicalField::Score,
        CanonicalField::Rating,
        CanonicalField::Rank,
        CanonicalField::Website,
        CanonicalField::Linkedin,
        CanonicalField::FoundedYear,
        CanonicalField::Headquarters,
        CanonicalField::EmployeeCount,
        CanonicalField::FundingRaised,
        CanonicalField::MarketSize,
        CanonicalField::MarketGrowth,
        CanonicalField::TargetMarket,
        CanonicalField::ProductDescription,
        CanonicalField::ProductStage,
        CanonicalField::Technology,
        CanonicalField::RevenueModel,
        CanonicalField::Pricing,
        CanonicalField::Revenue,
        CanonicalField::SalesChannels,
        CanonicalField::Customers,
        CanonicalField::Traction,
        CanonicalField::Founders,
        CanonicalField::TeamSize,
        CanonicalField::Education,
        CanonicalField::PriorExperience,
        CanonicalField::Competitors,
        CanonicalField::CompetitiveAdvantage,
        CanonicalField::Risks,
        CanonicalField::Opportunities,
        CanonicalField::BurnRate,
        CanonicalField::Runway,
        CanonicalField::GrowthRate,
        CanonicalField::Ltv,
        CanonicalField::Cac,
    ];

    /// The camelCase name used as the mapping key.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Id => "id",
            CanonicalField::Name => "name",
            CanonicalField::Sector => "sector",
            CanonicalField::Stage => "stage",
            CanonicalField::Country => "country",
            CanonicalField::Description => "description",
            CanonicalField::Score => "score",
            CanonicalField::Rating => "rating",
            CanonicalField::Rank => "rank",
            CanonicalField::Website => "website",
            CanonicalField::Linkedin => "linkedin",
            CanonicalField::FoundedYear => "foundedYear",
            CanonicalField::Headquarters => "headquarters",
            CanonicalField::EmployeeCount => "employeeCount",
            CanonicalField::FundingRaised => "fundingRaised",
            CanonicalField::MarketSize => "marketSize",
            CanonicalField::MarketGrowth => "marketGrowth",
            CanonicalField::TargetMarket => "targetMarket",
            CanonicalField::ProductDescription => "productDescription",
            CanonicalField::ProductStage => "productStage",
            CanonicalField::Technology => "technology",
            CanonicalField::RevenueModel => "revenueModel",
            CanonicalField::Pricing => "pricing",
            CanonicalField::Revenue => "revenue",
            CanonicalField::SalesChannels => "salesChannels",
            CanonicalField::Customers => "customers",
            CanonicalField::Traction => "traction",
            CanonicalField::Founders => "founders",
            CanonicalField::TeamSize => "teamSize",
            CanonicalField::Education => "education",
            CanonicalField::PriorExperience => "priorExperience",
            CanonicalField::Competitors => "competitors",
            CanonicalField::CompetitiveAdvantage => "competitiveAdvantage",
            CanonicalField::Risks => "risks",
            CanonicalField::Opportunities => "opportunities",
            CanonicalField::BurnRate => "burnRate",
            CanonicalField::Runway => "runway",
            CanonicalField::GrowthRate => "growthRate",
            CanonicalField::Ltv => "ltv",
            CanonicalField::Cac => "cac",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical field -> source header. Partial: unmapped fields are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<CanonicalField, String>);

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `field` to `header`, replacing any previous header.
    pub fn insert(&mut self, field: CanonicalField, header: impl Into<String>) {
        self.0.insert(field, header.into());
    }

    /// Maps `field` to `header` only if the field has no header yet.
    /// Returns whether the mapping changed.
    pub fn insert_if_absent(&mut self, field: CanonicalField, header: impl Into<String>) -> bool {
        use std::collections::btree_map::Entry;
        match self.0.entry(field) {
            Entry::Vacant(slot) => {
                slot.insert(header.into());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.0.iter().map(|(field, header)| (*field, header.as_str()))
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<H: Into<String>> FromIterator<(CanonicalField, H)> for ColumnMapping {
    fn from_iter<T: IntoIterator<Item = (CanonicalField, H)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(field, header)| (field, header.into())).collect())
    }
}
