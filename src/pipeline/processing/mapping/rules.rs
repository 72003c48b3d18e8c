use crate::types::CanonicalField;

/// A single test against a lower-cased, trimmed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    Exact(&'static str),
    Contains(&'static str),
    /// Every substring must be present
    AllOf(&'static [&'static str]),
}

impl HeaderMatch {
    pub fn matches(&self, header: &str) -> bool {
        match self {
            HeaderMatch::Exact(s) => header == *s,
            HeaderMatch::Contains(s) => header.contains(s),
            HeaderMatch::AllOf(parts) => parts.iter().all(|p| header.contains(p)),
        }
    }
}

/// Maps a header to `field` when any of its alternatives match.
#[derive(Debug, Clone, Copy)]
pub struct MappingRule {
    pub field: CanonicalField,
    pub any_of: &'static [HeaderMatch],
}

impl MappingRule {
    pub fn matches(&self, header: &str) -> bool {
        self.any_of.iter().any(|m| m.matches(header))
    }
}

use CanonicalField as F;
use HeaderMatch::{AllOf, Contains, Exact};

/// Header heuristics, evaluated top to bottom; the first matching rule wins.
///
/// Order is significant. Narrow rules sit above the broad ones they overlap
/// with (`product stage` above `stage`, `revenue model` above `revenue`,
/// `target customer` above `customer`), and `founder` sits above everything
/// that a founders column could otherwise trip.
pub static MAPPING_RULES: &[MappingRule] = &[
    MappingRule {
        field: F::Id,
        any_of: &[Exact("id"), Exact("company id"), Exact("startup id")],
    },
    MappingRule {
        field: F::Name,
        any_of: &[
            Exact("name"),
            Exact("company"),
            Exact("startup"),
            Contains("company name"),
            Contains("startup name"),
        ],
    },
    MappingRule {
        field: F::Founders,
        any_of: &[Contains("founder")],
    },
    MappingRule {
        field: F::Sector,
        any_of: &[Contains("sector"), Contains("industry")],
    },
    MappingRule {
        field: F::ProductStage,
        any_of: &[Contains("product stage")],
    },
    MappingRule {
        field: F::Stage,
        any_of: &[Contains("stage"), Contains("funding round"), Exact("round")],
    },
    MappingRule {
        field: F::Headquarters,
        any_of: &[Contains("headquarter"), Exact("hq")],
    },
    MappingRule {
        field: F::Country,
        any_of: &[Contains("country"), Exact("location")],
    },
    MappingRule {
        field: F::ProductDescription,
        any_of: &[AllOf(&["product", "description"])],
    },
    MappingRule {
        field: F::Description,
        any_of: &[Contains("description"), Contains("summary"), Exact("about")],
    },
    MappingRule {
        field: F::Rating,
        any_of: &[Contains("rating")],
    },
    MappingRule {
        field: F::Score,
        any_of: &[Contains("score")],
    },
    MappingRule {
        field: F::Rank,
        any_of: &[Contains("rank")],
    },
    MappingRule {
        field: F::Website,
        any_of: &[Contains("website"), Contains("homepage"), Exact("url")],
    },
    MappingRule {
        field: F::Linkedin,
        any_of: &[Contains("linkedin")],
    },
    MappingRule {
        field: F::FoundedYear,
        any_of: &[Contains("founded"), Contains("year")],
    },
    MappingRule {
        field: F::EmployeeCount,
        any_of: &[Contains("employee"), Contains("headcount")],
    },
    MappingRule {
        field: F::TeamSize,
        any_of: &[Contains("team size")],
    },
    MappingRule {
        field: F::FundingRaised,
        any_of: &[Contains("funding"), Contains("raised")],
    },
    MappingRule {
        field: F::MarketSize,
        any_of: &[Contains("market size"), Exact("tam")],
    },
    MappingRule {
        field: F::MarketGrowth,
        any_of: &[Contains("market growth"), Contains("cagr")],
    },
    MappingRule {
        field: F::TargetMarket,
        any_of: &[Contains("target market"), Contains("target customer")],
    },
    MappingRule {
        field: F::Technology,
        any_of: &[Contains("technology"), Contains("tech stack")],
    },
    MappingRule {
        field: F::RevenueModel,
        any_of: &[Contains("revenue model"), Contains("business model")],
    },
    MappingRule {
        field: F::Pricing,
        any_of: &[Contains("pricing")],
    },
    MappingRule {
        field: F::Revenue,
        any_of: &[Contains("revenue"), Exact("arr"), Exact("mrr")],
    },
    MappingRule {
        field: F::SalesChannels,
        any_of: &[Contains("channel")],
    },
    MappingRule {
        field: F::Customers,
        any_of: &[Contains("customer")],
    },
    MappingRule {
        field: F::Traction,
        any_of: &[Contains("traction")],
    },
    MappingRule {
        field: F::Education,
        any_of: &[Contains("education")],
    },
    MappingRule {
        field: F::PriorExperience,
        any_of: &[Contains("experience"), Contains("background")],
    },
    MappingRule {
        field: F::Competitors,
        any_of: &[Contains("competitor")],
    },
    MappingRule {
        field: F::CompetitiveAdvantage,
        any_of: &[Contains("advantage"), Contains("moat"), Contains("differentiat")],
    },
    MappingRule {
        field: F::Risks,
        any_of: &[Contains("risk")],
    },
    MappingRule {
        field: F::Opportunities,
        any_of: &[Contains("opportunit")],
    },
    MappingRule {
        field: F::BurnRate,
        any_of: &[Contains("burn")],
    },
    MappingRule {
        field: F::Runway,
        any_of: &[Contains("runway")],
    },
    MappingRule {
        field: F::GrowthRate,
        any_of: &[Contains("growth rate"), Exact("growth")],
    },
    MappingRule {
        field: F::Ltv,
        any_of: &[Contains("lifetime value"), Exact("ltv")],
    },
    MappingRule {
        field: F::Cac,
        any_of: &[Contains("acquisition cost"), Exact("cac")],
    },
];

/// First rule in table order matching `header`, if any.
pub fn match_header(header: &str) -> Option<CanonicalField> {
    let header = header.trim().to_lowercase();
    MAPPING_RULES
        .iter()
        .find(|rule| rule.matches(&header))
        .map(|rule| rule.field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_contains() {
        assert_eq!(match_header("ID"), Some(F::Id));
        assert_eq!(match_header("Company Name"), Some(F::Name));
        assert_eq!(match_header("  Country "), Some(F::Country));
        assert_eq!(match_header("Location"), Some(F::Country));
        assert_eq!(match_header("HQ Location"), None);
        assert_eq!(match_header("Valuation"), None);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Both "industry" and "sub-industry" appear; the sector rule is first.
        assert_eq!(match_header("Sub-Industry"), Some(F::Sector));
        assert_eq!(match_header("Product Stage"), Some(F::ProductStage));
        assert_eq!(match_header("Funding Stage"), Some(F::Stage));
        assert_eq!(match_header("Revenue Model"), Some(F::RevenueModel));
        assert_eq!(match_header("Annual Revenue"), Some(F::Revenue));
        assert_eq!(match_header("Target Customers"), Some(F::TargetMarket));
        assert_eq!(match_header("Key Customers"), Some(F::Customers));
        assert_eq!(match_header("Market Growth Rate"), Some(F::MarketGrowth));
        assert_eq!(match_header("Growth Rate"), Some(F::GrowthRate));
        assert_eq!(match_header("Product Description"), Some(F::ProductDescription));
        assert_eq!(match_header("Short Description"), Some(F::Description));
    }

    #[test]
    fn test_broad_founder_rule_over_matches() {
        assert_eq!(match_header("Founders"), Some(F::Founders));
        assert_eq!(match_header("Co-Founder Background"), Some(F::Founders));
        assert_eq!(match_header("Background"), Some(F::PriorExperience));
        assert_eq!(match_header("Founded Year"), Some(F::FoundedYear));
    }

    #[test]
    fn test_rating_is_matched_before_score() {
        assert_eq!(match_header("Score Rating"), Some(F::Rating));
        assert_eq!(match_header("Overall Score"), Some(F::Score));
    }

    #[test]
    fn test_every_rule_targets_a_distinct_field() {
        let mut seen = std::collections::HashSet::new();
        for rule in MAPPING_RULES {
            assert!(seen.insert(rule.field), "duplicate rule for {}", rule.field);
        }
    }
}
