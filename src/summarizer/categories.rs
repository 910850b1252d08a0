//! Thematic categories for the structured summary
//!
//! The taxonomy is an ordered list of rules; a sentence gets the category
//! of the first rule whose predicate matches, or [`Category::Other`].
//! Categories only group sentences for presentation.

use serde::{Deserialize, Serialize};

use crate::nlp::keywords::KeywordText;

/// Presentation bucket for a selected sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    KeyGoals,
    ServiceDelivery,
    FinancingPrivateSector,
    GovernancePolicy,
    MonitoringData,
    Other,
}

impl Category {
    /// All categories in presentation order
    pub const ALL: [Category; 6] = [
        Category::KeyGoals,
        Category::ServiceDelivery,
        Category::FinancingPrivateSector,
        Category::GovernancePolicy,
        Category::MonitoringData,
        Category::Other,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::KeyGoals => "key goals",
            Category::ServiceDelivery => "service delivery",
            Category::FinancingPrivateSector => "financing & private sector",
            Category::GovernancePolicy => "governance & policy",
            Category::MonitoringData => "monitoring & data",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Condition under which a rule assigns its category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The sentence is a goal sentence
    GoalSentence,
    /// The sentence matches any of the keywords
    AnyKeyword(&'static [&'static str]),
}

impl Predicate {
    fn matches(&self, text: &KeywordText, is_goal: bool) -> bool {
        match self {
            Predicate::GoalSentence => is_goal,
            Predicate::AnyKeyword(keywords) => text.contains_any(keywords),
        }
    }
}

/// One entry of the ordered taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    pub predicate: Predicate,
}

const SERVICE_DELIVERY: &[&str] = &[
    "service",
    "clinic",
    "hospital",
    "facilit",
    "health worker",
    "workforce",
    "nurse",
    "midwi",
    "doctor",
    "primary care",
    "access",
    "treatment",
    "immuni",
    "vaccin",
    "medicine",
    "referral",
    "supply chain",
    "outreach",
];

const FINANCING_PRIVATE_SECTOR: &[&str] = &[
    "financ",
    "fund",
    "budget",
    "invest",
    "cost",
    "insurance",
    "private sector",
    "partnership",
    "revenue",
    "tax",
    "expenditure",
    "spending",
    "donor",
    "fiscal",
    "ppp",
];

const GOVERNANCE_POLICY: &[&str] = &[
    "governance",
    "policy",
    "policies",
    "regulat",
    "law",
    "legislat",
    "leadership",
    "accountab",
    "coordinat",
    "decentrali",
    "ministry",
    "government",
    "reform",
    "strateg",
    "framework",
];

const MONITORING_DATA: &[&str] = &[
    "monitor",
    "evaluat",
    "data",
    "surveillance",
    "indicator",
    "report",
    "information system",
    "research",
    "evidence",
    "measur",
    "track",
    "dashboard",
];

/// Built-in taxonomy in priority order
pub const DEFAULT_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::KeyGoals,
        predicate: Predicate::GoalSentence,
    },
    CategoryRule {
        category: Category::ServiceDelivery,
        predicate: Predicate::AnyKeyword(SERVICE_DELIVERY),
    },
    CategoryRule {
        category: Category::FinancingPrivateSector,
        predicate: Predicate::AnyKeyword(FINANCING_PRIVATE_SECTOR),
    },
    CategoryRule {
        category: Category::GovernancePolicy,
        predicate: Predicate::AnyKeyword(GOVERNANCE_POLICY),
    },
    CategoryRule {
        category: Category::MonitoringData,
        predicate: Predicate::AnyKeyword(MONITORING_DATA),
    },
];

/// Assigns categories by evaluating rules in order
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Categorizer {
    /// Categorizer over [`DEFAULT_RULES`]
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }

    /// Categorizer over a custom ordered rule list
    pub fn with_rules(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// The rules in priority order
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Category of the first matching rule, else [`Category::Other`]
    pub fn categorize(&self, text: &str, is_goal: bool) -> Category {
        let text = KeywordText::new(text);
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(&text, is_goal))
            .map_or(Category::Other, |rule| rule.category)
    }
}
