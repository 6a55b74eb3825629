//! Category classification rules
//!
//! Categories are free text, not a closed enum, so matching is
//! data-driven pattern rules instead of exact lookup. Two independent
//! classifications live here:
//!
//! - repasse eligibility: permissive substring matching against media
//!   and ad-platform tokens, used by the validator to reject
//!   mis-flagged pass-through transactions;
//! - category groups (revenue / variable / investment / fixed), used
//!   only for income-statement drill-down.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tokens that make a category eligible for the repasse flag
///
/// Approximate by design: any category containing one of these
/// (case-insensitive) is accepted. Both accented and plain spellings
/// are listed because category labels are user-typed.
const REPASSE_TOKENS: &[&str] = &[
    "mídia",
    "midia",
    "ads",
    "anúncio",
    "anuncio",
    "tráfego",
    "trafego",
    "google",
    "meta",
    "facebook",
    "instagram",
    "tiktok",
    "linkedin",
    "pinterest",
];

/// Revenue categories (drill-down grouping only)
const REVENUE_CATEGORIES: &[&str] = &[
    "Fee Mensal",
    "Projeto Pontual",
    "Comissão de Mídia",
    "Consultoria",
    "Setup Inicial",
];

/// Variable-cost expense categories: scale with revenue
const VARIABLE_COST_CATEGORIES: &[&str] = &[
    "Impostos sobre Serviços",
    "Comissões de Vendas",
    "Taxas de Pagamento",
    "Taxas Bancárias",
    "Custo de Mídia Operacional",
];

/// Investment expense categories: capacity building, not recurring cost
const INVESTMENT_CATEGORIES: &[&str] = &[
    "Equipamentos",
    "Marketing Institucional",
    "Treinamentos",
    "Ferramentas",
];

/// True if the category may carry the repasse flag
///
/// Substring matching is intentional: "Compra de Mídia/Ads" and
/// "Mídia Google" must both pass without being registered anywhere.
pub fn is_repasse_eligible(category: &str) -> bool {
    let lower = category.to_lowercase();
    REPASSE_TOKENS.iter().any(|token| lower.contains(token))
}

/// Drill-down group of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryGroup {
    Revenue,
    Variable,
    Investment,
    /// Everything not matched by another group (payroll, rent, ...)
    Fixed,
}

impl CategoryGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "receita",
            Self::Variable => "variavel",
            Self::Investment => "investimento",
            Self::Fixed => "fixo",
        }
    }
}

impl std::fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a rule pattern is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Case-insensitive substring match (supports | for OR)
    Contains,
    /// Regular expression match
    Regex,
    /// Exact string match (case-insensitive)
    Exact,
}

/// One category-to-group rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub kind: PatternKind,
    pub group: CategoryGroup,
}

impl CategoryRule {
    pub fn exact(pattern: &str, group: CategoryGroup) -> Self {
        Self {
            pattern: pattern.to_string(),
            kind: PatternKind::Exact,
            group,
        }
    }

    /// Check whether a category label matches this rule
    pub fn matches(&self, category: &str) -> Result<bool> {
        let cat_upper = category.to_uppercase();

        match self.kind {
            PatternKind::Contains => {
                let patterns: Vec<&str> = self.pattern.split('|').collect();
                Ok(patterns.iter().any(|p| cat_upper.contains(&p.to_uppercase())))
            }
            PatternKind::Regex => {
                let re = Regex::new(&self.pattern)?;
                Ok(re.is_match(category) || re.is_match(&cat_upper))
            }
            PatternKind::Exact => Ok(cat_upper == self.pattern.to_uppercase()),
        }
    }
}

/// Ordered rule table mapping category labels to groups
///
/// First matching rule wins; expense categories matched by nothing are
/// fixed cost by elimination.
#[derive(Debug, Clone)]
pub struct CategoryMatcher {
    rules: Vec<CategoryRule>,
}

impl Default for CategoryMatcher {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryMatcher {
    /// Matcher loaded with the built-in agency taxonomy
    pub fn builtin() -> Self {
        let mut rules = Vec::new();
        for cat in REVENUE_CATEGORIES {
            rules.push(CategoryRule::exact(cat, CategoryGroup::Revenue));
        }
        for cat in VARIABLE_COST_CATEGORIES {
            rules.push(CategoryRule::exact(cat, CategoryGroup::Variable));
        }
        for cat in INVESTMENT_CATEGORIES {
            rules.push(CategoryRule::exact(cat, CategoryGroup::Investment));
        }
        Self { rules }
    }

    /// Extend the table with a custom rule (appended, lowest priority)
    pub fn add_rule(&mut self, rule: CategoryRule) {
        self.rules.push(rule);
    }

    /// Classify a category label into its drill-down group
    pub fn classify(&self, category: &str) -> CategoryGroup {
        for rule in &self.rules {
            // A malformed regex rule never matches instead of failing
            // the whole classification.
            if rule.matches(category).unwrap_or(false) {
                return rule.group;
            }
        }
        CategoryGroup::Fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repasse_eligible_media_categories() {
        assert!(is_repasse_eligible("Compra de Mídia/Ads"));
        assert!(is_repasse_eligible("mídia google"));
        assert!(is_repasse_eligible("Tráfego Pago"));
        assert!(is_repasse_eligible("Meta Ads"));
        assert!(is_repasse_eligible("TIKTOK"));
    }

    #[test]
    fn test_repasse_eligible_rejects_non_media() {
        assert!(!is_repasse_eligible("Salários"));
        assert!(!is_repasse_eligible("Aluguel"));
        assert!(!is_repasse_eligible("Fee Mensal"));
        assert!(!is_repasse_eligible(""));
    }

    #[test]
    fn test_classify_builtin_groups() {
        let matcher = CategoryMatcher::builtin();
        assert_eq!(matcher.classify("Fee Mensal"), CategoryGroup::Revenue);
        assert_eq!(
            matcher.classify("Impostos sobre Serviços"),
            CategoryGroup::Variable
        );
        assert_eq!(matcher.classify("Equipamentos"), CategoryGroup::Investment);
        // By elimination
        assert_eq!(matcher.classify("Salários"), CategoryGroup::Fixed);
        assert_eq!(matcher.classify("Aluguel"), CategoryGroup::Fixed);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let matcher = CategoryMatcher::builtin();
        assert_eq!(matcher.classify("fee mensal"), CategoryGroup::Revenue);
        assert_eq!(matcher.classify("FERRAMENTAS"), CategoryGroup::Investment);
    }

    #[test]
    fn test_custom_contains_rule() {
        let mut matcher = CategoryMatcher::builtin();
        matcher.add_rule(CategoryRule {
            pattern: "freela|terceirizado".to_string(),
            kind: PatternKind::Contains,
            group: CategoryGroup::Variable,
        });
        assert_eq!(
            matcher.classify("Freela de Design"),
            CategoryGroup::Variable
        );
        assert_eq!(matcher.classify("Design Interno"), CategoryGroup::Fixed);
    }

    #[test]
    fn test_custom_regex_rule() {
        let mut matcher = CategoryMatcher::builtin();
        matcher.add_rule(CategoryRule {
            pattern: r"^Licença .+$".to_string(),
            kind: PatternKind::Regex,
            group: CategoryGroup::Investment,
        });
        assert_eq!(
            matcher.classify("Licença Adobe"),
            CategoryGroup::Investment
        );
    }

    #[test]
    fn test_malformed_regex_rule_never_matches() {
        let mut matcher = CategoryMatcher::builtin();
        matcher.add_rule(CategoryRule {
            pattern: "([unclosed".to_string(),
            kind: PatternKind::Regex,
            group: CategoryGroup::Variable,
        });
        assert_eq!(matcher.classify("whatever"), CategoryGroup::Fixed);
    }
}
