use anyhow::Context as _;
use std::path::Path;
use thiserror::Error;

/// Problems found while validating a rule table before a run
#[derive(Debug, Error, PartialEq)]
pub enum RuleTableError {
    #[error("Duplicate rule id: {0}")]
    DuplicateId(String),

    #[error("Combination rule {0} needs at least two conditions")]
    TooFewConditions(String),

    #[error("Rule {0} has a condition without a category, minimum value or predicate")]
    EmptyCondition(String),

    #[error("Achievement {0} has no tiers")]
    EmptyTiers(String),

    #[error("Achievement {0} tiers must be strictly ascending")]
    UnorderedTiers(String),
}

/// Add context to load errors
pub fn load_context(path: &Path) -> String {
    format!("Failed to load {}", path.display())
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Add context to cache errors
pub fn cache_context(operation: &str, key: &str) -> String {
    format!("Failed to {} cache for key: {}", operation, key)
}

/// Wrap result with load context
pub fn with_load_context<T, E>(result: Result<T, E>, path: &Path) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(load_context(path))
}

/// Wrap result with parse context
pub fn with_parse_context<T, E>(result: Result<T, E>, data_type: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(parse_context(data_type))
}
