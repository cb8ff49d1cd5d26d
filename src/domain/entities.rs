//! Domain entities: request-scoped allocation values

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::DomainError;

static BUDGET_WITH_LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9\-]+:[1-9][0-9]*$").expect("budget spec pattern is valid")
});

/// A budget name paired with the limit to allocate from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetSpec {
    /// Budget name: alphanumerics and hyphens
    pub name: String,
    /// Positive decimal limit without leading zeros
    pub limit: String,
}

impl BudgetSpec {
    /// Parse a `<budget>:<limit>` token.
    ///
    /// The whole token must match; partial matches produce no result.
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        if !BUDGET_WITH_LIMIT_RE.is_match(token) {
            return Err(DomainError::MalformedSpec {
                token: token.to_string(),
            });
        }
        // the pattern admits exactly one colon
        let (name, limit) = token
            .split_once(':')
            .ok_or_else(|| DomainError::MalformedSpec {
                token: token.to_string(),
            })?;
        Ok(Self {
            name: name.to_string(),
            limit: limit.to_string(),
        })
    }
}

impl fmt::Display for BudgetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.limit)
    }
}

/// Request to allocate a budget to a set of services, replacing their prior allocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    pub budget: String,
    pub limit: String,
    pub model: String,
    /// Services in command-line order, duplicates preserved
    pub services: Vec<String>,
}

impl AllocationRequest {
    pub fn new(
        spec: BudgetSpec,
        model: impl Into<String>,
        services: Vec<String>,
    ) -> Result<Self, DomainError> {
        if services.is_empty() {
            return Err(DomainError::NoServices);
        }
        Ok(Self {
            budget: spec.name,
            limit: spec.limit,
            model: model.into(),
            services,
        })
    }
}

/// Request to change the limit of one service's existing allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationUpdate {
    pub model: String,
    pub service: String,
    /// Base-10 value that fits in an `i32`; zero and negatives are accepted
    pub value: String,
}

/// Check that `value` is a base-10 integer representable in 32 bits.
///
/// Sign is allowed and not restricted, unlike [`BudgetSpec`] limits.
pub fn is_whole_number(value: &str) -> bool {
    value.parse::<i32>().is_ok()
}

/// Which model a command targets: `[<controller>:]<model>` plus an optional account.
///
/// Unset parts are filled in by the model store from its "current" markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSelector {
    pub controller: Option<String>,
    pub account: Option<String>,
    pub model: Option<String>,
}

impl ModelSelector {
    /// Parse `[<controller>:]<model>`.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidModelSelector(value.to_string());
        let (controller, model) = match value.split_once(':') {
            Some((controller, model)) => (Some(controller), model),
            None => (None, value),
        };
        if model.is_empty() || model.contains(':') || controller.is_some_and(str::is_empty) {
            return Err(invalid());
        }
        Ok(Self {
            controller: controller.map(str::to_string),
            account: None,
            model: Some(model.to_string()),
        })
    }

    pub fn with_account(mut self, account: Option<String>) -> Self {
        if self.account.is_none() {
            self.account = account;
        }
        self
    }
}

impl fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model.as_deref().unwrap_or("<current>");
        match &self.controller {
            Some(controller) => write!(f, "{}:{}", controller, model),
            None => write!(f, "{}", model),
        }
    }
}
