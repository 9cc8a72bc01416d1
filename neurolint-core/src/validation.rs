//! Field validation for submitted code.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static SOURCE_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(ts|tsx|js|jsx)$").expect("valid filename regex"));

/// Rule codes with this prefix report warnings instead of errors.
pub const WARNING_PREFIX: &str = "WARN_";

/// A check applied to one field value.
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Value must be non-empty.
    Required,
    /// Value must have at least this many characters.
    MinLength(usize),
    /// Value must have at most this many characters.
    MaxLength(usize),
    /// Value must match the pattern.
    Pattern(Regex),
    /// Value must look like an email address.
    Email,
}

/// A rule with the message and code it reports on failure.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    /// The check to run.
    pub kind: RuleKind,
    /// Message reported when the check fails.
    pub message: String,
    /// Stable rule code.
    pub code: String,
}

impl ValidationRule {
    /// Value must be non-empty.
    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, message, "REQUIRED")
    }

    /// Value must have at least `min` characters.
    pub fn min_length(min: usize, message: Option<&str>) -> Self {
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Must be at least {min} characters long"));
        Self::new(RuleKind::MinLength(min), message, "MIN_LENGTH")
    }

    /// Value must have at most `max` characters.
    pub fn max_length(max: usize, message: Option<&str>) -> Self {
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Must be no more than {max} characters long"));
        Self::new(RuleKind::MaxLength(max), message, "MAX_LENGTH")
    }

    /// Value must match `pattern`.
    pub fn pattern(pattern: Regex, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Pattern(pattern), message, "PATTERN_MISMATCH")
    }

    /// Value must look like an email address.
    pub fn email() -> Self {
        Self::new(
            RuleKind::Email,
            "Please enter a valid email address",
            "INVALID_EMAIL",
        )
    }

    /// Report failures of this rule as warnings.
    pub fn as_warning(mut self) -> Self {
        if !self.code.starts_with(WARNING_PREFIX) {
            self.code = format!("{WARNING_PREFIX}{}", self.code);
        }
        self
    }

    fn new(kind: RuleKind, message: impl Into<String>, code: &str) -> Self {
        Self {
            kind,
            message: message.into(),
            code: code.to_string(),
        }
    }

    /// Whether `value` passes. Empty values pass everything but `Required`.
    pub fn test(&self, value: &str) -> bool {
        if value.is_empty() {
            return !matches!(self.kind, RuleKind::Required);
        }
        match &self.kind {
            RuleKind::Required => true,
            RuleKind::MinLength(min) => value.chars().count() >= *min,
            RuleKind::MaxLength(max) => value.chars().count() <= *max,
            RuleKind::Pattern(pattern) => pattern.is_match(value),
            RuleKind::Email => EMAIL.is_match(value),
        }
    }

    fn is_warning(&self) -> bool {
        self.code.starts_with(WARNING_PREFIX)
    }
}

/// Outcome of validating one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Messages from failed error rules.
    pub errors: Vec<String>,
    /// Messages from failed warning rules.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// True when no error rule failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Ordered rules per field name.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: BTreeMap<String, Vec<ValidationRule>>,
}

impl Validator {
    /// Create an empty validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule for a field.
    pub fn add_rule(&mut self, field: &str, rule: ValidationRule) -> &mut Self {
        self.rules.entry(field.to_string()).or_default().push(rule);
        self
    }

    /// Run every rule registered for `field`. Unknown fields pass.
    pub fn validate(&self, field: &str, value: &str) -> ValidationResult {
        let mut result = ValidationResult::default();
        for rule in self.rules.get(field).into_iter().flatten() {
            if rule.test(value) {
                continue;
            }
            if rule.is_warning() {
                result.warnings.push(rule.message.clone());
            } else {
                result.errors.push(rule.message.clone());
            }
        }
        result
    }

    /// Validate every field in `data`.
    pub fn validate_form<'a>(
        &self,
        data: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> BTreeMap<String, ValidationResult> {
        data.into_iter()
            .map(|(field, value)| (field.to_string(), self.validate(field, value)))
            .collect()
    }

    /// Error messages across all fields of a form, in field order.
    pub fn form_errors<'a>(&self, data: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<String> {
        self.validate_form(data)
            .into_values()
            .flat_map(|result| result.errors)
            .collect()
    }
}

/// Schema applied to code submitted for analysis or fixing.
pub fn code_analysis_schema() -> Validator {
    let mut validator = Validator::new();
    validator
        .add_rule("code", ValidationRule::required("Code is required"))
        .add_rule(
            "code",
            ValidationRule::min_length(10, Some("Code must be at least 10 characters")),
        )
        .add_rule("filename", ValidationRule::required("Filename is required"))
        .add_rule(
            "filename",
            ValidationRule::pattern(
                SOURCE_FILENAME.clone(),
                "File must be a TypeScript or JavaScript file",
            ),
        );
    validator
}
