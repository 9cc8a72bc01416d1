//! Substring-based issue detection.
//!
//! Every check is a plain text test against the whole input. There is no
//! parsing or scoping, so string literals and comments can trigger checks.
//! `var-to-const` fires on any `var ` substring, including the tail of an
//! identifier such as `envvar x`; the fixer only rewrites the keyword, so
//! such an issue ends up in `failedFixes`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{DetectedIssue, Severity};

static VAR_DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bvar ").expect("valid var regex"));

static NEXT_ROUTER_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"from\s+['"]next/router['"]"#).expect("valid next/router regex")
});

const HTML_ENTITIES: [&str; 4] = ["&quot;", "&apos;", "&#x27;", "&amp;"];
const CLIENT_HOOKS: [&str; 2] = ["useState", "useEffect"];

struct Check {
    rule_id: &'static str,
    issue_type: &'static str,
    layer: u8,
    severity: Severity,
    description: &'static str,
    detect: fn(&str) -> Option<usize>,
}

static CHECKS: [Check; 8] = [
    Check {
        rule_id: "var-to-const",
        issue_type: "pattern",
        layer: 2,
        severity: Severity::Medium,
        description: "Use const or let instead of var declarations",
        detect: detect_var,
    },
    Check {
        rule_id: "remove-console",
        issue_type: "pattern",
        layer: 2,
        severity: Severity::Low,
        description: "Remove console.log statements before shipping",
        detect: detect_console_log,
    },
    Check {
        rule_id: "html-entities",
        issue_type: "pattern",
        layer: 2,
        severity: Severity::Low,
        description: "Replace HTML entities with literal characters",
        detect: detect_html_entities,
    },
    Check {
        rule_id: "missing-key-prop",
        issue_type: "component",
        layer: 3,
        severity: Severity::High,
        description: "Elements rendered from .map() are missing a key prop",
        detect: detect_missing_key,
    },
    Check {
        rule_id: "add-aria-labels",
        issue_type: "accessibility",
        layer: 3,
        severity: Severity::Medium,
        description: "Buttons are missing aria-label attributes",
        detect: detect_missing_aria_label,
    },
    Check {
        rule_id: "safe-client-apis",
        issue_type: "hydration",
        layer: 4,
        severity: Severity::High,
        description: "localStorage is accessed without an SSR guard",
        detect: detect_unguarded_local_storage,
    },
    Check {
        rule_id: "use-client-directive",
        issue_type: "hydration",
        layer: 4,
        severity: Severity::Medium,
        description: "Client hooks are used without a 'use client' directive",
        detect: detect_missing_client_directive,
    },
    Check {
        rule_id: "router-imports",
        issue_type: "routing",
        layer: 5,
        severity: Severity::Medium,
        description: "Import from next/navigation instead of next/router",
        detect: detect_next_router,
    },
];

/// Rule ids the analyzer can emit, in check order.
pub fn rule_ids() -> impl Iterator<Item = &'static str> {
    CHECKS.iter().map(|check| check.rule_id)
}

/// Run every check whose layer is in `layers` and collect the issues.
pub fn analyze(code: &str, layers: &[u8]) -> Vec<DetectedIssue> {
    let mut issues = Vec::new();
    for check in CHECKS.iter().filter(|check| layers.contains(&check.layer)) {
        let Some(offset) = (check.detect)(code) else {
            continue;
        };
        let (line, column) = line_and_column(code, offset);
        log::debug!("{} matched at {line}:{column}", check.rule_id);
        issues.push(DetectedIssue {
            issue_type: check.issue_type.to_string(),
            severity: check.severity,
            description: check.description.to_string(),
            fixed_by_layer: check.layer,
            line: Some(line),
            column: Some(column),
            rule_id: Some(check.rule_id.to_string()),
        });
    }
    issues
}

/// Sorted distinct layers owning the given issues.
pub fn recommended_layers(issues: &[DetectedIssue]) -> Vec<u8> {
    let mut layers: Vec<u8> = issues.iter().map(|issue| issue.fixed_by_layer).collect();
    layers.sort_unstable();
    layers.dedup();
    layers
}

fn line_and_column(code: &str, offset: usize) -> (usize, usize) {
    let before = &code[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|index| index + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

// Points at a real keyword when there is one.
fn detect_var(code: &str) -> Option<usize> {
    VAR_DECLARATION
        .find(code)
        .map(|found| found.start())
        .or_else(|| code.find("var "))
}

fn detect_console_log(code: &str) -> Option<usize> {
    code.find("console.log")
}

fn detect_html_entities(code: &str) -> Option<usize> {
    HTML_ENTITIES
        .iter()
        .filter_map(|entity| code.find(entity))
        .min()
}

fn detect_missing_key(code: &str) -> Option<usize> {
    if code.contains("key=") {
        return None;
    }
    code.find(".map(")
}

fn detect_missing_aria_label(code: &str) -> Option<usize> {
    if code.contains("aria-label") {
        return None;
    }
    code.find("<button")
}

fn detect_unguarded_local_storage(code: &str) -> Option<usize> {
    if code.contains("typeof window") {
        return None;
    }
    code.find("localStorage")
}

fn detect_missing_client_directive(code: &str) -> Option<usize> {
    if has_client_directive(code) {
        return None;
    }
    CLIENT_HOOKS.iter().filter_map(|hook| code.find(hook)).min()
}

fn detect_next_router(code: &str) -> Option<usize> {
    NEXT_ROUTER_IMPORT.find(code).map(|found| found.start())
}

/// Whether the code carries a `'use client'` or `"use client"` marker.
pub(crate) fn has_client_directive(code: &str) -> bool {
    code.contains("'use client'") || code.contains("\"use client\"")
}
