//! Regex-based rewrites keyed by rule id.
//!
//! Rewrites run in issue order over the progressively transformed text.
//! Overlapping rewrites are not reconciled.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::analyzer::has_client_directive;
use crate::domain::{AppliedFix, DetectedIssue, FailedFix};

static VAR_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bvar\s+").expect("valid var regex"));

// Drops the whole line only when the call is all that is on it.
static CONSOLE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*console\.log\([^()]*(?:\([^()]*\)[^()]*)*\);?[ \t]*(?:\r?\n|$)")
        .expect("valid console line regex")
});

static CONSOLE_INLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"console\.log\([^()]*(?:\([^()]*\)[^()]*)*\);?")
        .expect("valid inline console regex")
});

static MAP_CALLBACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\.map\(\s*\(?\s*([A-Za-z_$][\w$]*)(?:\s*,\s*[A-Za-z_$][\w$]*)?\s*\)?\s*=>\s*\(?\s*<([A-Za-z][\w.]*)",
    )
    .expect("valid map callback regex")
});

static LOCAL_STORAGE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((?:window\.)?localStorage)\.(getItem|setItem|removeItem)\(([^()]*)\)")
        .expect("valid localStorage regex")
});

static NEXT_ROUTER_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(from\s+)(['"])next/router(['"])"#).expect("valid next/router regex")
});

const CLIENT_DIRECTIVE: &str = "'use client';\n\n";

/// Result of running the rewrites over a piece of code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Code after every applied rewrite.
    pub code: String,
    /// Rewrites that changed the code.
    pub applied: Vec<AppliedFix>,
    /// Issues that produced no change.
    pub failed: Vec<FailedFix>,
}

/// Whether a rule id has an automatic rewrite.
pub fn has_rewrite(rule_id: &str) -> bool {
    rewrite_for(rule_id).is_some()
}

/// Apply the rewrite selected by each issue's rule id, in order.
///
/// A rule id is applied at most once; later issues with the same id are
/// skipped.
pub fn apply_fixes(code: &str, issues: &[DetectedIssue]) -> FixOutcome {
    let mut current = code.to_string();
    let mut applied = Vec::new();
    let mut failed = Vec::new();
    let mut seen = BTreeSet::new();

    for issue in issues {
        let Some(rule_id) = issue.rule_id.as_deref() else {
            failed.push(failed_fix(issue, "issue has no rule id"));
            continue;
        };
        if !seen.insert(rule_id.to_string()) {
            log::debug!("skipping repeated rule {rule_id}");
            continue;
        }
        let Some(rewrite) = rewrite_for(rule_id) else {
            failed.push(failed_fix(
                issue,
                &format!("no automatic fix for rule {rule_id}"),
            ));
            continue;
        };

        let next = rewrite(&current);
        if next == current {
            failed.push(failed_fix(issue, "no matching code to rewrite"));
            continue;
        }
        current = next;
        applied.push(AppliedFix {
            fix_type: issue.issue_type.clone(),
            description: issue.description.clone(),
            layer: issue.fixed_by_layer,
            rule_id: rule_id.to_string(),
        });
    }

    FixOutcome {
        code: current,
        applied,
        failed,
    }
}

fn failed_fix(issue: &DetectedIssue, error: &str) -> FailedFix {
    FailedFix {
        fix_type: issue.issue_type.clone(),
        description: issue.description.clone(),
        error: error.to_string(),
    }
}

fn rewrite_for(rule_id: &str) -> Option<fn(&str) -> String> {
    let rewrite: fn(&str) -> String = match rule_id {
        "var-to-const" => var_to_const,
        "remove-console" => remove_console,
        "html-entities" => decode_html_entities,
        "missing-key-prop" => add_key_props,
        "safe-client-apis" => guard_local_storage,
        "use-client-directive" => add_client_directive,
        "router-imports" => update_router_imports,
        _ => return None,
    };
    Some(rewrite)
}

fn var_to_const(code: &str) -> String {
    VAR_KEYWORD.replace_all(code, "const ").into_owned()
}

fn remove_console(code: &str) -> String {
    let without_lines = CONSOLE_LINE.replace_all(code, "");
    CONSOLE_INLINE.replace_all(&without_lines, "").into_owned()
}

fn decode_html_entities(code: &str) -> String {
    code.replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

fn add_key_props(code: &str) -> String {
    MAP_CALLBACK
        .replace_all(code, |caps: &Captures| {
            let (Some(whole), Some(param)) = (caps.get(0), caps.get(1)) else {
                return String::new();
            };
            let rest = &code[whole.end()..];
            let tag_end = rest.find('>').unwrap_or(rest.len());
            if rest[..tag_end].contains("key=") {
                return whole.as_str().to_string();
            }
            format!("{} key={{{}.id}}", whole.as_str(), param.as_str())
        })
        .into_owned()
}

fn guard_local_storage(code: &str) -> String {
    LOCAL_STORAGE_CALL
        .replace_all(
            code,
            "(typeof window !== 'undefined' ? ${1}.${2}(${3}) : null)",
        )
        .into_owned()
}

fn add_client_directive(code: &str) -> String {
    if has_client_directive(code) {
        return code.to_string();
    }
    format!("{CLIENT_DIRECTIVE}{code}")
}

fn update_router_imports(code: &str) -> String {
    NEXT_ROUTER_SOURCE
        .replace_all(code, "${1}${2}next/navigation${3}")
        .into_owned()
}
