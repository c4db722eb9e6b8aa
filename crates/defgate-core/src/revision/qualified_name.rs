//! Qualified-name rules for revision keys.
//!
//! `[prefix/]name`, where the optional prefix is a DNS-1123 subdomain of at
//! most 253 characters and the name part is 1-63 lowercase alphanumerics,
//! `-`, `_` or `.`, starting and ending with an alphanumeric.

use std::sync::LazyLock;

use regex::Regex;

const NAME_MAX_LENGTH: usize = 63;
const SUBDOMAIN_MAX_LENGTH: usize = 253;

static NAME_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9_.]*[a-z0-9])?$").expect("name pattern compiles")
});

static SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("subdomain pattern compiles")
});

/// Validate `value` as a qualified name.
///
/// Returns human-readable violations; an empty list means the name is
/// valid.
pub fn is_qualified_name(value: &str) -> Vec<String> {
    let parts: Vec<&str> = value.split('/').collect();
    let name = match parts.as_slice() {
        [name] => *name,
        [prefix, name] => {
            let mut errs = Vec::new();
            if prefix.is_empty() {
                errs.push("prefix part must be non-empty".to_string());
            } else {
                errs.extend(
                    subdomain_violations(prefix)
                        .into_iter()
                        .map(|e| format!("prefix part {e}")),
                );
            }
            errs.extend(name_violations(name));
            return errs;
        }
        _ => {
            return vec![
                "a qualified name must consist of an optional DNS subdomain prefix and '/' \
                 followed by a name part"
                    .to_string(),
            ]
        }
    };
    name_violations(name)
}

fn name_violations(name: &str) -> Vec<String> {
    if name.is_empty() {
        return vec!["name part must be non-empty".to_string()];
    }

    let mut errs = Vec::new();
    if name.chars().count() > NAME_MAX_LENGTH {
        errs.push(format!(
            "name part must be no more than {NAME_MAX_LENGTH} characters"
        ));
    }
    if !NAME_PART.is_match(name) {
        let invalid = offending_chars(name, |c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')
        });
        if !invalid.is_empty() {
            errs.push(format!(
                "name part must consist of lower case alphanumeric characters, '-', '_' or '.', \
                 found invalid characters {invalid}"
            ));
        }
        if !starts_and_ends_alphanumeric(name) {
            errs.push(
                "name part must start and end with an alphanumeric character"
                    .to_string(),
            );
        }
    }
    errs
}

fn subdomain_violations(subdomain: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if subdomain.len() > SUBDOMAIN_MAX_LENGTH {
        errs.push(format!(
            "must be no more than {SUBDOMAIN_MAX_LENGTH} characters"
        ));
    }
    if !SUBDOMAIN.is_match(subdomain) {
        let invalid = offending_chars(subdomain, |c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.')
        });
        if invalid.is_empty() {
            errs.push(
                "must be a lowercase RFC 1123 subdomain: each '.'-separated label must start \
                 and end with an alphanumeric character"
                    .to_string(),
            );
        } else {
            errs.push(format!(
                "must consist of lower case alphanumeric characters, '-' or '.', \
                 found invalid characters {invalid}"
            ));
        }
    }
    errs
}

/// Distinct disallowed characters in order of first appearance, quoted.
fn offending_chars(value: &str, allowed: impl Fn(char) -> bool) -> String {
    let mut seen = Vec::new();
    for c in value.chars().filter(|c| !allowed(*c)) {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen.iter()
        .map(|c| format!("{c:?}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// Case is reported separately by the character check.
fn starts_and_ends_alphanumeric(name: &str) -> bool {
    let alnum = |c: char| c.is_ascii_alphanumeric();
    name.chars().next().is_some_and(alnum) && name.chars().next_back().is_some_and(alnum)
}
