//! Placeholder-template text matching.
//!
//! Screens localize strings like `"{0} items selected"`. A template with
//! numeric placeholders (`{0}`, `{1}`, …) converts to a safe regex: every
//! regex metacharacter in the literal parts is escaped, each placeholder
//! becomes a wildcard. The capture variant recovers the values that filled
//! the placeholders.

use regex::Regex;

fn placeholder_pattern() -> Regex {
    Regex::new(r"\{\d\}").expect("placeholder pattern is valid")
}

/// Convert a placeholder template into a regex source string: literals are
/// escaped, placeholders become `.*`.
#[must_use]
pub fn template_to_regex(template: &str) -> String {
    join_escaped_parts(template, ".*")
}

fn join_escaped_parts(template: &str, separator: &str) -> String {
    let pattern = placeholder_pattern();
    let mut result = String::new();
    let mut last_end = 0;

    for found in pattern.find_iter(template) {
        result.push_str(&regex::escape(&template[last_end..found.start()]));
        result.push_str(separator);
        last_end = found.end();
    }
    result.push_str(&regex::escape(&template[last_end..]));

    result
}

/// Whether `value` matches the placeholder template
#[must_use]
pub fn matches_template(value: &str, template: &str) -> bool {
    let pattern = format!("^{}$", template_to_regex(template));
    Regex::new(&pattern).is_ok_and(|regex| regex.is_match(value))
}

/// Extract the values that filled the template's placeholders; empty when
/// the value does not match.
#[must_use]
pub fn extract_template_values(value: &str, template: &str) -> Vec<String> {
    let pattern = format!("^{}$", join_escaped_parts(template, "(.*)"));
    let Ok(regex) = Regex::new(&pattern) else {
        return Vec::new();
    };

    let Some(captures) = regex.captures(value) else {
        return Vec::new();
    };

    captures
        .iter()
        .skip(1)
        .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
        .collect()
}
