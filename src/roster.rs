//! Participant and outcome lists as edited in the page's text inputs.

use crate::config::LadderConfig;

/// Split comma-separated input into trimmed entries.
///
/// Blank entries between real ones become `"{prefix}{position}"` (1-based);
/// blanks after the last real entry are dropped so a trailing comma adds nobody.
pub fn normalize_list(raw: &str, prefix: &str) -> Vec<String> {
    let mut entries: Vec<&str> = raw.split(',').map(str::trim).collect();
    while entries.last().is_some_and(|e| e.is_empty()) {
        entries.pop();
    }
    entries
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            if value.is_empty() {
                format!("{}{}", prefix, i + 1)
            } else {
                value.to_string()
            }
        })
        .collect()
}

/// Pad both lists to `max(names, results, 2)` with positional placeholders.
pub fn sync_counts(names: &mut Vec<String>, results: &mut Vec<String>, config: &LadderConfig) {
    let count = names.len().max(results.len()).max(2);
    while names.len() < count {
        names.push(format!("{}{}", config.name_prefix, names.len() + 1));
    }
    while results.len() < count {
        results.push(format!("{}{}", config.result_prefix, results.len() + 1));
    }
}

/// Text written back into an input after regeneration.
pub fn join_list(items: &[String]) -> String {
    items.join(",")
}
