//! False-positive suppression.
//!
//! Rules are plain substrings, deliberately coarse: one rule suppresses a
//! whole prefix/suffix/infix family of symbols. Rule sets are specific to a
//! (universe, check) pair and live with the validator that owns them.

/// Whether `symbol` matches any suppression rule.
pub fn is_false_positive(symbol: &str, rules: &[&str]) -> bool {
    rules.iter().any(|rule| symbol.contains(rule))
}

/// Drops every symbol matching a rule, preserving the order of the rest.
pub fn strip_false_positives(symbols: Vec<String>, rules: &[&str]) -> Vec<String> {
    if rules.is_empty() {
        return symbols;
    }
    symbols
        .into_iter()
        .filter(|s| !is_false_positive(s, rules))
        .collect()
}
