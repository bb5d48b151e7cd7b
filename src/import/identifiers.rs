//! Identifier helpers shared by the extractors

use once_cell::sync::Lazy;
use regex::Regex;

static RE_VIEW_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\d+$").expect("Invalid regex"));

/// Remove the positional suffix from a view name (`pivotTableView!2` -> `pivotTableView`).
pub fn normalize_view_name(name: &str) -> String {
    RE_VIEW_SUFFIX.replace(name, "").into_owned()
}

/// Strip surrounding double quotes (`"Sales"` -> `Sales`).
pub fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}

/// Table and column of the first quoted identifier pair in a formula.
///
/// Splits on `"`: part 1 is the table, part 3 the column. Formulas that quote
/// something else first (string literals, functions over several columns)
/// yield whatever sits in those positions.
pub fn first_quoted_identifier(formula: &str) -> (String, String) {
    if !formula.contains('"') {
        return (String::new(), String::new());
    }
    let parts: Vec<&str> = formula.split('"').collect();
    let table = parts.get(1).copied().unwrap_or_default().to_string();
    let column = parts.get(3).copied().unwrap_or_default().to_string();
    (table, column)
}
