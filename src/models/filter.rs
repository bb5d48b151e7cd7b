//! Flattened filter conditions

use serde::{Deserialize, Serialize};

/// One leaf condition of a filter expression tree
///
/// `parent_operator` is the operator of the nearest enclosing logical node
/// (`and` / `or`), empty for a condition at the root. Sibling grouping is not
/// preserved, so the original tree cannot be rebuilt from these rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub operator: String,
    pub parent_operator: String,
    /// Rendered condition, e.g. `"Sales"."Region" IN ('East', 'West')`
    pub column_expression: String,
    pub column_name: String,
    pub table_name: String,
    /// Literal value(s); several values are joined with `" | "`
    pub filter_value: String,
}
