//! Worksheet data-quality gates
//!
//! Applied once, after all joins, in this order:
//! 1. erroneous table names (blank, aggregate differences, IFERROR)
//! 2. denied tables
//! 3. denied table unions
//! 4. variable-syntax column names rewritten to the variable name

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticEvent, Diagnostics, QualityGate};
use crate::models::WorksheetRow;

/// Tables whose columns are never migrated
pub const DEFAULT_DENIED_TABLES: [&str; 5] = [
    "volume",
    "key reporting fields",
    "actual ship date additional information",
    "invoice date additional information",
    "scheduled pick date additional information",
];

/// Exact table combinations whose rows are never migrated
pub const DEFAULT_DENIED_UNIONS: [&str; 1] = ["scheduled pick date|transaction details|as of date"];

const AGGREGATE_BY: &str = r"saw_1\s*,\s*saw_2\s*,\s*saw_3\s*,\s*saw_0\s*,\s*saw_10\s*,\s*saw_11\s*,\s*saw_12";

static RE_AGGREGATE_DIFFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*SUM\s*\(saw_\d+\s+by\s+{by}\)\s*-\s*SUM\s*\(saw_\d+\s+by\s+{by}\)\s*$",
        by = AGGREGATE_BY
    ))
    .expect("Invalid regex")
});

static RE_MONTH_NAME_VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^\s*@\{\s*biServer\.variables\[(?:'Rvar_Curr_MonthName'|"Rvar_Curr_MonthName")\]\s*\}\s*$"#,
    )
    .expect("Invalid regex")
});

/// Denylists for the worksheet gates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityGates {
    /// Table names, compared case-insensitively
    pub denied_tables: Vec<String>,
    /// `|`-joined table name lists, compared case-insensitively
    pub denied_unions: Vec<String>,
}

impl Default for QualityGates {
    fn default() -> Self {
        Self {
            denied_tables: DEFAULT_DENIED_TABLES.iter().map(|s| s.to_string()).collect(),
            denied_unions: DEFAULT_DENIED_UNIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl QualityGates {
    /// Which gate, if any, rejects a row.
    pub fn rejection(&self, row: &WorksheetRow) -> Option<QualityGate> {
        let joined = row.table_names.trim();
        if joined.is_empty()
            || RE_AGGREGATE_DIFFERENCE.is_match(joined)
            || joined.to_uppercase().contains("IFERROR")
        {
            return Some(QualityGate::ErroneousTableNames);
        }

        let denied: HashSet<String> = self.denied_tables.iter().map(|t| t.to_lowercase()).collect();
        if joined
            .split('|')
            .any(|table| denied.contains(&table.trim().to_lowercase()))
        {
            return Some(QualityGate::DeniedTable);
        }

        let joined = joined.to_lowercase();
        if self.denied_unions.iter().any(|u| u.to_lowercase() == joined) {
            return Some(QualityGate::DeniedTableUnion);
        }
        None
    }

    /// Run all gates over `rows`, recording what was dropped or rewritten.
    pub fn apply(&self, rows: Vec<WorksheetRow>, diagnostics: &mut Diagnostics) -> Vec<WorksheetRow> {
        let gates = [
            QualityGate::ErroneousTableNames,
            QualityGate::DeniedTable,
            QualityGate::DeniedTableUnion,
        ];
        let mut rejected = [0usize; 3];
        let mut kept = Vec::with_capacity(rows.len());

        for row in rows {
            match self.rejection(&row) {
                Some(gate) => {
                    if let Some(slot) = gates.iter().position(|g| *g == gate) {
                        rejected[slot] += 1;
                    }
                }
                None => kept.push(row),
            }
        }

        for (gate, count) in gates.into_iter().zip(rejected) {
            diagnostics.record(DiagnosticEvent::RowsRejected { gate, count });
        }

        let mut normalized = 0;
        for row in &mut kept {
            if RE_MONTH_NAME_VARIABLE.is_match(&row.column_names) {
                row.column_names = "Rvar_Curr_MonthName".to_string();
                normalized += 1;
            }
        }
        diagnostics.record(DiagnosticEvent::ColumnNamesNormalized { count: normalized });

        kept
    }
}
