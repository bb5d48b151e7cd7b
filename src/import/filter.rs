//! Filter expression flattening
//!
//! A filter is a tree of `sawx:expr` nodes. Logical nodes (`and` / `or`) are
//! walked recursively; every other node is a leaf that becomes one
//! [`FilterCondition`] tagged with the operator of its nearest logical parent.
//!
//! Table and column names come from a separate pass over the quoted
//! identifiers in the leaf's SQL expressions, so they do not depend on how the
//! leaf was rendered.

use crate::models::FilterCondition;
use crate::xml::{self, Element, NS_SAWX};

use super::identifiers::first_quoted_identifier;

const COMPARISON_OPERATORS: [&str; 6] = [
    "equal",
    "notEqual",
    "greaterOrEqual",
    "lessOrEqual",
    "greater",
    "less",
];

const NULL_OPERATORS: [&str; 4] = ["null", "notNull", "isNull", "isNotNull"];

/// Classified filter node
#[derive(Debug)]
pub enum FilterNode<'a> {
    Logical {
        operator: String,
        children: Vec<&'a Element>,
    },
    In {
        operands: Vec<&'a Element>,
    },
    Between {
        operands: Vec<&'a Element>,
    },
    NullCheck {
        operator: String,
        operands: Vec<&'a Element>,
    },
    Comparison {
        operator: String,
        operands: Vec<&'a Element>,
    },
    Prompted {
        operand: Option<&'a Element>,
    },
    Unknown {
        operator: String,
        element: &'a Element,
    },
}

impl<'a> FilterNode<'a> {
    /// Classify an expression node by its `op` and `xsi:type`.
    pub fn classify(element: &'a Element) -> Self {
        let operator = element.attr("op");
        let expr_type = element.local_type();
        let operands = operands(element);

        if expr_type == "logical" && (operator == "and" || operator == "or") {
            return FilterNode::Logical {
                operator,
                children: operands,
            };
        }
        match operator.as_str() {
            "in" => FilterNode::In { operands },
            "between" => FilterNode::Between { operands },
            "prompted" => FilterNode::Prompted {
                operand: operands.first().copied(),
            },
            op if NULL_OPERATORS.contains(&op) => FilterNode::NullCheck { operator, operands },
            op if expr_type == "comparison" || COMPARISON_OPERATORS.contains(&op) => {
                FilterNode::Comparison { operator, operands }
            }
            _ => FilterNode::Unknown { operator, element },
        }
    }
}

/// Rendered leaf: condition text and literal value(s)
#[derive(Debug, Default, PartialEq, Eq)]
struct Rendered {
    expression: String,
    filter_value: String,
}

/// Flattens filter expression trees into condition rows
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterFlattener;

impl FilterFlattener {
    pub fn new() -> Self {
        Self
    }

    /// Flatten a filter tree rooted at `root`.
    pub fn flatten(&self, root: &Element) -> Vec<FilterCondition> {
        let mut conditions = Vec::new();
        self.walk(root, "", &mut conditions);
        conditions
    }

    fn walk(&self, element: &Element, parent_operator: &str, out: &mut Vec<FilterCondition>) {
        let node = FilterNode::classify(element);
        if let FilterNode::Logical { operator, children } = &node {
            for child in children {
                self.walk(child, operator, out);
            }
            return;
        }

        let Some(rendered) = render(&node) else {
            return;
        };
        if rendered.expression.is_empty() {
            return;
        }

        let operator = element.attr("op");
        let (table_name, column_name) = quoted_names(element);
        let expression = repair_expression(
            rendered.expression,
            &operator,
            &table_name,
            &column_name,
            &rendered.filter_value,
        );

        out.push(FilterCondition {
            operator,
            parent_operator: parent_operator.to_string(),
            column_expression: expression,
            column_name,
            table_name,
            filter_value: rendered.filter_value,
        });
    }
}

fn operands(element: &Element) -> Vec<&Element> {
    element
        .child_elements()
        .filter(|child| child.is(NS_SAWX, "expr"))
        .collect()
}

fn render(node: &FilterNode<'_>) -> Option<Rendered> {
    match node {
        FilterNode::Logical { .. } => None,
        FilterNode::In { operands } => {
            let (column, values) = operands.split_first()?;
            let values: Vec<String> = values.iter().map(|v| v.text()).collect();
            Some(Rendered {
                expression: format!("{} IN ({})", column.text(), values.join(", ")),
                filter_value: values
                    .iter()
                    .filter(|v| !v.is_empty())
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" | "),
            })
        }
        FilterNode::Between { operands } => match operands.as_slice() {
            [column, lower, upper, ..] => Some(Rendered {
                expression: format!("{} BETWEEN {} AND {}", column.text(), lower.text(), upper.text()),
                filter_value: format!("{} | {}", lower.text(), upper.text()),
            }),
            [column, ..] => Some(Rendered {
                expression: column.text(),
                filter_value: String::new(),
            }),
            [] => None,
        },
        FilterNode::NullCheck { operator, operands } => {
            let column = operands.first()?;
            let keyword = match operator.as_str() {
                "notNull" | "isNotNull" => "IS NOT NULL",
                _ => "IS NULL",
            };
            Some(Rendered {
                expression: format!("{} {}", column_text(column), keyword),
                filter_value: String::new(),
            })
        }
        FilterNode::Comparison { operator, operands } => match operands.as_slice() {
            [left, right, ..] => Some(Rendered {
                expression: format!(
                    "{} {} {}",
                    column_text(left),
                    comparison_symbol(operator),
                    right.text()
                ),
                filter_value: right.text(),
            }),
            [only] => Some(Rendered {
                expression: only.text(),
                filter_value: String::new(),
            }),
            [] => None,
        },
        FilterNode::Prompted { operand } => {
            let column = prompted_column((*operand)?);
            if column.is_empty() {
                return None;
            }
            Some(Rendered {
                expression: format!("{} IS PROMPTED", column),
                filter_value: String::new(),
            })
        }
        FilterNode::Unknown { operator, element } => {
            let literal = element
                .find_all(r#".//sawx:expr[@xsi:type="xsd:string"]"#)
                .into_iter()
                .map(Element::text)
                .find(|value| !value.is_empty())?;
            let column = operands(element).first().map(|c| c.text()).unwrap_or_default();
            let expression = [column.as_str(), operator.as_str(), literal.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            Some(Rendered {
                expression,
                filter_value: literal,
            })
        }
    }
}

fn comparison_symbol(operator: &str) -> &str {
    match operator {
        "equal" => "=",
        "notEqual" => "!=",
        "greaterOrEqual" => ">=",
        "lessOrEqual" => "<=",
        "greater" => ">",
        "less" => "<",
        other => other,
    }
}

/// Display formula of a column expression, otherwise the operand text.
fn column_text(operand: &Element) -> String {
    if operand.local_type() == "columnExpression"
        && let Some(formula) = operand.find("saw:columnFormula/sawx:expr")
    {
        return formula.text();
    }
    operand.text()
}

fn prompted_column(operand: &Element) -> String {
    match operand.local_type().as_str() {
        "sqlExpression" => operand.text(),
        "columnExpression" => match operand.find("saw:columnFormula/sawx:expr") {
            Some(formula) => formula.text(),
            None => operand.leading_text(),
        },
        _ => {
            let own = operand.leading_text();
            if !own.is_empty() {
                return own;
            }
            xml::text(operand.find(r#".//sawx:expr[@xsi:type="sawx:sqlExpression"]"#))
        }
    }
}

/// Table and column from the first SQL expressions carrying quoted identifiers.
fn quoted_names(element: &Element) -> (String, String) {
    let mut table = String::new();
    let mut column = String::new();
    for sql in element.find_all(r#".//sawx:expr[@xsi:type="sawx:sqlExpression"]"#) {
        let text = sql.text();
        if !text.contains('"') {
            continue;
        }
        let (found_table, found_column) = first_quoted_identifier(&text);
        if table.is_empty() {
            table = found_table;
        }
        if column.is_empty() {
            column = found_column;
        }
        if !table.is_empty() && !column.is_empty() {
            break;
        }
    }
    (table, column)
}

/// Rebuild `IS PROMPTED` / `IN` conditions whose rendering lost the column.
fn repair_expression(
    expression: String,
    operator: &str,
    table: &str,
    column: &str,
    filter_value: &str,
) -> String {
    if table.is_empty() || column.is_empty() {
        return expression;
    }
    if expression.contains("IS PROMPTED") && !expression.starts_with('"') {
        return format!(r#""{}"."{}" IS PROMPTED"#, table, column);
    }
    if operator == "in" && !expression.to_uppercase().contains("IN") {
        return format!(
            r#""{}"."{}" IN ({})"#,
            table,
            column,
            filter_value.replace(" | ", ", ")
        );
    }
    expression
}
