//! Filter flattening tests

use bi_catalog_extract::import::FilterFlattener;
use bi_catalog_extract::models::FilterCondition;
use bi_catalog_extract::xml::Document;

fn flatten(expr: &str) -> Vec<FilterCondition> {
    let xml = format!(
        r#"<saw:filter xmlns:saw="com.siebel.analytics.web/report/v1.1" xmlns:sawx="com.siebel.analytics.web/expression/v1.1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">{}</saw:filter>"#,
        expr
    );
    let document = Document::parse(&xml).unwrap();
    let root = document.root.find("sawx:expr").unwrap();
    FilterFlattener::new().flatten(root)
}

fn sql(text: &str) -> String {
    format!(r#"<sawx:expr xsi:type="sawx:sqlExpression">{}</sawx:expr>"#, text)
}

fn literal(text: &str) -> String {
    format!(r#"<sawx:expr xsi:type="xsd:string">{}</sawx:expr>"#, text)
}

fn comparison(op: &str, column: &str, value: &str) -> String {
    format!(
        r#"<sawx:expr xsi:type="sawx:comparison" op="{}">{}{}</sawx:expr>"#,
        op,
        sql(column),
        literal(value)
    )
}

mod logical_tests {
    use super::*;

    #[test]
    fn test_parent_operator_is_nearest_logical_node() {
        let expr = format!(
            r#"<sawx:expr xsi:type="sawx:logical" op="and">{}<sawx:expr xsi:type="sawx:logical" op="or">{}{}</sawx:expr></sawx:expr>"#,
            comparison("equal", r#""T"."A""#, "1"),
            comparison("greater", r#""T"."B""#, "2"),
            comparison("less", r#""T"."C""#, "3"),
        );
        let conditions = flatten(&expr);
        let parents: Vec<&str> = conditions.iter().map(|c| c.parent_operator.as_str()).collect();
        assert_eq!(parents, vec!["and", "or", "or"]);

        let expressions: Vec<&str> = conditions
            .iter()
            .map(|c| c.column_expression.as_str())
            .collect();
        assert_eq!(
            expressions,
            vec![r#""T"."A" = 1"#, r#""T"."B" > 2"#, r#""T"."C" < 3"#]
        );
        assert_eq!(conditions[2].column_name, "C");
    }

    #[test]
    fn test_root_condition_has_no_parent() {
        let conditions = flatten(&comparison("notEqual", r#""T"."A""#, "x"));
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].parent_operator, "");
        assert_eq!(conditions[0].column_expression, r#""T"."A" != x"#);
    }
}

mod leaf_tests {
    use super::*;

    #[test]
    fn test_in_without_values() {
        let expr = format!(r#"<sawx:expr xsi:type="sawx:list" op="in">{}</sawx:expr>"#, sql(r#""T"."C""#));
        let conditions = flatten(&expr);
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].column_expression, r#""T"."C" IN ()"#);
        assert_eq!(conditions[0].filter_value, "");
    }

    #[test]
    fn test_between() {
        let expr = format!(
            r#"<sawx:expr xsi:type="sawx:special" op="between">{}{}{}</sawx:expr>"#,
            sql(r#""T"."D""#),
            literal("1"),
            literal("5")
        );
        let conditions = flatten(&expr);
        assert_eq!(conditions[0].column_expression, r#""T"."D" BETWEEN 1 AND 5"#);
        assert_eq!(conditions[0].filter_value, "1 | 5");
    }

    #[test]
    fn test_between_with_missing_bound_renders_column_only() {
        let expr = format!(
            r#"<sawx:expr xsi:type="sawx:special" op="between">{}{}</sawx:expr>"#,
            sql(r#""T"."D""#),
            literal("1")
        );
        let conditions = flatten(&expr);
        assert_eq!(conditions[0].column_expression, r#""T"."D""#);
        assert_eq!(conditions[0].filter_value, "");
    }

    #[test]
    fn test_null_checks() {
        let expr = format!(
            r#"<sawx:expr xsi:type="sawx:logical" op="or"><sawx:expr xsi:type="sawx:comparison" op="null">{}</sawx:expr><sawx:expr xsi:type="sawx:comparison" op="notNull">{}</sawx:expr></sawx:expr>"#,
            sql(r#""T"."E""#),
            sql(r#""T"."F""#)
        );
        let conditions = flatten(&expr);
        assert_eq!(conditions[0].column_expression, r#""T"."E" IS NULL"#);
        assert_eq!(conditions[1].column_expression, r#""T"."F" IS NOT NULL"#);
    }

    #[test]
    fn test_prompted() {
        let expr = format!(
            r#"<sawx:expr xsi:type="sawx:special" op="prompted">{}</sawx:expr>"#,
            sql(r#""Time"."Year""#)
        );
        let conditions = flatten(&expr);
        assert_eq!(conditions[0].column_expression, r#""Time"."Year" IS PROMPTED"#);
        assert_eq!(conditions[0].table_name, "Time");
        assert_eq!(conditions[0].column_name, "Year");
    }

    #[test]
    fn test_prompted_column_expression_uses_formula() {
        let expr = r#"<sawx:expr xsi:type="sawx:special" op="prompted"><sawx:expr xsi:type="sawx:columnExpression"><saw:columnFormula><sawx:expr xsi:type="sawx:sqlExpression">"Time"."Month"</sawx:expr></saw:columnFormula></sawx:expr></sawx:expr>"#;
        let conditions = flatten(expr);
        assert_eq!(conditions[0].column_expression, r#""Time"."Month" IS PROMPTED"#);
    }

    #[test]
    fn test_unknown_operator_with_literal() {
        let expr = format!(
            r#"<sawx:expr xsi:type="sawx:special" op="containsAny">{}{}</sawx:expr>"#,
            sql(r#""T"."Name""#),
            literal("abc")
        );
        let conditions = flatten(&expr);
        assert_eq!(conditions[0].operator, "containsAny");
        assert_eq!(conditions[0].column_expression, r#""T"."Name" containsAny abc"#);
        assert_eq!(conditions[0].filter_value, "abc");
    }

    #[test]
    fn test_unknown_operator_without_literal_is_dropped() {
        let expr = format!(
            r#"<sawx:expr xsi:type="sawx:logical" op="and"><sawx:expr xsi:type="sawx:special" op="top">{}</sawx:expr>{}</sawx:expr>"#,
            sql(r#""T"."Name""#),
            comparison("equal", r#""T"."A""#, "1")
        );
        let conditions = flatten(&expr);
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].operator, "equal");
    }
}
