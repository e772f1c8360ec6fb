//! Declarative filters and their compilation into archive `where` clauses
//!
//! A [`FilterExpr`] is a tree of field predicates combined with `AND` / `OR`
//! groups and nested relation filters. [`compile`] checks every predicate
//! against the entity vocabulary and renders the clause body that goes
//! between the braces of `where: { ... }`.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::FilterError;

/// Archive entity types that accept filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Extrinsic,
    Block,
    Event,
    Call,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Extrinsic => "extrinsic",
            Entity::Block => "block",
            Entity::Event => "event",
            Entity::Call => "call",
        };
        f.write_str(name)
    }
}

/// Predicate operator, rendered as the `_suffix` of the field name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    Eq,
    Contains,
    JsonContains,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    pub fn suffix(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Contains => "contains",
            Operator::JsonContains => "jsonContains",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Literal value of a predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Json(serde_json::Value),
}

impl FilterValue {
    fn kind(&self) -> ValueKind {
        match self {
            FilterValue::Text(_) => ValueKind::Text,
            FilterValue::Int(_) => ValueKind::Int,
            FilterValue::Bool(_) => ValueKind::Bool,
            FilterValue::Json(_) => ValueKind::Json,
        }
    }

    /// Render as a literal token of the archive query language
    fn literal(&self) -> String {
        match self {
            FilterValue::Text(text) => quote(text),
            FilterValue::Int(n) => n.to_string(),
            FilterValue::Bool(b) => b.to_string(),
            // jsonContains takes the JSON document as a string argument
            FilterValue::Json(value) => quote(&value.to_string()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<serde_json::Value> for FilterValue {
    fn from(value: serde_json::Value) -> Self {
        FilterValue::Json(value)
    }
}

/// Single `field_operator: value` condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub field: String,
    pub operator: Operator,
    pub value: FilterValue,
}

/// Recursive filter tree
///
/// An empty `And`/`Or` group is the match-all filter and is left out of the
/// compiled clause, as is a relation whose inner filter is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FilterExpr {
    Leaf(Predicate),
    Relation {
        relation: String,
        filter: Box<FilterExpr>,
    },
    And(Vec<FilterExpr>),
    Or(Vec<FilterExpr>),
}

impl FilterExpr {
    pub fn predicate(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Self {
        FilterExpr::Leaf(Predicate {
            field: field.into(),
            operator,
            value: value.into(),
        })
    }

    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::predicate(field, Operator::Eq, value)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::predicate(field, Operator::Contains, value.into())
    }

    pub fn json_contains(field: impl Into<String>, document: serde_json::Value) -> Self {
        Self::predicate(field, Operator::JsonContains, document)
    }

    pub fn relation(relation: impl Into<String>, filter: FilterExpr) -> Self {
        FilterExpr::Relation {
            relation: relation.into(),
            filter: Box::new(filter),
        }
    }

    pub fn and(children: impl IntoIterator<Item = FilterExpr>) -> Self {
        FilterExpr::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = FilterExpr>) -> Self {
        FilterExpr::Or(children.into_iter().collect())
    }

    /// The match-all filter
    pub fn all() -> Self {
        FilterExpr::And(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Text,
    Int,
    Bool,
    Json,
}

impl ValueKind {
    fn describe(self) -> &'static str {
        match self {
            ValueKind::Text => "string",
            ValueKind::Int => "integer",
            ValueKind::Bool => "boolean",
            ValueKind::Json => "JSON",
        }
    }
}

struct FieldSpec {
    name: &'static str,
    kind: ValueKind,
    operators: &'static [Operator],
}

struct RelationSpec {
    name: &'static str,
    target: Entity,
}

const EQ: &[Operator] = &[Operator::Eq];
const TEXT: &[Operator] = &[Operator::Eq, Operator::Contains];
const NUMERIC: &[Operator] = &[
    Operator::Eq,
    Operator::Gt,
    Operator::Gte,
    Operator::Lt,
    Operator::Lte,
];
const JSON: &[Operator] = &[Operator::JsonContains];

const fn field(name: &'static str, kind: ValueKind, operators: &'static [Operator]) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        operators,
    }
}

const EXTRINSIC_FIELDS: &[FieldSpec] = &[
    field("id", ValueKind::Text, EQ),
    field("hash", ValueKind::Text, EQ),
    field("signature", ValueKind::Json, JSON),
    field("success", ValueKind::Bool, EQ),
];

const BLOCK_FIELDS: &[FieldSpec] = &[
    field("id", ValueKind::Text, EQ),
    field("hash", ValueKind::Text, EQ),
    field("height", ValueKind::Int, NUMERIC),
];

const EVENT_FIELDS: &[FieldSpec] = &[
    field("id", ValueKind::Text, EQ),
    field("name", ValueKind::Text, TEXT),
];

const CALL_FIELDS: &[FieldSpec] = &[
    field("id", ValueKind::Text, EQ),
    field("name", ValueKind::Text, TEXT),
    field("success", ValueKind::Bool, EQ),
];

const EXTRINSIC_RELATIONS: &[RelationSpec] = &[
    RelationSpec {
        name: "call",
        target: Entity::Call,
    },
    RelationSpec {
        name: "block",
        target: Entity::Block,
    },
];

const EVENT_RELATIONS: &[RelationSpec] = &[
    RelationSpec {
        name: "extrinsic",
        target: Entity::Extrinsic,
    },
    RelationSpec {
        name: "call",
        target: Entity::Call,
    },
];

const CALL_RELATIONS: &[RelationSpec] = &[RelationSpec {
    name: "extrinsic",
    target: Entity::Extrinsic,
}];

impl Entity {
    fn fields(self) -> &'static [FieldSpec] {
        match self {
            Entity::Extrinsic => EXTRINSIC_FIELDS,
            Entity::Block => BLOCK_FIELDS,
            Entity::Event => EVENT_FIELDS,
            Entity::Call => CALL_FIELDS,
        }
    }

    fn relations(self) -> &'static [RelationSpec] {
        match self {
            Entity::Extrinsic => EXTRINSIC_RELATIONS,
            Entity::Block => &[],
            Entity::Event => EVENT_RELATIONS,
            Entity::Call => CALL_RELATIONS,
        }
    }
}

/// Compile a filter for `entity` into a clause body
///
/// `None` and match-all filters compile to an empty string; callers must then
/// leave the `where` argument out entirely.
pub fn compile(entity: Entity, filter: Option<&FilterExpr>) -> Result<String, FilterError> {
    let clause = match filter {
        Some(filter) => compile_expr(entity, filter)?.unwrap_or_default(),
        None => String::new(),
    };
    debug!(%entity, clause = %clause, "compiled filter");
    Ok(clause)
}

fn compile_expr(entity: Entity, expr: &FilterExpr) -> Result<Option<String>, FilterError> {
    match expr {
        FilterExpr::Leaf(predicate) => compile_predicate(entity, predicate).map(Some),
        FilterExpr::Relation { relation, filter } => {
            let target = entity
                .relations()
                .iter()
                .find(|spec| spec.name == relation)
                .map(|spec| spec.target)
                .ok_or_else(|| FilterError::UnknownRelation {
                    entity,
                    relation: relation.clone(),
                })?;
            Ok(compile_expr(target, filter)?.map(|inner| format!("{relation}: {{{inner}}}")))
        }
        FilterExpr::And(children) => compile_group(entity, "AND", children),
        FilterExpr::Or(children) => compile_group(entity, "OR", children),
    }
}

fn compile_group(
    entity: Entity,
    keyword: &str,
    children: &[FilterExpr],
) -> Result<Option<String>, FilterError> {
    let mut parts = Vec::with_capacity(children.len());
    for child in children {
        if let Some(part) = compile_expr(entity, child)? {
            parts.push(part);
        }
    }

    match parts.len() {
        0 => Ok(None),
        1 => Ok(parts.pop()),
        _ => {
            let joined = parts
                .iter()
                .map(|part| format!("{{{part}}}"))
                .collect::<Vec<_>>()
                .join(", ");
            Ok(Some(format!("{keyword}: [{joined}]")))
        }
    }
}

fn compile_predicate(entity: Entity, predicate: &Predicate) -> Result<String, FilterError> {
    let spec = entity
        .fields()
        .iter()
        .find(|spec| spec.name == predicate.field && spec.operators.contains(&predicate.operator))
        .ok_or_else(|| FilterError::UnsupportedPredicate {
            entity,
            field: predicate.field.clone(),
            operator: predicate.operator,
        })?;

    if spec.kind != predicate.value.kind() {
        return Err(FilterError::MismatchedValue {
            entity,
            field: predicate.field.clone(),
            operator: predicate.operator,
            expected: spec.kind.describe(),
        });
    }

    Ok(format!(
        "{}_{}: {}",
        predicate.field,
        predicate.operator,
        predicate.value.literal()
    ))
}

/// Quote a string as a query-language string literal
///
/// JSON string escaping is a subset of the GraphQL string grammar, so quotes,
/// backslashes and control characters all come out valid.
pub fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_undefined_filter_compiles_to_empty() {
        assert_eq!(compile(Entity::Extrinsic, None).unwrap(), "");
        assert_eq!(compile(Entity::Block, Some(&FilterExpr::all())).unwrap(), "");
    }

    #[test]
    fn test_single_leaf() {
        let filter = FilterExpr::eq("hash", "0xabc");
        assert_eq!(
            compile(Entity::Block, Some(&filter)).unwrap(),
            r#"hash_eq: "0xabc""#
        );
    }

    #[test]
    fn test_numeric_leaf_is_unquoted() {
        let filter = FilterExpr::eq("height", 12345i64);
        assert_eq!(
            compile(Entity::Block, Some(&filter)).unwrap(),
            "height_eq: 12345"
        );
    }

    #[test]
    fn test_and_group_joins_both_predicates() {
        let filter = FilterExpr::and([
            FilterExpr::eq("hash", "0xabc"),
            FilterExpr::predicate("height", Operator::Gte, 10i64),
        ]);
        assert_eq!(
            compile(Entity::Block, Some(&filter)).unwrap(),
            r#"AND: [{hash_eq: "0xabc"}, {height_gte: 10}]"#
        );
    }

    #[test]
    fn test_or_nested_in_and_keeps_grouping() {
        let filter = FilterExpr::and([
            FilterExpr::eq("name", "Balances.Transfer"),
            FilterExpr::or([FilterExpr::eq("id", "1"), FilterExpr::eq("id", "2")]),
        ]);
        assert_eq!(
            compile(Entity::Event, Some(&filter)).unwrap(),
            r#"AND: [{name_eq: "Balances.Transfer"}, {OR: [{id_eq: "1"}, {id_eq: "2"}]}]"#
        );
    }

    #[test]
    fn test_relation_nests_inner_clause() {
        let filter = FilterExpr::relation("extrinsic", FilterExpr::eq("id", "0001-aa"));
        assert_eq!(
            compile(Entity::Event, Some(&filter)).unwrap(),
            r#"extrinsic: {id_eq: "0001-aa"}"#
        );
    }

    #[test]
    fn test_empty_children_are_omitted() {
        let filter = FilterExpr::and([
            FilterExpr::all(),
            FilterExpr::relation("call", FilterExpr::all()),
            FilterExpr::eq("hash", "0x1"),
        ]);
        assert_eq!(
            compile(Entity::Extrinsic, Some(&filter)).unwrap(),
            r#"hash_eq: "0x1""#
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let filter = FilterExpr::contains("name", "say \"hi\" \\ bye\n");
        let clause = compile(Entity::Call, Some(&filter)).unwrap();
        let literal = clause.strip_prefix("name_contains: ").unwrap();
        let parsed: String = serde_json::from_str(literal).unwrap();
        assert_eq!(parsed, "say \"hi\" \\ bye\n");
    }

    #[test]
    fn test_json_contains_is_a_string_literal() {
        let filter = FilterExpr::json_contains("signature", json!({"address": "5Grw\"x"}));
        let clause = compile(Entity::Extrinsic, Some(&filter)).unwrap();
        let literal = clause.strip_prefix("signature_jsonContains: ").unwrap();
        let document: String = serde_json::from_str(literal).unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();
        assert_eq!(value, json!({"address": "5Grw\"x"}));
    }

    #[test]
    fn test_unsupported_operator_fails() {
        let filter = FilterExpr::contains("hash", "0x");
        assert_eq!(
            compile(Entity::Block, Some(&filter)),
            Err(FilterError::UnsupportedPredicate {
                entity: Entity::Block,
                field: "hash".into(),
                operator: Operator::Contains,
            })
        );
    }

    #[test]
    fn test_mismatched_value_fails() {
        let filter = FilterExpr::eq("height", "12");
        assert!(matches!(
            compile(Entity::Block, Some(&filter)),
            Err(FilterError::MismatchedValue { expected: "integer", .. })
        ));
    }

    #[test]
    fn test_unknown_relation_fails() {
        let filter = FilterExpr::relation("extrinsic", FilterExpr::eq("id", "1"));
        assert!(matches!(
            compile(Entity::Block, Some(&filter)),
            Err(FilterError::UnknownRelation { .. })
        ));
    }
}
