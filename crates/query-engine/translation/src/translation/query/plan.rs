//! Type definitions of a compiled query plan.
//!
//! A plan is built fresh for every request and handed to an executor as is.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The plan for reading an entity, its nested associations, ordering and pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPlan {
    pub root: PlanNode,
    /// A specific record was requested by its primary key.
    pub key: Option<Value>,
    /// Global ordering. Each path is fully qualified from the root entity.
    pub order_by: Vec<OrderDirective>,
    /// Absent when a specific record was requested or the caller asked for no rows.
    pub pagination: Option<Pagination>,
    /// The caller asked for zero rows. Defaults must not widen that into a page.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_rows: bool,
}

/// A node of the plan, one per entity reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanNode {
    pub entity: String,
    pub fields: Selection,
    #[serde(rename = "where")]
    pub where_: Where,
    pub includes: Vec<Include>,
}

/// A nested association to load along with its parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Include {
    pub association: String,
    /// Field on the parent entity.
    pub foreign_key: String,
    /// Field on the associated entity.
    pub key: String,
    /// Required includes drop parents without a match.
    pub required: bool,
    pub plan: PlanNode,
}

/// Fields selected from an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Selection {
    /// Every declared field. Only used when no field is hidden from wildcard selection.
    AllFields,
    /// An explicit list of fields, in output order.
    Fields(Vec<String>),
}

impl Selection {
    /// The names of the fields this selection resolves to.
    pub fn field_names<'a>(
        &'a self,
        entity: &'a query_engine_metadata::metadata::EntityInfo,
    ) -> Vec<&'a str> {
        match self {
            Selection::AllFields => entity.fields.keys().map(String::as_str).collect(),
            Selection::Fields(fields) => fields.iter().map(String::as_str).collect(),
        }
    }
}

/// Conditions on the fields of an entity. All of them apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Where(pub IndexMap<String, Comparison>);

impl Where {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field_name: &str) -> Option<&Comparison> {
        self.0.get(field_name)
    }
}

/// A typed comparison against a single field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    Equals(Value),
    StartsWith(Value),
    EndsWith(Value),
    Contains(Value),
    Between(Value, Value),
    In(Vec<Value>),
}

/// A comparison operand, coerced to the declared type of the field it is compared with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    /// A numeric literal that did not parse. Compares unequal to everything.
    NotANumber,
}

impl Value {
    /// The JSON representation of this operand. `NotANumber` becomes `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Integer(int) => serde_json::Value::from(*int),
            Value::Float(float) => serde_json::Number::from_f64(*float)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(string) => serde_json::Value::String(string.clone()),
            Value::NotANumber => serde_json::Value::Null,
        }
    }
}

/// An ordering directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDirective {
    /// Root entity name, each association hop, then the field.
    pub path: Vec<String>,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Limit and offset of the root rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Pagination {
        Pagination {
            limit: 100,
            offset: 0,
        }
    }
}
