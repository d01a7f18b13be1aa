//! The closed operation set of a generated client.

use serde_json::Value;
use std::collections::BTreeMap;
use toolkit_engine_core::{Action, EntityName, HttpMethod, PathTemplate};
use toolkit_engine_selection::{GroupKey, Mapping};

/// How a successful response body is turned into an [`OperationOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A list of records, possibly wrapped in `results` or `data`.
    Collection,
    /// One record, possibly wrapped in `data`.
    Record,
    /// The written record, returned as the server sent it.
    Written,
    /// Deletion confirmation without data.
    Confirmation,
}

impl ResponseShape {
    /// Shape returned by an action.
    #[must_use]
    pub const fn for_action(action: Action) -> Self {
        match action {
            Action::List => Self::Collection,
            Action::Get => Self::Record,
            Action::Create | Action::Update => Self::Written,
            Action::Delete => Self::Confirmation,
        }
    }

    /// Extracts the output from a parsed body (`None` for an empty body).
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use toolkit_engine_client::{OperationOutput, ResponseShape};
    ///
    /// let body = json!({"success": true, "data": [{"id": 1}]});
    /// let output = ResponseShape::Collection.extract(Some(body));
    /// assert_eq!(output, OperationOutput::Records(vec![json!({"id": 1})]));
    /// ```
    #[must_use]
    pub fn extract(self, body: Option<Value>) -> OperationOutput {
        match self {
            Self::Collection => OperationOutput::Records(records(body)),
            Self::Record => OperationOutput::Record(match body {
                Some(Value::Object(mut object)) => match object.remove("data") {
                    Some(data @ Value::Object(_)) => data,
                    Some(other) => {
                        object.insert("data".to_string(), other);
                        Value::Object(object)
                    }
                    None => Value::Object(object),
                },
                Some(other) => other,
                None => Value::Null,
            }),
            Self::Written => {
                OperationOutput::Record(body.unwrap_or_else(|| Value::Object(serde_json::Map::new())))
            }
            Self::Confirmation => OperationOutput::Deleted,
        }
    }
}

fn records(body: Option<Value>) -> Vec<Value> {
    match body {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(Value::Object(mut object)) => {
            for key in ["results", "data"] {
                let is_array = object.get(key).is_some_and(Value::is_array);
                if is_array && let Some(Value::Array(items)) = object.remove(key) {
                    return items;
                }
            }
            // Empty Pipedrive lists come back as `"data": null`.
            if object.get("data").is_some_and(Value::is_null) {
                return Vec::new();
            }
            vec![Value::Object(object)]
        }
        Some(other) => vec![other],
    }
}

/// Result of one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    /// Records returned by a list operation
    Records(Vec<Value>),
    /// A single record
    Record(Value),
    /// The record was deleted
    Deleted,
}

impl OperationOutput {
    /// Records of a list output; a single record becomes a one-element list.
    #[must_use]
    pub fn into_records(self) -> Vec<Value> {
        match self {
            Self::Records(records) => records,
            Self::Record(record) => vec![record],
            Self::Deleted => Vec::new(),
        }
    }

    /// The record of a single-record output.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Value> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns `true` for a delete confirmation.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Arguments of one operation call.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use toolkit_engine_client::OperationArgs;
///
/// let args = OperationArgs::new()
///     .with_id("42")
///     .with_query("limit", "10")
///     .with_body(json!({"name": "Ada"}));
/// assert_eq!(args.id.as_deref(), Some("42"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationArgs {
    /// Record identifier for get/update/delete
    pub id: Option<String>,
    /// Named placeholder values
    pub path_params: BTreeMap<String, String>,
    /// Caller query parameters, sent before auth parameters
    pub query: Vec<(String, String)>,
    /// JSON body for create/update
    pub body: Option<Value>,
}

impl OperationArgs {
    /// Empty arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the record identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets a named path parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// How to send one mapped operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Parsed endpoint path
    pub path_template: PathTemplate,
    /// How the response is unwrapped
    pub response_shape: ResponseShape,
}

/// Name of the operation for an `(entity, action)` pair.
///
/// # Examples
///
/// ```
/// use toolkit_engine_client::operation_name;
/// use toolkit_engine_core::{Action, EntityName};
///
/// let activities = EntityName::new("activities");
/// assert_eq!(operation_name(&activities, Action::List), "list_activities");
/// assert_eq!(operation_name(&activities, Action::Get), "get_activity");
/// ```
#[must_use]
pub fn operation_name(entity: &EntityName, action: Action) -> String {
    match action {
        Action::List => format!("list_{entity}"),
        _ => format!("{action}_{}", entity.singular()),
    }
}

/// Request specs keyed by `(entity, action)` plus the operation name index.
#[derive(Debug, Clone, Default)]
pub struct OperationTable {
    specs: BTreeMap<GroupKey, RequestSpec>,
    names: BTreeMap<String, GroupKey>,
}

impl OperationTable {
    /// Builds the table from a resolved mapping.
    #[must_use]
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let mut table = Self::default();
        for (key, entry) in mapping.entries() {
            let spec = RequestSpec {
                method: entry.http_method,
                path_template: PathTemplate::parse(&entry.path),
                response_shape: ResponseShape::for_action(key.action),
            };
            table
                .names
                .insert(operation_name(&key.entity, key.action), key.clone());
            table.specs.insert(key, spec);
        }
        table
    }

    /// Spec for an `(entity, action)` pair.
    #[must_use]
    pub fn get(&self, entity: &EntityName, action: Action) -> Option<&RequestSpec> {
        self.specs.get(&GroupKey::new(entity.clone(), action))
    }

    /// Resolves an operation name such as `get_contact`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&GroupKey> {
        self.names.get(name)
    }

    /// Operation names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if no operation is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
