//! Records: one object definition from an initializer file
//!
//! A [`Record`] is the YAML mapping of a single object, converted to JSON and
//! tagged with the [`Resource`] it belongs to. The tag decides which fields
//! are required, how an existing object is looked up, and which
//! transformations apply before the record is sent.

pub mod schema;
pub mod template;

use crate::error::RecordError;
use crate::resource::{NaturalKey, Resource, Scope};
use serde_json::{Map, Value};

/// Query filters that identify an existing object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// The natural key first, then any parent filters.
    pub filters: Vec<(&'static str, String)>,
}

impl Lookup {
    pub fn key_value(&self) -> &str {
        self.filters.first().map(|(_, value)| value.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    resource: Resource,
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(resource: Resource, fields: Map<String, Value>) -> Self {
        Self { resource, fields }
    }

    pub fn from_yaml(resource: Resource, value: serde_yaml::Value) -> Result<Self, RecordError> {
        let json = serde_json::to_value(&value)
            .map_err(|e| RecordError::Validation(format!("cannot convert record: {e}")))?;
        match json {
            Value::Object(fields) => Ok(Self::new(resource, fields)),
            other => Err(RecordError::Validation(format!(
                "expected a mapping of fields, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Build every record one YAML item stands for, with transformations
    /// applied and name templates expanded.
    pub fn prepare(resource: Resource, value: serde_yaml::Value) -> Result<Vec<Self>, RecordError> {
        let mut record = Self::from_yaml(resource, value)?;
        record.apply_transformations();
        record.expand_name_template()
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Check the required fields of this resource are present.
    pub fn validate(&self) -> Result<(), RecordError> {
        let missing: Vec<&str> = schema::required_fields(self.resource)
            .iter()
            .copied()
            .filter(|name| is_blank(self.fields.get(*name)))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RecordError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// The filters used to find this record's object, or `None` for
    /// resources without a natural key.
    pub fn lookup(&self) -> Result<Option<Lookup>, RecordError> {
        let (param, value) = match self.resource.natural_key() {
            NaturalKey::None => return Ok(None),
            NaturalKey::Field(field) => {
                (field, self.scalar(field).ok_or(RecordError::MissingKey(field))?)
            }
            NaturalKey::Reference(field) => {
                ("name", self.scalar(field).ok_or(RecordError::MissingKey(field))?)
            }
            NaturalKey::NameOrSlug => match (self.scalar("name"), self.scalar("slug")) {
                (Some(name), _) => ("name", name),
                (None, Some(slug)) => ("slug", slug),
                (None, None) => return Err(RecordError::MissingKey("name")),
            },
        };

        let mut filters = vec![(param, value)];
        for scope in self.resource.lookup_scope() {
            filters.push(self.scope_filter(*scope)?);
        }
        Ok(Some(Lookup { filters }))
    }

    /// Query filter for one parent reference. The reference may be a name or
    /// slug, a numeric id, or a mapping carrying one of those.
    fn scope_filter(&self, scope: Scope) -> Result<(&'static str, String), RecordError> {
        let value = match self.fields.get(scope.field) {
            Some(value) if !is_blank(Some(value)) => value,
            _ => return Ok((scope.id_filter, "null".to_string())),
        };

        let filter = match value {
            Value::String(s) => Some((scope.field, s.clone())),
            Value::Number(n) if n.is_u64() => Some((scope.id_filter, n.to_string())),
            Value::Object(reference) => {
                match (reference.get("id"), reference.get("name"), reference.get("slug")) {
                    (Some(Value::Number(id)), _, _) if id.is_u64() => {
                        Some((scope.id_filter, id.to_string()))
                    }
                    (_, Some(Value::String(name)), _) if !name.trim().is_empty() => {
                        Some((scope.field, name.clone()))
                    }
                    (_, _, Some(Value::String(slug))) if !slug.trim().is_empty() => {
                        Some((scope.field, slug.clone()))
                    }
                    _ => None,
                }
            }
            _ => None,
        };

        filter.ok_or_else(|| {
            RecordError::Validation(format!(
                "`{}` is {}; expected a name, an id or a mapping with one of them",
                scope.field,
                json_kind(value)
            ))
        })
    }

    /// JSON body written to NetBox.
    pub fn payload(&self) -> Value {
        let mut fields = self.fields.clone();
        if let NaturalKey::Reference(field) = self.resource.natural_key() {
            fields.remove(field);
        }
        Value::Object(fields)
    }

    /// Natural key value, for reporting.
    pub fn label(&self) -> Option<String> {
        self.lookup().ok().flatten().map(|lookup| lookup.key_value().to_string())
    }

    fn apply_transformations(&mut self) {
        // Older initializer files still use the pre-3.x field name.
        if self.resource == Resource::CustomFields && !self.fields.contains_key("object_types") {
            if let Some(on_objects) = self.fields.remove("on_objects") {
                self.fields.insert("object_types".to_string(), on_objects);
            }
        }
    }

    fn expand_name_template(self) -> Result<Vec<Self>, RecordError> {
        if !self.resource.expands_name_templates() {
            return Ok(vec![self]);
        }
        let name = match self.fields.get("name") {
            Some(Value::String(name)) if template::has_ranges(name) => name.clone(),
            _ => return Ok(vec![self]),
        };

        let names = template::expand_name_template(&name).map_err(RecordError::Validation)?;
        Ok(names
            .into_iter()
            .map(|expanded| {
                let mut record = self.clone();
                record.fields.insert("name".to_string(), Value::String(expanded));
                record
            })
            .collect())
    }

    fn scalar(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
