//! Field validation helpers for mutation operations.

use inv_core::{Attributes, EdgeMap, ResourceId, ResourceKind, ResourceView, RowId, TenantId, Value};
use inv_graph::Graph;
use inv_registry::{FieldDef, FieldType, KindDef};

use crate::error::{MutationError, MutationResult};

/// Check a client value against its field definition and convert it to
/// stored form. Enum members are translated through the kind's enum table.
pub fn validate_value(def: &KindDef, field: &FieldDef, value: &Value) -> MutationResult<Value> {
    if value.is_null() {
        if field.required {
            return Err(MutationError::missing_required(def.kind, &field.name));
        }
        return Ok(Value::Null);
    }

    let stored = match (field.field_type, value) {
        (FieldType::String, Value::String(s)) => {
            if let Some(max) = field.max_len {
                if s.len() > max {
                    return Err(MutationError::TooLong {
                        field: field.name.clone(),
                        max,
                    });
                }
            }
            if let Some(pattern) = &field.pattern {
                let re = field.matcher().ok_or_else(|| MutationError::InvalidPattern {
                    field: field.name.clone(),
                    message: format!("{pattern} was not compiled at registration"),
                })?;
                if !re.is_match(s) {
                    return Err(MutationError::PatternMismatch {
                        field: field.name.clone(),
                        value: s.clone(),
                    });
                }
            }
            value.clone()
        }
        (FieldType::Int, Value::Int(i)) => {
            validate_range(field, *i)?;
            value.clone()
        }
        (FieldType::Bool, Value::Bool(_)) => value.clone(),
        (FieldType::Enum, Value::Enum(member) | Value::String(member)) => {
            let map = def
                .get_enum_map(&field.name)
                .ok_or_else(|| MutationError::MissingEnumMap {
                    kind: def.kind,
                    field: field.name.clone(),
                })?;
            let stored = map
                .to_internal(member)
                .ok_or_else(|| MutationError::UnknownEnumMember {
                    field: field.name.clone(),
                    member: member.clone(),
                })?;
            if stored.is_null() && field.required {
                return Err(MutationError::missing_required(def.kind, &field.name));
            }
            stored
        }
        (FieldType::Metadata, Value::Metadata(metadata)) => {
            metadata.validate()?;
            value.clone()
        }
        (expected, actual) => {
            return Err(MutationError::invalid_value(
                &field.name,
                expected.name(),
                actual.type_name(),
            ))
        }
    };
    Ok(stored)
}

/// Validate range constraints (min/max) for an integer.
pub fn validate_range(field: &FieldDef, value: i64) -> MutationResult<()> {
    let below = field.min.is_some_and(|min| value < min);
    let above = field.max.is_some_and(|max| value > max);
    if !(below || above) {
        return Ok(());
    }

    let range_desc = match (field.min, field.max) {
        (Some(min), Some(max)) => format!("[{}..{}]", min, max),
        (Some(min), None) => format!("[>= {}]", min),
        (None, Some(max)) => format!("[<= {}]", max),
        (None, None) => String::new(),
    };
    Err(MutationError::RangeViolation {
        field: field.name.clone(),
        value,
        range_desc,
    })
}

/// Apply default values to missing fields.
pub fn apply_defaults(def: &KindDef, fields: &mut Attributes) {
    for field in &def.fields {
        if !fields.contains_key(&field.name) {
            if let Some(default) = &field.default {
                fields.insert(field.name.clone(), default.clone());
            }
        }
    }
}

/// Check that all required fields and edges are present.
pub fn check_required(def: &KindDef, fields: &Attributes, links: &EdgeMap) -> MutationResult<()> {
    for field in def.fields.iter().filter(|f| f.required) {
        if fields.get(&field.name).map_or(true, Value::is_null) {
            return Err(MutationError::missing_required(def.kind, &field.name));
        }
    }
    for edge in def.edges.iter().filter(|e| e.required) {
        if links.get(&edge.name).map_or(true, Vec::is_empty) {
            return Err(MutationError::missing_required(def.kind, &edge.name));
        }
    }
    Ok(())
}

/// Reject a unique field value already held by another row of the tenant.
pub fn check_unique(
    graph: &Graph,
    tenant: TenantId,
    def: &KindDef,
    field: &str,
    value: &Value,
    exclude: Option<RowId>,
) -> MutationResult<()> {
    if !def.is_unique_field(field) || value.is_null() {
        return Ok(());
    }
    let taken = graph
        .rows_by_field(tenant, def.kind, field, value)
        .any(|row| Some(row) != exclude);
    if taken {
        return Err(MutationError::UniqueConflict {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Run the kind's cross-field validators.
pub fn run_validators(def: &KindDef, view: &dyn ResourceView) -> MutationResult<()> {
    for validator in &def.validators {
        validator(view).map_err(|message| MutationError::validation(def.kind, message))?;
    }
    Ok(())
}

/// A not-yet-stored resource, as seen by validators.
pub struct Draft<'a> {
    pub kind: ResourceKind,
    pub fields: &'a Attributes,
    pub links: &'a EdgeMap,
}

impl ResourceView for Draft<'_> {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn links(&self, edge: &str) -> &[ResourceId] {
        self.links.get(edge).map(Vec::as_slice).unwrap_or(&[])
    }
}
