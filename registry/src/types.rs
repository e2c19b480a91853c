//! Schema definition types.

use inv_core::{ResourceKind, ResourceView, Value, DESIRED_STATE_FIELD};
use regex_lite::Regex;
use std::collections::HashMap;

/// Storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int,
    Bool,
    Enum,
    Metadata,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Int => "Int",
            FieldType::Bool => "Bool",
            FieldType::Enum => "Enum",
            FieldType::Metadata => "Metadata",
        }
    }
}

/// Field definition within a kind.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Storage type.
    pub field_type: FieldType,
    /// Whether create must supply a non-null value.
    pub required: bool,
    /// Whether updates may touch this field.
    pub immutable: bool,
    /// Whether values must be unique within a tenant and kind.
    pub unique: bool,
    /// Whether `order_by` may name this field.
    pub sortable: bool,
    /// Default value if not provided on create.
    pub default: Option<Value>,
    /// Minimum value (Int only).
    pub min: Option<i64>,
    /// Maximum value (Int only).
    pub max: Option<i64>,
    /// Maximum string length in bytes.
    pub max_len: Option<usize>,
    /// Match pattern constraint (regex).
    pub pattern: Option<String>,
    /// `pattern`, compiled when the kind is registered.
    matcher: Option<Regex>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            immutable: false,
            unique: false,
            sortable: false,
            default: None,
            min: None,
            max: None,
            max_len: None,
            pattern: None,
            matcher: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Enum)
    }

    /// The standalone `metadata` field.
    pub fn metadata() -> Self {
        Self::new("metadata", FieldType::Metadata)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        if min.is_some() {
            self.min = min;
        }
        if max.is_some() {
            self.max = max;
        }
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self.matcher = None;
        self
    }

    /// The compiled pattern. `None` until the registry builder has accepted
    /// the field, and always `None` without a pattern.
    pub fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }

    pub(crate) fn compile_pattern(&mut self) -> Result<(), regex_lite::Error> {
        self.matcher = self.pattern.as_deref().map(Regex::new).transpose()?;
        Ok(())
    }
}

/// How many targets an edge may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    One,
    Many,
}

/// What happens to a link when its target is physically removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnDelete {
    /// Refuse to remove the target while the link exists.
    #[default]
    Restrict,
    /// Clear the link on the source.
    Unlink,
}

/// Edge definition within a kind.
#[derive(Debug, Clone)]
pub struct EdgeDef {
    /// Edge name on the source kind.
    pub name: String,
    /// Kind every target must have.
    pub target: ResourceKind,
    pub cardinality: Cardinality,
    /// Whether create must link a target.
    pub required: bool,
    /// One-to-one: a target may be linked by at most one source through this edge.
    pub exclusive: bool,
    /// Name under which the target sees its sources.
    pub back_ref: Option<String>,
    pub on_delete: OnDelete,
    /// Edges sharing a group hold at most one target between them.
    pub oneof: Option<String>,
}

impl EdgeDef {
    pub fn new(name: impl Into<String>, target: ResourceKind, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            target,
            cardinality,
            required: false,
            exclusive: false,
            back_ref: None,
            on_delete: OnDelete::Restrict,
            oneof: None,
        }
    }

    pub fn one(name: impl Into<String>, target: ResourceKind) -> Self {
        Self::new(name, target, Cardinality::One)
    }

    pub fn many(name: impl Into<String>, target: ResourceKind) -> Self {
        Self::new(name, target, Cardinality::Many)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn back_ref(mut self, name: impl Into<String>) -> Self {
        self.back_ref = Some(name.into());
        self
    }

    pub fn on_delete(mut self, action: OnDelete) -> Self {
        self.on_delete = action;
        self
    }

    pub fn oneof(mut self, group: impl Into<String>) -> Self {
        self.oneof = Some(group.into());
        self
    }
}

/// Translation table between external enum names and stored values.
///
/// An internal value of `""` stores as null; it is how the `*_UNSPECIFIED`
/// member of an enum is represented.
#[derive(Debug, Clone, Default)]
pub struct EnumMap {
    entries: Vec<(String, String)>,
}

impl EnumMap {
    pub fn new<I, E, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (E, N)>,
        E: Into<String>,
        N: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(e, n)| (e.into(), n.into()))
                .collect(),
        }
    }

    /// External name to stored value.
    pub fn to_internal(&self, external: &str) -> Option<Value> {
        self.entries
            .iter()
            .find(|(e, _)| e == external)
            .map(|(_, n)| {
                if n.is_empty() {
                    Value::Null
                } else {
                    Value::Enum(n.clone())
                }
            })
    }

    /// Stored value to external name. Null has no external form.
    pub fn to_external(&self, internal: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, n)| !n.is_empty() && n == internal)
            .map(|(e, _)| e.as_str())
    }

    /// Whether a stored value is a member of this enum.
    pub fn contains_internal(&self, internal: &str) -> bool {
        self.to_external(internal).is_some()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

/// Metadata inheritance lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lineage {
    /// Regions and sites.
    Physical,
    /// Organizational units.
    Logical,
}

/// Self-referential tree shape of a hierarchical kind.
#[derive(Debug, Clone)]
pub struct HierarchyDef {
    /// Edge pointing at the parent.
    pub parent_edge: String,
    /// Back-reference name for children.
    pub children: String,
}

/// Where a kind's rendered metadata comes from.
///
/// The walk follows `path` edge by edge, then climbs the hierarchy of the
/// last resource reached.
#[derive(Debug, Clone)]
pub struct InheritanceDef {
    pub lineage: Lineage,
    pub path: Vec<String>,
}

/// Whether delete removes immediately or goes through desired/current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    #[default]
    Simple,
    TwoPhase,
}

/// Cross-field business rule run after a create or update is built.
pub type Validator = fn(&dyn ResourceView) -> Result<(), String>;

/// Kind definition.
#[derive(Debug, Clone)]
pub struct KindDef {
    pub kind: ResourceKind,
    /// Field definitions in declaration order.
    pub fields: Vec<FieldDef>,
    /// Edge definitions in declaration order.
    pub edges: Vec<EdgeDef>,
    pub enum_maps: HashMap<String, EnumMap>,
    pub hierarchy: Option<HierarchyDef>,
    /// Lineage this kind contributes metadata to.
    pub lineage: Option<Lineage>,
    pub inherits: Option<InheritanceDef>,
    pub delete_policy: DeletePolicy,
    pub validators: Vec<Validator>,
}

impl KindDef {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
            edges: Vec::new(),
            enum_maps: HashMap::new(),
            hierarchy: None,
            lineage: None,
            inherits: None,
            delete_policy: DeletePolicy::Simple,
            validators: Vec::new(),
        }
    }

    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get an edge definition by name.
    pub fn get_edge(&self, name: &str) -> Option<&EdgeDef> {
        self.edges.iter().find(|e| e.name == name)
    }

    pub fn get_enum_map(&self, field: &str) -> Option<&EnumMap> {
        self.enum_maps.get(field)
    }

    /// Edges belonging to a one-of group.
    pub fn oneof_members(&self, group: &str) -> Vec<&EdgeDef> {
        self.edges
            .iter()
            .filter(|e| e.oneof.as_deref() == Some(group))
            .collect()
    }

    pub fn is_oneof_group(&self, name: &str) -> bool {
        self.edges.iter().any(|e| e.oneof.as_deref() == Some(name))
    }

    pub fn is_hierarchical(&self) -> bool {
        self.hierarchy.is_some()
    }

    /// Whether the kind carries a desired state (soft delete target).
    pub fn has_desired_state(&self) -> bool {
        self.get_field(DESIRED_STATE_FIELD).is_some()
    }

    pub fn is_unique_field(&self, name: &str) -> bool {
        self.get_field(name).is_some_and(|f| f.unique)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// A back-reference as seen from the target kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackRef {
    /// Back-reference name on the target kind.
    pub name: String,
    /// Kind holding the forward edge.
    pub source: ResourceKind,
    /// Forward edge name on the source kind.
    pub edge: String,
}
