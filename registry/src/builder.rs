//! RegistryBuilder for constructing an immutable Registry.

use crate::{
    BackRef, DeletePolicy, EdgeDef, EnumMap, FieldDef, FieldType, HierarchyDef, InheritanceDef,
    KindDef, Lineage, OnDelete, Registry, Validator,
};
use inv_core::{Code, ResourceKind};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Names every kind answers to without declaring them.
pub const RESERVED_NAMES: [&str; 4] = ["resource_id", "tenant_id", "created_at", "updated_at"];

/// Errors that can occur during registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate kind: {0}")]
    DuplicateKind(ResourceKind),

    #[error("Duplicate name {name:?} on kind {kind}")]
    DuplicateName { kind: ResourceKind, name: String },

    #[error("Reserved name {name:?} declared on kind {kind}")]
    ReservedName { kind: ResourceKind, name: String },

    #[error("Edge {kind}.{edge} targets unregistered kind {target}")]
    UnknownEdgeTarget {
        kind: ResourceKind,
        edge: String,
        target: ResourceKind,
    },

    #[error("Back-reference {name:?} collides with another name on kind {kind}")]
    BackRefCollision { kind: ResourceKind, name: String },

    #[error("Enum map on {kind}.{field} does not match an enum field")]
    InvalidEnumMap { kind: ResourceKind, field: String },

    #[error("Enum field {kind}.{field} has no enum map")]
    MissingEnumMap { kind: ResourceKind, field: String },

    #[error("Invalid pattern on {kind}.{field}: {reason}")]
    InvalidPattern {
        kind: ResourceKind,
        field: String,
        reason: String,
    },

    #[error("Inheritance path on {kind} names unknown edge {edge:?}")]
    UnknownInheritanceEdge { kind: ResourceKind, edge: String },
}

impl RegistryError {
    pub fn code(&self) -> Code {
        Code::Internal
    }
}

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Kinds being built.
    kinds: HashMap<ResourceKind, KindDef>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a kind definition.
    pub fn add_kind(&mut self, kind: ResourceKind) -> KindBuilder<'_> {
        KindBuilder {
            builder: self,
            def: KindDef::new(kind),
            raw_enum_maps: Vec::new(),
        }
    }

    /// Build the immutable Registry.
    pub fn build(self) -> RegistryResult<Registry> {
        // Edge targets must be registered
        for def in self.kinds.values() {
            for edge in &def.edges {
                if !self.kinds.contains_key(&edge.target) {
                    return Err(RegistryError::UnknownEdgeTarget {
                        kind: def.kind,
                        edge: edge.name.clone(),
                        target: edge.target,
                    });
                }
            }
        }

        // Index back-references per target kind
        let mut back_refs: HashMap<(ResourceKind, String), BackRef> = HashMap::new();
        let mut incoming: HashMap<ResourceKind, Vec<BackRef>> = HashMap::new();
        let mut sorted: Vec<&KindDef> = self.kinds.values().collect();
        sorted.sort_by_key(|d| d.kind);

        for def in &sorted {
            for edge in &def.edges {
                let name = edge
                    .back_ref
                    .clone()
                    .unwrap_or_else(|| format!("{}_{}", def.kind.prefix(), edge.name));
                let back = BackRef {
                    name: name.clone(),
                    source: def.kind,
                    edge: edge.name.clone(),
                };
                incoming.entry(edge.target).or_default().push(back.clone());

                if edge.back_ref.is_none() {
                    continue;
                }
                let target_def = &self.kinds[&edge.target];
                let clashes_with_target = target_def.get_field(&name).is_some()
                    || target_def.get_edge(&name).is_some();
                if clashes_with_target || back_refs.contains_key(&(edge.target, name.clone())) {
                    return Err(RegistryError::BackRefCollision {
                        kind: edge.target,
                        name,
                    });
                }
                back_refs.insert((edge.target, name), back);
            }
        }

        // Inheritance paths must walk declared edges
        for def in &sorted {
            if let Some(inherits) = &def.inherits {
                let mut current = def.kind;
                for edge_name in &inherits.path {
                    let edge = self.kinds[&current].get_edge(edge_name).ok_or_else(|| {
                        RegistryError::UnknownInheritanceEdge {
                            kind: def.kind,
                            edge: edge_name.clone(),
                        }
                    })?;
                    current = edge.target;
                }
            }
        }

        Ok(Registry::new(self.kinds, back_refs, incoming))
    }
}

/// Builder for a kind definition.
pub struct KindBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    def: KindDef,
    raw_enum_maps: Vec<(String, EnumMap)>,
}

impl<'a> KindBuilder<'a> {
    /// Add a field.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.def.fields.push(field);
        self
    }

    /// Add an edge.
    pub fn edge(mut self, edge: EdgeDef) -> Self {
        self.def.edges.push(edge);
        self
    }

    /// Attach an external-name to stored-value table to an enum field.
    pub fn enum_map<I, E, N>(mut self, field: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (E, N)>,
        E: Into<String>,
        N: Into<String>,
    {
        self.raw_enum_maps
            .push((field.into(), EnumMap::new(entries)));
        self
    }

    /// Make the kind a self-referential tree through `parent_edge`.
    pub fn hierarchical(mut self, parent_edge: impl Into<String>, children: impl Into<String>) -> Self {
        let parent_edge = parent_edge.into();
        let children = children.into();
        self.def.edges.push(
            EdgeDef::one(parent_edge.clone(), self.def.kind)
                .back_ref(children.clone())
                .on_delete(OnDelete::Restrict),
        );
        self.def.hierarchy = Some(HierarchyDef {
            parent_edge,
            children,
        });
        self
    }

    /// Lineage this kind contributes metadata to.
    pub fn lineage(mut self, lineage: Lineage) -> Self {
        self.def.lineage = Some(lineage);
        self
    }

    /// Render inherited metadata of `lineage` by walking `path`.
    pub fn inherits(mut self, lineage: Lineage, path: &[&str]) -> Self {
        self.def.inherits = Some(InheritanceDef {
            lineage,
            path: path.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.def.delete_policy = policy;
        self
    }

    /// Add a cross-field validator.
    pub fn validator(mut self, validator: Validator) -> Self {
        self.def.validators.push(validator);
        self
    }

    /// Finish building this kind.
    pub fn done(mut self) -> RegistryResult<ResourceKind> {
        let kind = self.def.kind;
        if self.builder.kinds.contains_key(&kind) {
            return Err(RegistryError::DuplicateKind(kind));
        }

        // Fields and edges share one namespace
        let mut names = HashSet::new();
        let declared = self
            .def
            .fields
            .iter()
            .map(|f| &f.name)
            .chain(self.def.edges.iter().map(|e| &e.name));
        for name in declared {
            if RESERVED_NAMES.contains(&name.as_str()) {
                return Err(RegistryError::ReservedName {
                    kind,
                    name: name.clone(),
                });
            }
            if !names.insert(name.clone()) {
                return Err(RegistryError::DuplicateName {
                    kind,
                    name: name.clone(),
                });
            }
        }

        // Patterns must compile; the compiled form is kept for validation
        for field in &mut self.def.fields {
            field
                .compile_pattern()
                .map_err(|e| RegistryError::InvalidPattern {
                    kind,
                    field: field.name.clone(),
                    reason: e.to_string(),
                })?;
        }

        // Enum maps belong to enum fields, and every enum field has one
        for (field, map) in self.raw_enum_maps.drain(..) {
            let is_enum = self
                .def
                .get_field(&field)
                .is_some_and(|f| f.field_type == FieldType::Enum);
            if !is_enum {
                return Err(RegistryError::InvalidEnumMap { kind, field });
            }
            self.def.enum_maps.insert(field, map);
        }
        for field in &self.def.fields {
            if field.field_type == FieldType::Enum && !self.def.enum_maps.contains_key(&field.name) {
                return Err(RegistryError::MissingEnumMap {
                    kind,
                    field: field.name.clone(),
                });
            }
        }

        self.builder.kinds.insert(kind, self.def);
        Ok(kind)
    }
}
