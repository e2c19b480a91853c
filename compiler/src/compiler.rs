//! Schema-binding pass over parsed filters.

use crate::{
    Column, CompareOp, CompileError, CompileResult, CompiledFilter, Predicate, SortColumn,
    SortKey, Step,
};
use inv_core::{ResourceKind, TenantId, Value};
use inv_parser::{parse_filter, parse_order_by, Filter, Literal, LiteralKind, Path};
use inv_registry::{FieldDef, FieldType, KindDef, Registry};

/// Maximum edge hops a filter path may take.
pub const DEFAULT_MAX_FILTER_DEPTH: usize = 5;

/// Binds filters and order-by lists against a registry.
pub struct FilterCompiler<'r> {
    registry: &'r Registry,
    max_depth: usize,
}

impl<'r> FilterCompiler<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_FILTER_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse and bind a filter for `kind`.
    pub fn compile(&self, kind: ResourceKind, filter: &str) -> CompileResult<CompiledFilter> {
        let predicate = match parse_filter(filter)? {
            Some(ast) => Some(self.bind(kind, &ast)?),
            None => None,
        };
        Ok(CompiledFilter { kind, predicate })
    }

    /// Bind an already parsed filter.
    pub fn bind(&self, kind: ResourceKind, filter: &Filter) -> CompileResult<Predicate> {
        match filter {
            Filter::Compare { path, op, value } => self.bind_compare(kind, path, *op, value),
            Filter::Has(path) => self.bind_has(kind, path),
            Filter::Not(inner, _) => Ok(Predicate::Not(Box::new(self.bind(kind, inner)?))),
            Filter::And(l, r) => Ok(Predicate::And(
                Box::new(self.bind(kind, l)?),
                Box::new(self.bind(kind, r)?),
            )),
            Filter::Or(l, r) => Ok(Predicate::Or(
                Box::new(self.bind(kind, l)?),
                Box::new(self.bind(kind, r)?),
            )),
        }
    }

    /// Parse and allow-list an `order_by` list for `kind`.
    pub fn compile_order_by(&self, kind: ResourceKind, order_by: &str) -> CompileResult<Vec<SortKey>> {
        let def = self.kind_def(kind)?;
        parse_order_by(order_by)?
            .into_iter()
            .map(|term| {
                let column = match term.field.as_str() {
                    "resource_id" => SortColumn::ResourceId,
                    "created_at" => SortColumn::CreatedAt,
                    "updated_at" => SortColumn::UpdatedAt,
                    name => match def.get_field(name) {
                        Some(field) if field.sortable => SortColumn::Field(name.to_string()),
                        _ => return Err(CompileError::NotSortable(term.field)),
                    },
                };
                Ok(SortKey {
                    column,
                    descending: term.descending,
                })
            })
            .collect()
    }

    // ==================== Paths ====================

    fn kind_def(&self, kind: ResourceKind) -> CompileResult<&'r KindDef> {
        self.registry
            .get_kind(kind)
            .ok_or(CompileError::UnknownKind(kind))
    }

    /// Resolve every segment but the last into traversal steps.
    fn walk(&self, kind: ResourceKind, path: &Path) -> CompileResult<(Vec<Step>, ResourceKind)> {
        if path.hops() > self.max_depth {
            return Err(CompileError::TooDeep {
                path: path.to_string(),
                max: self.max_depth,
            });
        }

        let mut steps = Vec::with_capacity(path.hops());
        let mut current = kind;
        for segment in &path.segments[..path.hops()] {
            let step = self.resolve_step(current, segment, path)?;
            current = step.reaches();
            steps.push(step);
        }
        Ok((steps, current))
    }

    fn resolve_step(&self, kind: ResourceKind, name: &str, path: &Path) -> CompileResult<Step> {
        if let Some(edge) = self.registry.get_edge(kind, name) {
            return Ok(Step::Forward {
                edge: edge.name.clone(),
                target: edge.target,
            });
        }
        if let Some(back) = self.registry.get_back_ref(kind, name) {
            return Ok(Step::Backward {
                source: back.source,
                edge: back.edge.clone(),
            });
        }
        if self.registry.get_field(kind, name).is_some() || is_pseudo_field(name) {
            return Err(CompileError::NotAnEdge {
                kind,
                name: name.to_string(),
            });
        }
        Err(CompileError::UnknownName {
            kind,
            name: name.to_string(),
            span: path.span,
        })
    }

    fn bind_has(&self, kind: ResourceKind, path: &Path) -> CompileResult<Predicate> {
        // Every segment of an existence test is traversed, the last included
        if path.segments.len() > self.max_depth {
            return Err(CompileError::TooDeep {
                path: path.to_string(),
                max: self.max_depth,
            });
        }
        let (mut steps, current) = self.walk(kind, path)?;
        steps.push(self.resolve_step(current, path.last(), path)?);
        Ok(Predicate::Exists { steps })
    }

    fn bind_compare(
        &self,
        kind: ResourceKind,
        path: &Path,
        op: CompareOp,
        literal: &Literal,
    ) -> CompileResult<Predicate> {
        let (steps, current) = self.walk(kind, path)?;
        let def = self.kind_def(current)?;
        let name = path.last();
        let shown = path.to_string();

        let (column, value) = match name {
            "resource_id" => {
                require_equality(&shown, op)?;
                (Column::ResourceId, bind_string(&shown, literal)?)
            }
            "tenant_id" => {
                require_equality(&shown, op)?;
                let value = match bind_string(&shown, literal)? {
                    Value::String(s) => TenantId::parse(&s)
                        .map(|t| Value::String(t.to_string()))
                        .map_err(|_| CompileError::type_mismatch(&shown, "tenant uuid", s))?,
                    other => other,
                };
                (Column::TenantId, value)
            }
            _ => {
                if let Some(field) = def.get_field(name) {
                    let value = self.bind_field_literal(def, field, &shown, op, literal)?;
                    (Column::Field(field.name.clone()), value)
                } else if def.get_edge(name).is_some() {
                    require_equality(&shown, op)?;
                    (Column::Edge(name.to_string()), bind_string(&shown, literal)?)
                } else if self.registry.get_back_ref(current, name).is_some() {
                    return Err(CompileError::type_mismatch(
                        shown,
                        "field or edge",
                        "back-reference (use has())",
                    ));
                } else {
                    return Err(CompileError::UnknownName {
                        kind: current,
                        name: name.to_string(),
                        span: path.span,
                    });
                }
            }
        };

        Ok(Predicate::Compare {
            steps,
            column,
            op,
            value,
        })
    }

    // ==================== Literals ====================

    fn bind_field_literal(
        &self,
        def: &KindDef,
        field: &FieldDef,
        path: &str,
        op: CompareOp,
        literal: &Literal,
    ) -> CompileResult<Value> {
        if literal.kind == LiteralKind::Null {
            require_equality(path, op)?;
            return Ok(Value::Null);
        }

        match field.field_type {
            FieldType::Int => match &literal.kind {
                LiteralKind::Int(i) => Ok(Value::Int(*i)),
                other => Err(CompileError::type_mismatch(path, "integer", describe(other))),
            },
            FieldType::String => {
                require_equality(path, op)?;
                bind_string(path, literal)
            }
            FieldType::Bool => {
                require_equality(path, op)?;
                match &literal.kind {
                    LiteralKind::Bool(b) => Ok(Value::Bool(*b)),
                    other => Err(CompileError::type_mismatch(path, "boolean", describe(other))),
                }
            }
            FieldType::Enum => {
                require_equality(path, op)?;
                let member = match &literal.kind {
                    LiteralKind::Ident(s) | LiteralKind::String(s) => s,
                    other => {
                        return Err(CompileError::type_mismatch(
                            path,
                            "enum member",
                            describe(other),
                        ))
                    }
                };
                def.get_enum_map(&field.name)
                    .and_then(|map| map.to_internal(member))
                    .ok_or_else(|| CompileError::UnknownEnumMember {
                        path: path.to_string(),
                        member: member.clone(),
                    })
            }
            FieldType::Metadata => Err(CompileError::unsupported_operator(path, op.symbol())),
        }
    }
}

fn is_pseudo_field(name: &str) -> bool {
    matches!(name, "resource_id" | "tenant_id")
}

fn require_equality(path: &str, op: CompareOp) -> CompileResult<()> {
    if op.is_ordering() {
        return Err(CompileError::unsupported_operator(path, op.symbol()));
    }
    Ok(())
}

fn bind_string(path: &str, literal: &Literal) -> CompileResult<Value> {
    match &literal.kind {
        LiteralKind::String(s) => Ok(Value::String(s.clone())),
        LiteralKind::Null => Ok(Value::Null),
        other => Err(CompileError::type_mismatch(path, "string", describe(other))),
    }
}

fn describe(kind: &LiteralKind) -> &'static str {
    match kind {
        LiteralKind::Null => "null",
        LiteralKind::Bool(_) => "boolean",
        LiteralKind::Int(_) => "integer",
        LiteralKind::String(_) => "string",
        LiteralKind::Ident(_) => "identifier",
    }
}
