//! Stored rows to caller-facing resources.

use inv_core::{Attributes, Resource, Value};
use inv_graph::Row;
use inv_registry::Registry;

/// Convert a stored row, translating enum values back to external names.
///
/// Null fields are omitted; an unspecified enum reads as absent.
pub fn to_resource(registry: &Registry, row: &Row) -> Resource {
    let def = registry.get_kind(row.kind());
    let mut fields = Attributes::new();
    for (name, value) in &row.fields {
        let external = match value {
            Value::Null => continue,
            Value::Enum(internal) => def
                .and_then(|d| d.get_enum_map(name))
                .and_then(|map| map.to_external(internal))
                .map(|ext| Value::Enum(ext.to_string()))
                .unwrap_or_else(|| value.clone()),
            other => other.clone(),
        };
        fields.insert(name.clone(), external);
    }

    Resource {
        resource_id: row.resource_id.clone(),
        kind: row.kind(),
        tenant_id: row.tenant_id,
        fields,
        edges: row.links.clone(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inv_core::{attrs, now, EdgeMap, ResourceId, ResourceKind, TenantId};
    use inv_graph::Graph;
    use inv_registry::inventory_registry;

    #[test]
    fn test_enum_fields_read_back_external() {
        let registry = inventory_registry().unwrap();
        let mut graph = Graph::new();
        let row = graph
            .create_row(
                ResourceId::generate(ResourceKind::Instance),
                TenantId::random(),
                attrs! {
                    "kind" => Value::Enum("VM".into()),
                    "vm_cpu_cores" => 2,
                    "desired_state" => Value::Null,
                },
                EdgeMap::new(),
                now(),
            )
            .unwrap();

        let resource = to_resource(&registry, graph.get_row(row).unwrap());

        assert_eq!(
            resource.get("kind"),
            Some(&Value::Enum("INSTANCE_KIND_VM".into()))
        );
        assert_eq!(resource.get("vm_cpu_cores"), Some(&Value::Int(2)));
        assert!(resource.get("desired_state").is_none());
    }
}
