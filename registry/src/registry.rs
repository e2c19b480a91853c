//! The Registry - immutable schema lookup.

use crate::{BackRef, EdgeDef, FieldDef, KindDef};
use inv_core::ResourceKind;
use std::collections::HashMap;

/// The Registry provides runtime lookup of kind definitions.
/// It is immutable after construction.
#[derive(Debug)]
pub struct Registry {
    /// Kind definitions.
    kinds: HashMap<ResourceKind, KindDef>,
    /// Named back-references by (target kind, name).
    back_refs: HashMap<(ResourceKind, String), BackRef>,
    /// Every edge pointing at a kind, named or not.
    incoming: HashMap<ResourceKind, Vec<BackRef>>,
}

impl Registry {
    /// Use RegistryBuilder for construction.
    pub(crate) fn new(
        kinds: HashMap<ResourceKind, KindDef>,
        back_refs: HashMap<(ResourceKind, String), BackRef>,
        incoming: HashMap<ResourceKind, Vec<BackRef>>,
    ) -> Self {
        Self {
            kinds,
            back_refs,
            incoming,
        }
    }

    // ==================== Kind Lookups ====================

    /// Get a kind definition.
    pub fn get_kind(&self, kind: ResourceKind) -> Option<&KindDef> {
        self.kinds.get(&kind)
    }

    /// Get all kind definitions.
    pub fn all_kinds(&self) -> impl Iterator<Item = &KindDef> {
        self.kinds.values()
    }

    /// Get the number of kinds.
    pub fn kind_count(&self) -> usize {
        self.kinds.len()
    }

    /// Get a field definition of a kind.
    pub fn get_field(&self, kind: ResourceKind, name: &str) -> Option<&FieldDef> {
        self.kinds.get(&kind).and_then(|d| d.get_field(name))
    }

    /// Get an edge definition of a kind.
    pub fn get_edge(&self, kind: ResourceKind, name: &str) -> Option<&EdgeDef> {
        self.kinds.get(&kind).and_then(|d| d.get_edge(name))
    }

    // ==================== Back-reference Lookups ====================

    /// Resolve a back-reference name on a target kind.
    pub fn get_back_ref(&self, target: ResourceKind, name: &str) -> Option<&BackRef> {
        self.back_refs.get(&(target, name.to_string()))
    }

    /// Every edge, from any kind, that may point at `target`.
    pub fn incoming_edges(&self, target: ResourceKind) -> &[BackRef] {
        self.incoming
            .get(&target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Back-reference name under which `target` sees `source.edge`.
    pub fn back_ref_name(&self, source: ResourceKind, edge: &str) -> Option<&str> {
        let target = self.get_edge(source, edge)?.target;
        self.incoming_edges(target)
            .iter()
            .find(|b| b.source == source && b.edge == edge)
            .map(|b| b.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::{inventory_registry, Cardinality, DeletePolicy, Lineage, OnDelete};
    use inv_core::ResourceKind;

    // ========== TEST: inventory_registry_builds ==========
    #[test]
    fn test_inventory_registry_builds() {
        // GIVEN the default inventory schema
        let registry = inventory_registry().unwrap();

        // THEN every kind is registered
        assert_eq!(registry.kind_count(), ResourceKind::ALL.len());
        for kind in ResourceKind::ALL {
            assert!(registry.get_kind(kind).is_some(), "missing {kind}");
        }
    }

    // ========== TEST: hierarchical_kinds ==========
    #[test]
    fn test_hierarchical_kinds() {
        let registry = inventory_registry().unwrap();

        let hierarchical: Vec<ResourceKind> = ResourceKind::ALL
            .into_iter()
            .filter(|k| registry.get_kind(*k).is_some_and(|d| d.is_hierarchical()))
            .collect();

        assert_eq!(
            hierarchical,
            vec![ResourceKind::Region, ResourceKind::OrganizationalUnit]
        );
    }

    // ========== TEST: delete_policies ==========
    #[test]
    fn test_delete_policies() {
        let registry = inventory_registry().unwrap();
        let policy = |k| registry.get_kind(k).map(|d| d.delete_policy);

        for kind in [
            ResourceKind::Instance,
            ResourceKind::Host,
            ResourceKind::IpAddress,
            ResourceKind::Netlink,
            ResourceKind::Workload,
            ResourceKind::Tenant,
        ] {
            assert_eq!(policy(kind), Some(DeletePolicy::TwoPhase), "{kind}");
            assert!(registry.get_kind(kind).unwrap().has_desired_state());
        }
        for kind in [
            ResourceKind::Region,
            ResourceKind::OrganizationalUnit,
            ResourceKind::Site,
            ResourceKind::NetworkSegment,
            ResourceKind::SingleSchedule,
            ResourceKind::RepeatedSchedule,
            ResourceKind::TelemetryGroup,
            ResourceKind::TelemetryProfile,
            ResourceKind::WorkloadMember,
        ] {
            assert_eq!(policy(kind), Some(DeletePolicy::Simple), "{kind}");
        }
    }

    // ========== TEST: lineages ==========
    #[test]
    fn test_lineages() {
        let registry = inventory_registry().unwrap();
        let lineage = |k| registry.get_kind(k).and_then(|d| d.lineage);

        assert_eq!(lineage(ResourceKind::Region), Some(Lineage::Physical));
        assert_eq!(lineage(ResourceKind::Site), Some(Lineage::Physical));
        assert_eq!(
            lineage(ResourceKind::OrganizationalUnit),
            Some(Lineage::Logical)
        );
        assert_eq!(lineage(ResourceKind::Host), None);
    }

    // ========== TEST: back_refs_resolve ==========
    #[test]
    fn test_back_refs_resolve() {
        let registry = inventory_registry().unwrap();

        let sites = registry.get_back_ref(ResourceKind::Region, "sites").unwrap();
        assert_eq!(sites.source, ResourceKind::Site);
        assert_eq!(sites.edge, "region");

        assert_eq!(
            registry.back_ref_name(ResourceKind::WorkloadMember, "workload"),
            Some("members")
        );
    }

    // ========== TEST: relation_targets_form_oneof ==========
    #[test]
    fn test_relation_targets_form_oneof() {
        let registry = inventory_registry().unwrap();

        for kind in [ResourceKind::SingleSchedule, ResourceKind::RepeatedSchedule] {
            let def = registry.get_kind(kind).unwrap();
            let members = def.oneof_members("relation");
            let names: Vec<&str> = members.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(
                names,
                vec!["target_host", "target_site", "target_region", "target_workload"]
            );
            assert!(members
                .iter()
                .all(|e| e.on_delete == OnDelete::Unlink && e.cardinality == Cardinality::One));
        }
    }

    // ========== TEST: instance_host_is_exclusive ==========
    #[test]
    fn test_instance_host_is_exclusive() {
        let registry = inventory_registry().unwrap();
        let host = registry.get_edge(ResourceKind::Instance, "host").unwrap();

        assert!(host.exclusive);
        assert_eq!(host.target, ResourceKind::Host);
    }
}
