//! Nesting limits, cycle rejection and referential integrity of
//! hierarchical kinds.

use inv_tests::prelude::*;
use pretty_assertions::assert_eq;

fn reparent(f: &Fixture, ctx: &RequestContext, id: &ResourceId, parent: &ResourceId) -> Result<(), StoreError> {
    let input = ResourceInput::new(ResourceKind::Region, ctx.tenant).edge("parent", parent);
    f.store
        .update(ctx, id, &FieldMask::new(["parent"]), &input)
        .map(|_| ())
}

// ========== TEST: five_levels_allowed_sixth_rejected ==========
#[test]
fn test_five_levels_allowed_sixth_rejected() {
    // GIVEN a chain of five regions
    let f = Fixture::new();
    let chain = f.region_chain(&f.t1, 5);
    f.events();

    // WHEN a sixth level is created under the leaf
    let input = Fixture::region_input(&f.t1, "too-deep", chain.last());
    let err = expect_err(f.store.create(&f.t1, &input), Code::InvalidArgument);

    // THEN the error mentions depth and nothing was stored or published
    assert!(err.to_string().contains("depth"), "{err}");
    ExpectEvents::none().verify(&f.events());
    let page = f.store.list(&f.t1, ResourceKind::Region, &ListRequest::new()).unwrap();
    assert_eq!(page.total, 5);
}

// ========== TEST: self_parent_rejected ==========
#[test]
fn test_self_parent_rejected() {
    let f = Fixture::new();
    let region = f.region(&f.t1, "solo", None);

    let err = reparent(&f, &f.t1, &region, &region).unwrap_err();

    assert_eq!(err.code(), Code::InvalidArgument);
    assert!(err.to_string().contains("depth"), "{err}");
}

// ========== TEST: cycle_rejected_and_rolled_back ==========
#[test]
fn test_cycle_rejected_and_rolled_back() {
    // GIVEN a <- b <- c
    let f = Fixture::new();
    let chain = f.region_chain(&f.t1, 3);
    f.events();

    // WHEN a is re-parented under c
    let err = reparent(&f, &f.t1, &chain[0], &chain[2]).unwrap_err();

    // THEN the update fails and a is still a root
    assert_eq!(err.code(), Code::InvalidArgument);
    assert!(err.to_string().contains("depth"), "{err}");
    let root = f.store.get(&f.t1, &chain[0]).unwrap();
    assert!(root.resource.edge("parent").is_none());
    ExpectEvents::none().verify(&f.events());
}

// ========== TEST: merging_subtrees_checks_whole_component ==========
#[test]
fn test_merging_subtrees_checks_whole_component() {
    // GIVEN two chains of three regions
    let f = Fixture::new();
    let upper = f.region_chain(&f.t1, 3);
    let lower = f.region_chain(&f.t1, 3);

    // WHEN the lower root is hung under the upper leaf, its own leaf would sit six deep
    let err = reparent(&f, &f.t1, &lower[0], &upper[2]).unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);

    // AND hanging it under the upper middle fits exactly
    reparent(&f, &f.t1, &lower[0], &upper[1]).unwrap();
}

// ========== TEST: children_block_delete ==========
#[test]
fn test_children_block_delete() {
    // GIVEN a parent with one child
    let f = Fixture::new();
    let parent = f.region(&f.t1, "parent", None);
    let child = f.region(&f.t1, "child", Some(&parent));

    // WHEN the parent is deleted
    let err = expect_err(f.store.delete(&f.t1, &parent), Code::FailedPrecondition);

    // THEN the relation is named
    assert!(err.to_string().contains("children"), "{err}");

    // AND once the child is gone the delete succeeds
    assert_eq!(f.store.delete(&f.t1, &child).unwrap(), DeleteStatus::Removed);
    assert_eq!(f.store.delete(&f.t1, &parent).unwrap(), DeleteStatus::Removed);
    expect_err(f.store.get(&f.t1, &parent), Code::NotFound);
}

#[test]
fn test_sites_block_region_delete() {
    let f = Fixture::new();
    let region = f.region(&f.t1, "west", None);
    f.site(&f.t1, Some(&region));

    let err = expect_err(f.store.delete(&f.t1, &region), Code::FailedPrecondition);

    assert!(err.to_string().contains("sites"), "{err}");
}

#[test]
fn test_deleting_twice_is_not_found() {
    let f = Fixture::new();
    let region = f.region(&f.t1, "gone", None);

    f.store.delete(&f.t1, &region).unwrap();

    expect_err(f.store.delete(&f.t1, &region), Code::NotFound);
}

// ========== TEST: tree_hierarchy_walks_upward ==========
#[test]
fn test_tree_hierarchy_walks_upward() {
    // GIVEN host -> site -> region -> root region
    let f = Fixture::new();
    let root = f.region(&f.t1, "root", None);
    let region = f.region(&f.t1, "west", Some(&root));
    let site = f.site(&f.t1, Some(&region));
    let host = f.host(&f.t1, Some(&site));

    // WHEN the tree of the host is requested
    let nodes = f.store.get_tree_hierarchy(&f.t1, &[host.clone()]).unwrap();

    // THEN each ancestor appears once at its distance
    let walked: Vec<(ResourceId, usize)> = nodes
        .iter()
        .map(|n| (n.resource_id.clone(), n.depth))
        .collect();
    assert_eq!(walked, vec![(host, 0), (site.clone(), 1), (region.clone(), 2), (root.clone(), 3)]);
    assert_eq!(nodes[1].parent_ids, vec![region]);
    assert!(nodes[3].parent_ids.is_empty());
}

#[test]
fn test_tree_hierarchy_of_foreign_id_is_not_found() {
    let f = Fixture::new();
    let region = f.region(&f.t1, "mine", None);

    expect_err(f.store.get_tree_hierarchy(&f.t2, &[region]), Code::NotFound);
}
