//! Rendered metadata follows the nearest ancestor.

use inv_tests::prelude::*;

// ========== TEST: nearest_ancestor_wins ==========
#[test]
fn test_nearest_ancestor_wins() {
    // GIVEN A(key1=a1, key2=a2) -> B(key1=b1) -> C
    let f = Fixture::new();
    let a = f.region_with_metadata(&f.t1, None, &[("key1", "a1"), ("key2", "a2")]);
    let b = f.region_with_metadata(&f.t1, Some(&a), &[("key1", "b1")]);
    let c = f.region(&f.t1, "leaf", Some(&b));

    // WHEN C is read
    let got = f.store.get(&f.t1, &c).unwrap();

    // THEN key1 comes from B and key2 from A
    let rendered = &got.rendered_metadata;
    assert_eq!(rendered.get("key1"), Some("b1"));
    assert_eq!(rendered.get("key2"), Some("a2"));
    assert_eq!(rendered.physical.len(), 2);
    assert!(rendered.logical.is_empty());

    // AND standalone metadata is untouched
    assert!(got.resource.metadata().is_none());
    let a_meta = f.store.get(&f.t1, &a).unwrap();
    assert_eq!(a_meta.resource.metadata().and_then(|m| m.get("key1")), Some("a1"));
}

#[test]
fn test_site_inherits_physical_lineage() {
    let f = Fixture::new();
    let region = f.region_with_metadata(&f.t1, None, &[("zone", "eu-west")]);
    let site = f.site(&f.t1, Some(&region));
    let host = f.host(&f.t1, Some(&site));

    let rendered = f.store.get(&f.t1, &host).unwrap().rendered_metadata;

    assert_eq!(rendered.get("zone"), Some("eu-west"));
    assert!(rendered.logical.is_empty());
}

#[test]
fn test_organizational_units_render_logical_lineage() {
    let f = Fixture::new();
    let metadata = Metadata::from_pairs([("team", "edge")]).unwrap();
    let root = f.create_id(
        &f.t1,
        ResourceInput::new(ResourceKind::OrganizationalUnit, f.t1.tenant).metadata(metadata),
    );
    let child = f.ou(&f.t1, Some(&root));

    let rendered = f.store.get(&f.t1, &child).unwrap().rendered_metadata;

    assert_eq!(rendered.get("team"), Some("edge"));
    assert!(rendered.physical.is_empty());
}

// ========== TEST: rendering_follows_reparenting ==========
#[test]
fn test_rendering_follows_reparenting() {
    // GIVEN a leaf under X(k=x), with another root Y(k=y)
    let f = Fixture::new();
    let x = f.region_with_metadata(&f.t1, None, &[("k", "x")]);
    let y = f.region_with_metadata(&f.t1, None, &[("k", "y")]);
    let leaf = f.region(&f.t1, "leaf", Some(&x));

    // WHEN the leaf moves under Y
    let input = ResourceInput::new(ResourceKind::Region, f.t1.tenant).edge("parent", &y);
    f.store
        .update(&f.t1, &leaf, &FieldMask::new(["parent"]), &input)
        .unwrap();

    // THEN the next read renders Y's value
    let rendered = f.store.get(&f.t1, &leaf).unwrap().rendered_metadata;
    assert_eq!(rendered.get("k"), Some("y"));
}
