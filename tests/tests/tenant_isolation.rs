//! Resources never cross tenant boundaries.

use inv_tests::prelude::*;

// ========== TEST: foreign_resources_are_not_found ==========
#[test]
fn test_foreign_resources_are_not_found() {
    // GIVEN a region owned by T1
    let f = Fixture::new();
    let region = f.region(&f.t1, "west", None);

    // THEN T2 cannot read, update or delete it
    expect_err(f.store.get(&f.t2, &region), Code::NotFound);
    let input = ResourceInput::new(ResourceKind::Region, f.t2.tenant).field("name", "stolen");
    expect_err(
        f.store.update(&f.t2, &region, &FieldMask::new(["name"]), &input),
        Code::NotFound,
    );
    expect_err(f.store.delete(&f.t2, &region), Code::NotFound);

    // AND T1 still sees it untouched
    let got = f.store.get(&f.t1, &region).unwrap();
    assert_eq!(got.resource.get("name"), Some(&Value::from("west")));
}

// ========== TEST: list_and_find_are_scoped ==========
#[test]
fn test_list_and_find_are_scoped() {
    let f = Fixture::new();
    f.region(&f.t1, "a", None);
    f.region(&f.t1, "b", None);
    f.region(&f.t2, "c", None);

    let all = ListRequest::new();
    let t1 = f.store.find(&f.t1, ResourceKind::Region, &all).unwrap();
    let t2 = f.store.list(&f.t2, ResourceKind::Region, &all).unwrap();

    assert_eq!(t1.total, 2);
    assert!(t1.items.iter().all(|r| r.tenant_id == f.t1.tenant));
    assert_eq!(t2.total, 1);
    assert_eq!(t2.items[0].resource.tenant_id, f.t2.tenant);
}

#[test]
fn test_filter_on_foreign_id_matches_nothing() {
    let f = Fixture::new();
    let region = f.region(&f.t1, "west", None);

    let request = ListRequest::new().filter(format!(r#"resource_id = "{region}""#));

    assert_eq!(f.store.find(&f.t2, ResourceKind::Region, &request).unwrap().total, 0);
    assert_eq!(f.store.find(&f.t1, ResourceKind::Region, &request).unwrap().total, 1);
}

// ========== TEST: payload_tenant_must_match ==========
#[test]
fn test_payload_tenant_must_match() {
    let f = Fixture::new();
    let input = ResourceInput::new(ResourceKind::Region, f.t2.tenant).field("name", "x");

    expect_err(f.store.create(&f.t1, &input), Code::InvalidArgument);
}

// ========== TEST: foreign_edge_target_is_not_found ==========
#[test]
fn test_foreign_edge_target_is_not_found() {
    // GIVEN a region in T2
    let f = Fixture::new();
    let foreign = f.region(&f.t2, "theirs", None);

    // WHEN T1 links a site to it
    let input = ResourceInput::new(ResourceKind::Site, f.t1.tenant).edge("region", &foreign);

    // THEN the reference is reported missing, not invalid
    expect_err(f.store.create(&f.t1, &input), Code::NotFound);
    ExpectEvents::new().created(1).verify(&f.events());
}

#[test]
fn test_unknown_edge_target_is_not_found() {
    let f = Fixture::new();
    let ghost = ResourceId::generate(ResourceKind::Region);
    let input = ResourceInput::new(ResourceKind::Site, f.t1.tenant).edge("region", &ghost);

    expect_err(f.store.create(&f.t1, &input), Code::NotFound);
}

// ========== TEST: tenant_id_cannot_be_updated ==========
#[test]
fn test_tenant_id_cannot_be_updated() {
    let f = Fixture::new();
    let region = f.region(&f.t1, "west", None);
    let input = ResourceInput::new(ResourceKind::Region, f.t1.tenant);

    let err = expect_err(
        f.store.update(&f.t1, &region, &FieldMask::new(["tenant_id"]), &input),
        Code::InvalidArgument,
    );

    assert!(err.to_string().contains("tenant"), "{err}");
}

#[test]
fn test_unique_fields_are_per_tenant() {
    let f = Fixture::new();
    let segment = |ctx: &RequestContext| {
        ResourceInput::new(ResourceKind::NetworkSegment, ctx.tenant)
            .field("name", "seg")
            .field("vlan_id", 100)
    };

    f.create(&f.t1, segment(&f.t1));
    f.create(&f.t2, segment(&f.t2));

    expect_err(f.store.create(&f.t1, &segment(&f.t1)), Code::FailedPrecondition);
}
