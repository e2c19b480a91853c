//! Tenant-wide deletion of one kind.

use inv_tests::prelude::*;

// ========== TEST: hard_bulk_delete_unlinks_dependents ==========
#[test]
fn test_hard_bulk_delete_unlinks_dependents() {
    // GIVEN two sites in T1, one with a host, and a site in T2
    let f = Fixture::new();
    let site = f.site(&f.t1, None);
    f.site(&f.t1, None);
    let host = f.host(&f.t1, Some(&site));
    let theirs = f.site(&f.t2, None);
    f.events();

    // WHEN T1's sites are removed outright
    let removed = f.store.delete_all_resources(&f.t1, ResourceKind::Site, true).unwrap();

    // THEN both are returned and gone, and the host lost its link
    assert_eq!(removed.len(), 2);
    assert!(removed.iter().all(|(kind, r)| *kind == ResourceKind::Site && r.tenant_id == f.t1.tenant));
    let left = f.store.list(&f.t1, ResourceKind::Site, &ListRequest::new()).unwrap();
    assert_eq!(left.total, 0);
    let host = f.store.get(&f.t1, &host).unwrap().resource;
    assert!(host.edge("site").is_none());
    ExpectEvents::new().deleted(2).updated(1).verify(&f.events());

    // AND T2 is untouched
    assert!(f.store.get(&f.t2, &theirs).is_ok());
}

// ========== TEST: soft_bulk_delete_marks_rows ==========
#[test]
fn test_soft_bulk_delete_marks_rows() {
    // GIVEN three hosts
    let f = Fixture::new();
    for _ in 0..3 {
        f.host(&f.t1, None);
    }
    f.events();

    // WHEN soft deleted in bulk
    let marked = f.store.delete_all_resources(&f.t1, ResourceKind::Host, false).unwrap();

    // THEN each is marked and still listed
    assert_eq!(marked.len(), 3);
    for (_, host) in &marked {
        assert_eq!(host.get("desired_state"), Some(&Value::Enum("HOST_STATE_DELETED".into())));
    }
    let pending = f
        .store
        .find(&f.t1, ResourceKind::Host, &ListRequest::new().filter("desired_state = HOST_STATE_DELETED"))
        .unwrap();
    assert_eq!(pending.total, 3);
    ExpectEvents::new().updated(3).deleted(0).verify(&f.events());

    // AND repeating it changes nothing
    let again = f.store.delete_all_resources(&f.t1, ResourceKind::Host, false).unwrap();
    assert_eq!(again.len(), 3);
    ExpectEvents::none().verify(&f.events());
}

#[test]
fn test_soft_bulk_delete_needs_desired_state() {
    let f = Fixture::new();
    f.site(&f.t1, None);

    expect_err(
        f.store.delete_all_resources(&f.t1, ResourceKind::Site, false),
        Code::InvalidArgument,
    );
}

#[test]
fn test_hard_bulk_delete_of_whole_hierarchy() {
    let f = Fixture::new();
    f.region_chain(&f.t1, 4);

    let removed = f.store.delete_all_resources(&f.t1, ResourceKind::Region, true).unwrap();

    assert_eq!(removed.len(), 4);
    let left = f.store.find(&f.t1, ResourceKind::Region, &ListRequest::new()).unwrap();
    assert_eq!(left.total, 0);
}

#[test]
fn test_bulk_delete_of_empty_kind() {
    let f = Fixture::new();

    let removed = f.store.delete_all_resources(&f.t1, ResourceKind::Workload, true).unwrap();

    assert!(removed.is_empty());
    ExpectEvents::none().verify(&f.events());
}
