//! Telemetry profiles inherited down the physical chain.

use inv_tests::prelude::*;
use pretty_assertions::assert_eq;

struct Chain {
    region: ResourceId,
    site: ResourceId,
    host: ResourceId,
    instance: ResourceId,
    other_site: ResourceId,
    profiles: [ResourceId; 4],
}

/// root -> region -> site -> host -> instance, with profiles on root (10s),
/// site (20s), instance (30s) and an unrelated site (40s).
fn chain(f: &Fixture) -> Chain {
    let ctx = &f.t1;
    let root = f.region(ctx, "root", None);
    let region = f.region(ctx, "west", Some(&root));
    let site = f.site(ctx, Some(&region));
    let other_site = f.site(ctx, None);
    let host = f.host(ctx, Some(&site));
    let instance = f.vm(ctx, Some(&host));
    let group = f.telemetry_group(ctx);
    let profiles = [
        f.metrics_profile(ctx, &group, "target_region", &root, 10),
        f.metrics_profile(ctx, &group, "target_site", &site, 20),
        f.metrics_profile(ctx, &group, "target_instance", &instance, 30),
        f.metrics_profile(ctx, &group, "target_site", &other_site, 40),
    ];
    Chain {
        region,
        site,
        host,
        instance,
        other_site,
        profiles,
    }
}

fn ids(page: &inv_store::ListPage) -> Vec<ResourceId> {
    let mut ids: Vec<ResourceId> = page.items.iter().map(|h| h.resource.resource_id.clone()).collect();
    ids.sort();
    ids
}

fn sorted(ids: &[&ResourceId]) -> Vec<ResourceId> {
    let mut ids: Vec<ResourceId> = ids.iter().map(|id| (*id).clone()).collect();
    ids.sort();
    ids
}

// ========== TEST: instance_inherits_whole_chain ==========
#[test]
fn test_instance_inherits_whole_chain() {
    let f = Fixture::new();
    let c = chain(&f);

    let page = f
        .store
        .list_inherited_telemetry_profiles(&f.t1, &c.instance, &ListRequest::new())
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(ids(&page), sorted(&[&c.profiles[0], &c.profiles[1], &c.profiles[2]]));
}

#[test]
fn test_each_level_sees_its_ancestors_only() {
    let f = Fixture::new();
    let c = chain(&f);
    let count = |target: &ResourceId| {
        f.store
            .list_inherited_telemetry_profiles(&f.t1, target, &ListRequest::new())
            .unwrap()
            .total
    };

    assert_eq!(count(&c.host), 2);
    assert_eq!(count(&c.site), 2);
    assert_eq!(count(&c.region), 1);
    assert_eq!(count(&c.other_site), 1);
}

// ========== TEST: inherited_profiles_filter_and_page ==========
#[test]
fn test_inherited_profiles_filter_and_page() {
    let f = Fixture::new();
    let c = chain(&f);

    let filtered = f
        .store
        .list_inherited_telemetry_profiles(
            &f.t1,
            &c.instance,
            &ListRequest::new().filter("metrics_interval > 15"),
        )
        .unwrap();
    let first = f
        .store
        .list_inherited_telemetry_profiles(
            &f.t1,
            &c.instance,
            &ListRequest::new().order_by("metrics_interval desc").limit(1),
        )
        .unwrap();

    assert_eq!(filtered.total, 2);
    assert_eq!(ids(&first), vec![c.profiles[2].clone()]);
    assert!(first.has_next);
    assert_eq!(first.total, 3);
}

#[test]
fn test_invalid_targets() {
    let f = Fixture::new();
    let c = chain(&f);
    let group = f.telemetry_group(&f.t1);

    expect_err(
        f.store.list_inherited_telemetry_profiles(&f.t1, &group, &ListRequest::new()),
        Code::InvalidArgument,
    );
    expect_err(
        f.store.list_inherited_telemetry_profiles(&f.t2, &c.instance, &ListRequest::new()),
        Code::NotFound,
    );
}

// ========== TEST: removed_target_unlinks_profile ==========
#[test]
fn test_removed_target_unlinks_profile() {
    // GIVEN a profile attached to a standalone site
    let f = Fixture::new();
    let c = chain(&f);
    f.events();

    // WHEN the site is deleted
    assert_eq!(f.store.delete(&f.t1, &c.other_site).unwrap(), DeleteStatus::Removed);

    // THEN the profile survives without a target
    let profile = f.store.get(&f.t1, &c.profiles[3]).unwrap().resource;
    assert!(profile.edge("target_site").is_none());
    ExpectEvents::new()
        .sequence(&[EventKind::Updated, EventKind::Deleted])
        .verify(&f.events());
}
