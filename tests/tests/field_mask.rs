//! Partial updates through field masks.

use inv_tests::prelude::*;
use pretty_assertions::assert_eq;

fn host_with_serial(f: &Fixture) -> ResourceId {
    let input = ResourceInput::new(ResourceKind::Host, f.t1.tenant)
        .field("name", "before")
        .field("serial_number", "sn-1")
        .field("uuid", "0f5bd3f8-3bb5-4c5e-9f5a-1a2b3c4d5e6f");
    f.create_id(&f.t1, input)
}

fn update(f: &Fixture, id: &ResourceId, paths: &[&str], input: ResourceInput) -> Result<inv_store::HydratedResource, StoreError> {
    f.store
        .update(&f.t1, id, &FieldMask::new(paths.iter().copied()), &input)
}

// ========== TEST: only_masked_paths_change ==========
#[test]
fn test_only_masked_paths_change() {
    // GIVEN a host with a name and serial number
    let f = Fixture::new();
    let host = host_with_serial(&f);
    f.events();

    // WHEN the payload carries both but the mask names only "name"
    let input = ResourceInput::new(ResourceKind::Host, f.t1.tenant)
        .field("name", "after")
        .field("serial_number", "sn-2");
    update(&f, &host, &["name"], input).unwrap();

    // THEN only the name changed
    let got = f.store.get(&f.t1, &host).unwrap().resource;
    assert_eq!(got.get("name"), Some(&Value::from("after")));
    assert_eq!(got.get("serial_number"), Some(&Value::from("sn-1")));
    ExpectEvents::new().updated(1).created(0).verify(&f.events());
}

#[test]
fn test_masked_path_missing_from_payload_clears() {
    let f = Fixture::new();
    let host = host_with_serial(&f);

    update(&f, &host, &["serial_number"], ResourceInput::new(ResourceKind::Host, f.t1.tenant)).unwrap();

    let got = f.store.get(&f.t1, &host).unwrap().resource;
    assert!(got.get("serial_number").is_none());
    assert_eq!(got.get("name"), Some(&Value::from("before")));
}

// ========== TEST: rejected_masks ==========
#[test]
fn test_rejected_masks() {
    let f = Fixture::new();
    let host = host_with_serial(&f);
    let empty = || ResourceInput::new(ResourceKind::Host, f.t1.tenant);
    let cases: [&[&str]; 6] = [&[], &["*"], &["colour"], &["uuid"], &["resource_id"], &["created_at"]];

    for paths in cases {
        let err = update(&f, &host, paths, empty()).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument, "{paths:?}: {err}");
    }
}

#[test]
fn test_full_replace_names_the_problem() {
    let f = Fixture::new();
    let host = host_with_serial(&f);

    let err = update(&f, &host, &["*"], ResourceInput::new(ResourceKind::Host, f.t1.tenant)).unwrap_err();

    assert!(err.to_string().contains("full replace"), "{err}");
}

#[test]
fn test_required_field_cannot_be_cleared() {
    let f = Fixture::new();
    let segment = f.create_id(
        &f.t1,
        ResourceInput::new(ResourceKind::NetworkSegment, f.t1.tenant).field("vlan_id", 10),
    );

    let err = f
        .store
        .update(
            &f.t1,
            &segment,
            &FieldMask::new(["vlan_id"]),
            &ResourceInput::new(ResourceKind::NetworkSegment, f.t1.tenant),
        )
        .unwrap_err();

    assert_eq!(err.code(), Code::InvalidArgument);
}

// ========== TEST: validators_roll_back_update ==========
#[test]
fn test_validators_roll_back_update() {
    // GIVEN a VM with cores and memory
    let f = Fixture::new();
    let vm = f.vm(&f.t1, None);
    f.events();

    // WHEN the cores are cleared, breaking the VM rule
    let input = ResourceInput::new(ResourceKind::Instance, f.t1.tenant);
    let err = f
        .store
        .update(&f.t1, &vm, &FieldMask::new(["vm_cpu_cores"]), &input)
        .unwrap_err();

    // THEN nothing changed
    assert_eq!(err.code(), Code::InvalidArgument);
    let got = f.store.get(&f.t1, &vm).unwrap().resource;
    assert_eq!(got.get("vm_cpu_cores"), Some(&Value::Int(4)));
    ExpectEvents::none().verify(&f.events());
}

// ========== TEST: relation_switch_clears_previous_target ==========
#[test]
fn test_relation_switch_clears_previous_target() {
    // GIVEN a schedule targeting a site
    let f = Fixture::new();
    let site = f.site(&f.t1, None);
    let region = f.region(&f.t1, "west", None);
    let schedule = f.create_id(
        &f.t1,
        ResourceInput::new(ResourceKind::SingleSchedule, f.t1.tenant)
            .field("start_seconds", 100)
            .edge("target_site", &site),
    );

    // WHEN only target_region is masked and set
    let input = ResourceInput::new(ResourceKind::SingleSchedule, f.t1.tenant).edge("target_region", &region);
    f.store
        .update(&f.t1, &schedule, &FieldMask::new(["target_region"]), &input)
        .unwrap();

    // THEN the site link is gone in the same transaction
    let got = f.store.get(&f.t1, &schedule).unwrap().resource;
    assert_eq!(got.edge("target_region"), Some(&region));
    assert!(got.edge("target_site").is_none());
}

#[test]
fn test_group_path_clears_every_member() {
    let f = Fixture::new();
    let site = f.site(&f.t1, None);
    let schedule = f.create_id(
        &f.t1,
        ResourceInput::new(ResourceKind::SingleSchedule, f.t1.tenant)
            .field("start_seconds", 100)
            .edge("target_site", &site),
    );

    let input = ResourceInput::new(ResourceKind::SingleSchedule, f.t1.tenant);
    f.store
        .update(&f.t1, &schedule, &FieldMask::new(["relation"]), &input)
        .unwrap();

    let got = f.store.get(&f.t1, &schedule).unwrap().resource;
    assert!(got.edge("target_site").is_none());
}

#[test]
fn test_two_relation_targets_rejected() {
    let f = Fixture::new();
    let site = f.site(&f.t1, None);
    let region = f.region(&f.t1, "west", None);
    let input = ResourceInput::new(ResourceKind::SingleSchedule, f.t1.tenant)
        .field("start_seconds", 100)
        .edge("target_site", &site)
        .edge("target_region", &region);

    expect_err(f.store.create(&f.t1, &input), Code::InvalidArgument);
}

#[test]
fn test_exclusive_host_claim() {
    let f = Fixture::new();
    let host = f.host(&f.t1, None);
    f.vm(&f.t1, Some(&host));

    let second = ResourceInput::new(ResourceKind::Instance, f.t1.tenant)
        .enum_field("kind", "INSTANCE_KIND_METAL")
        .edge("host", &host);

    expect_err(f.store.create(&f.t1, &second), Code::FailedPrecondition);
}

#[test]
fn test_client_resource_id_rejected_on_create() {
    let f = Fixture::new();
    let valid = ResourceId::generate(ResourceKind::Region).to_string();

    for id in [valid.as_str(), "not-an-id", ""] {
        let input = Fixture::region_input(&f.t1, "r", None).with_resource_id(id);
        expect_err(f.store.create(&f.t1, &input), Code::InvalidArgument);
    }
}

#[test]
fn test_create_then_get_round_trips() {
    let f = Fixture::new();
    let input = ResourceInput::new(ResourceKind::Site, f.t1.tenant)
        .field("name", "depot")
        .field("site_lat", 515_000_000)
        .field("address", "1 main st");

    let created = f.create(&f.t1, input.clone());
    let got = f.store.get(&f.t1, &created.resource.resource_id).unwrap();

    assert_eq!(got.resource, created.resource);
    assert_eq!(got.resource.fields, input.fields);
}
