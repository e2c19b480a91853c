//! Soft then hard deletion of kinds reconciled by an external controller.

use inv_tests::prelude::*;

fn mark_current_deleted(f: &Fixture, ctx: &RequestContext, host: &ResourceId) -> Result<(), StoreError> {
    let input = ResourceInput::new(ResourceKind::Host, ctx.tenant)
        .enum_field("current_state", "HOST_STATE_DELETED");
    f.store
        .update(ctx, host, &FieldMask::new(["current_state"]), &input)
        .map(|_| ())
}

// ========== TEST: soft_then_hard ==========
#[test]
fn test_soft_then_hard() {
    // GIVEN a host
    let f = Fixture::new();
    let host = f.host(&f.t1, None);

    // WHEN it is deleted
    assert_eq!(f.store.delete(&f.t1, &host).unwrap(), DeleteStatus::Pending);

    // THEN it stays readable with its desired state set
    let got = f.store.get(&f.t1, &host).unwrap();
    assert_eq!(
        got.resource.get("desired_state"),
        Some(&Value::Enum("HOST_STATE_DELETED".into()))
    );

    // WHEN the controller reports it gone
    mark_current_deleted(&f, &f.t1, &host).unwrap();

    // THEN it is removed
    expect_err(f.store.get(&f.t1, &host), Code::NotFound);
    ExpectEvents::new()
        .sequence(&[EventKind::Created, EventKind::Updated, EventKind::Deleted])
        .verify(&f.events());
}

// ========== TEST: repeated_delete_is_reported ==========
#[test]
fn test_repeated_delete_is_reported() {
    // GIVEN a host already marked for deletion
    let f = Fixture::new();
    let host = f.host(&f.t1, None);
    f.store.delete(&f.t1, &host).unwrap();
    f.events();

    // WHEN deleted again
    let status = f.store.delete(&f.t1, &host).unwrap();

    // THEN the caller learns nothing changed AND no event is published
    assert_eq!(status, DeleteStatus::AlreadyPending);
    ExpectEvents::none().verify(&f.events());

    // AND once removed, a further delete is NotFound
    mark_current_deleted(&f, &f.t1, &host).unwrap();
    expect_err(f.store.delete(&f.t1, &host), Code::NotFound);
}

#[test]
fn test_delete_after_controller_removes() {
    // GIVEN a host whose controller already reports it deleted
    let f = Fixture::new();
    let host = f.host(&f.t1, None);
    mark_current_deleted(&f, &f.t1, &host).unwrap();
    assert!(f.store.get(&f.t1, &host).is_ok());

    // WHEN deleted
    let status = f.store.delete(&f.t1, &host).unwrap();

    // THEN removal is immediate
    assert_eq!(status, DeleteStatus::Removed);
    expect_err(f.store.get(&f.t1, &host), Code::NotFound);
}

#[test]
fn test_pending_host_still_holds_its_site() {
    // GIVEN a host placed on a site, then soft deleted
    let f = Fixture::new();
    let site = f.site(&f.t1, None);
    let host = f.host(&f.t1, Some(&site));
    f.store.delete(&f.t1, &host).unwrap();

    // THEN the site is still referenced
    let err = expect_err(f.store.delete(&f.t1, &site), Code::FailedPrecondition);
    assert!(err.to_string().contains("hosts"), "{err}");

    // AND after the host is gone the site can be removed
    mark_current_deleted(&f, &f.t1, &host).unwrap();
    assert_eq!(f.store.delete(&f.t1, &site).unwrap(), DeleteStatus::Removed);
}

#[test]
fn test_removed_resource_reports_final_image() {
    let f = Fixture::new();
    let host = f.host(&f.t1, None);
    f.store.delete(&f.t1, &host).unwrap();

    let input = ResourceInput::new(ResourceKind::Host, f.t1.tenant)
        .enum_field("current_state", "HOST_STATE_DELETED");
    let last = f
        .store
        .update(&f.t1, &host, &FieldMask::new(["current_state"]), &input)
        .unwrap();

    assert_eq!(last.resource.resource_id, host);
    assert_eq!(
        last.resource.get("current_state"),
        Some(&Value::Enum("HOST_STATE_DELETED".into()))
    );
}
