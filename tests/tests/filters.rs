//! Filtering, ordering and pagination of List and Find.

use inv_tests::prelude::*;
use pretty_assertions::assert_eq;

/// Hosts h0..h3 with 8, 16, 24 and 32 cores; h0 and h1 sit in site "west".
fn fleet(f: &Fixture) -> Vec<ResourceId> {
    let region = f.region(&f.t1, "west", None);
    let site = f.site(&f.t1, Some(&region));
    (0..4)
        .map(|i| {
            let input = ResourceInput::new(ResourceKind::Host, f.t1.tenant)
                .field("name", format!("h{i}"))
                .field("cpu_cores", 8 * (i + 1));
            let input = if i < 2 { input.edge("site", &site) } else { input };
            f.create_id(&f.t1, input)
        })
        .collect()
}

fn names(page: &inv_store::ListPage) -> Vec<String> {
    page.items
        .iter()
        .filter_map(|h| match h.resource.get("name") {
            Some(Value::String(name)) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

fn list(f: &Fixture, request: ListRequest) -> inv_store::ListPage {
    f.store.list(&f.t1, ResourceKind::Host, &request).unwrap()
}

// ========== TEST: field_and_path_filters ==========
#[test]
fn test_field_and_path_filters() {
    let f = Fixture::new();
    fleet(&f);

    let by_name = list(&f, ListRequest::new().filter(r#"name = "h2""#));
    let by_path = list(&f, ListRequest::new().filter(r#"site.region.name = "west""#).order_by("name"));
    let unplaced = list(&f, ListRequest::new().filter("NOT has(site)").order_by("name"));
    let range = list(&f, ListRequest::new().filter("cpu_cores >= 16 AND cpu_cores != 32").order_by("name"));

    assert_eq!(names(&by_name), vec!["h2"]);
    assert_eq!(names(&by_path), vec!["h0", "h1"]);
    assert_eq!(names(&unplaced), vec!["h2", "h3"]);
    assert_eq!(names(&range), vec!["h1", "h2"]);
}

#[test]
fn test_enum_and_null_filters() {
    let f = Fixture::new();
    let hosts = fleet(&f);
    f.store.delete(&f.t1, &hosts[3]).unwrap();

    let pending = list(&f, ListRequest::new().filter("desired_state = HOST_STATE_DELETED"));
    let unset = list(&f, ListRequest::new().filter("desired_state = null"));

    assert_eq!(names(&pending), vec!["h3"]);
    assert_eq!(unset.total, 3);
}

#[test]
fn test_back_reference_filter() {
    let f = Fixture::new();
    fleet(&f);
    f.site(&f.t1, None);

    let sites = f
        .store
        .find(&f.t1, ResourceKind::Site, &ListRequest::new().filter("has(hosts)"))
        .unwrap();

    assert_eq!(sites.total, 1);
}

// ========== TEST: order_and_window ==========
#[test]
fn test_order_and_window() {
    // GIVEN four hosts
    let f = Fixture::new();
    fleet(&f);

    // WHEN ordered by cores descending, two from offset one
    let page = list(&f, ListRequest::new().order_by("cpu_cores desc").offset(1).limit(2));

    // THEN the window is h2, h1 and the total ignores it
    assert_eq!(names(&page), vec!["h2", "h1"]);
    assert_eq!(page.total, 4);
    assert!(page.has_next);

    let last = list(&f, ListRequest::new().order_by("cpu_cores desc").offset(3).limit(2));
    assert_eq!(names(&last), vec!["h0"]);
    assert!(!last.has_next);
}

// ========== TEST: offset_past_end_is_empty ==========
#[test]
fn test_offset_past_end_is_empty() {
    let f = Fixture::new();
    fleet(&f);
    let request = ListRequest::new().filter("has(site) OR NOT has(site)").offset(10).limit(0);

    let listed = list(&f, request.clone());
    let found = f.store.find(&f.t1, ResourceKind::Host, &request).unwrap();

    assert!(listed.items.is_empty());
    assert!(found.items.is_empty());
    assert_eq!(found.total, 4);
}

#[test]
fn test_limit_zero_returns_rest() {
    let f = Fixture::new();
    fleet(&f);

    let page = list(&f, ListRequest::new().offset(1).limit(0));

    assert_eq!(page.items.len(), 3);
    assert!(!page.has_next);
}

// ========== TEST: invalid_filters ==========
#[test]
fn test_invalid_filters() {
    let f = Fixture::new();
    let bad = [
        "colour = \"red\"",
        "site.planet = \"x\"",
        "name = ",
        "has(name)",
        "site.region.parent.parent.parent.parent.name = \"x\"",
    ];

    for filter in bad {
        let result = f.store.list(&f.t1, ResourceKind::Host, &ListRequest::new().filter(filter));
        expect_err(result, Code::InvalidArgument);
    }
}

#[test]
fn test_too_deep_path_mentions_depth() {
    let f = Fixture::new();
    let request = ListRequest::new().filter(r#"parent.parent.parent.parent.parent.parent.name = "x""#);

    let err = expect_err(f.store.find(&f.t1, ResourceKind::Region, &request), Code::InvalidArgument);

    assert!(err.to_string().contains("depth"), "{err}");
}

// ========== TEST: existence_depth_limit ==========
#[test]
fn test_existence_depth_limit() {
    // GIVEN a chain of three regions
    let f = Fixture::new();
    let chain = f.region_chain(&f.t1, 3);

    // WHEN testing for a grandparent
    let page = f
        .store
        .list(&f.t1, ResourceKind::Region, &ListRequest::new().filter("has(parent.parent)"))
        .unwrap();

    // THEN only the leaf matches
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].resource.resource_id, chain[2]);

    // AND six edges are rejected whether negated or not
    for filter in [
        "has(parent.parent.parent.parent.parent.parent)",
        "NOT has(parent.parent.parent.parent.parent.parent)",
    ] {
        let request = ListRequest::new().filter(filter);
        let err = expect_err(f.store.find(&f.t1, ResourceKind::Region, &request), Code::InvalidArgument);
        assert!(err.to_string().contains("depth"), "{err}");
    }
}

#[test]
fn test_unsortable_order_rejected() {
    let f = Fixture::new();

    expect_err(
        f.store.list(&f.t1, ResourceKind::Host, &ListRequest::new().order_by("memory_bytes")),
        Code::InvalidArgument,
    );
}

#[test]
fn test_list_hydrates_links() {
    let f = Fixture::new();
    fleet(&f);

    let page = list(&f, ListRequest::new().filter(r#"name = "h0""#));

    let site = page.items[0].linked_one("site").unwrap();
    let region = site.linked_one("region").unwrap();
    assert_eq!(region.resource.get("name"), Some(&Value::from("west")));
}
