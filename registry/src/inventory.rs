//! The default edge-fleet inventory schema.

use crate::{
    DeletePolicy, EdgeDef, FieldDef, Lineage, OnDelete, Registry, RegistryBuilder, RegistryResult,
};
use inv_core::{ResourceKind, ResourceView, CURRENT_STATE_FIELD, DESIRED_STATE_FIELD};

const NAME_MAX_LEN: usize = 64;
const UUID_PATTERN: &str = r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";
const IP_CIDR_PATTERN: &str = r"^([0-9]{1,3}\.){3}[0-9]{1,3}/[0-9]{1,2}$";

/// Lowest and highest assignable VLAN id.
pub const VLAN_RANGE: (i64, i64) = (1, 4094);

/// Relation group shared by schedules and telemetry profiles.
pub const RELATION_GROUP: &str = "relation";

/// Build the registry for every inventory resource kind.
pub fn inventory_registry() -> RegistryResult<Registry> {
    let mut b = RegistryBuilder::new();

    // ==================== Location ====================

    b.add_kind(ResourceKind::Region)
        .field(name())
        .field(FieldDef::string("region_kind").with_max_len(NAME_MAX_LEN))
        .field(FieldDef::metadata())
        .hierarchical("parent", "children")
        .lineage(Lineage::Physical)
        .inherits(Lineage::Physical, &[])
        .done()?;

    b.add_kind(ResourceKind::OrganizationalUnit)
        .field(name())
        .field(FieldDef::string("ou_kind").with_max_len(NAME_MAX_LEN))
        .field(FieldDef::metadata())
        .hierarchical("parent", "children")
        .lineage(Lineage::Logical)
        .inherits(Lineage::Logical, &[])
        .done()?;

    b.add_kind(ResourceKind::Site)
        .field(name())
        .field(FieldDef::string("address").with_max_len(1000))
        .field(FieldDef::int("site_lat").with_range(Some(-900_000_000), Some(900_000_000)))
        .field(FieldDef::int("site_lng").with_range(Some(-1_800_000_000), Some(1_800_000_000)))
        .field(FieldDef::metadata())
        .edge(EdgeDef::one("region", ResourceKind::Region).back_ref("sites"))
        .edge(EdgeDef::one("ou", ResourceKind::OrganizationalUnit).back_ref("sites"))
        .lineage(Lineage::Physical)
        .inherits(Lineage::Physical, &["region"])
        .done()?;

    // ==================== Compute ====================

    b.add_kind(ResourceKind::Host)
        .field(name())
        .field(
            FieldDef::string("uuid")
                .with_pattern(UUID_PATTERN)
                .unique()
                .immutable()
                .sortable(),
        )
        .field(FieldDef::string("serial_number").with_max_len(NAME_MAX_LEN).sortable())
        .field(FieldDef::int("cpu_cores").with_range(Some(0), None))
        .field(FieldDef::int("memory_bytes").with_range(Some(0), None))
        .field(FieldDef::enumeration(DESIRED_STATE_FIELD).sortable())
        .field(FieldDef::enumeration(CURRENT_STATE_FIELD).sortable())
        .enum_map(
            DESIRED_STATE_FIELD,
            state_map("HOST_STATE", &["ONBOARDED", "UNTRUSTED", "DELETED"]),
        )
        .enum_map(
            CURRENT_STATE_FIELD,
            state_map("HOST_STATE", &["ONBOARDED", "UNTRUSTED", "DELETED"]),
        )
        .edge(EdgeDef::one("site", ResourceKind::Site).back_ref("hosts"))
        .inherits(Lineage::Physical, &["site", "region"])
        .delete_policy(DeletePolicy::TwoPhase)
        .done()?;

    b.add_kind(ResourceKind::Instance)
        .field(name())
        .field(FieldDef::enumeration("kind").required().immutable().sortable())
        .field(FieldDef::int("vm_cpu_cores").with_range(Some(1), Some(1024)))
        .field(FieldDef::int("vm_memory_bytes").with_range(Some(1), None))
        .field(FieldDef::enumeration(DESIRED_STATE_FIELD).sortable())
        .field(FieldDef::enumeration(CURRENT_STATE_FIELD).sortable())
        .enum_map(
            "kind",
            [
                ("INSTANCE_KIND_UNSPECIFIED", ""),
                ("INSTANCE_KIND_VM", "VM"),
                ("INSTANCE_KIND_METAL", "METAL"),
            ],
        )
        .enum_map(
            DESIRED_STATE_FIELD,
            state_map("INSTANCE_STATE", &["RUNNING", "STOPPED", "UNTRUSTED", "DELETED"]),
        )
        .enum_map(
            CURRENT_STATE_FIELD,
            state_map("INSTANCE_STATE", &["RUNNING", "STOPPED", "UNTRUSTED", "DELETED"]),
        )
        .edge(EdgeDef::one("host", ResourceKind::Host).exclusive().back_ref("instance"))
        .inherits(Lineage::Physical, &["host", "site", "region"])
        .delete_policy(DeletePolicy::TwoPhase)
        .validator(validate_instance_kind)
        .done()?;

    // ==================== Network ====================

    b.add_kind(ResourceKind::NetworkSegment)
        .field(name())
        .field(FieldDef::int("vlan_id").required().unique().sortable())
        .edge(EdgeDef::one("site", ResourceKind::Site).back_ref("network_segments"))
        .validator(validate_vlan)
        .done()?;

    b.add_kind(ResourceKind::IpAddress)
        .field(FieldDef::string("address").required().with_pattern(IP_CIDR_PATTERN).sortable())
        .field(FieldDef::enumeration(DESIRED_STATE_FIELD).sortable())
        .field(FieldDef::enumeration(CURRENT_STATE_FIELD).sortable())
        .enum_map(
            DESIRED_STATE_FIELD,
            state_map("IP_ADDRESS_STATE", &["CONFIGURED", "DELETED"]),
        )
        .enum_map(
            CURRENT_STATE_FIELD,
            state_map("IP_ADDRESS_STATE", &["CONFIGURED", "DELETED"]),
        )
        .edge(
            EdgeDef::one("network_segment", ResourceKind::NetworkSegment)
                .back_ref("ip_addresses"),
        )
        .delete_policy(DeletePolicy::TwoPhase)
        .done()?;

    b.add_kind(ResourceKind::Netlink)
        .field(name())
        .field(FieldDef::enumeration(DESIRED_STATE_FIELD).sortable())
        .field(FieldDef::enumeration(CURRENT_STATE_FIELD).sortable())
        .enum_map(
            DESIRED_STATE_FIELD,
            state_map("NETWORK_LINK_STATE", &["ONLINE", "OFFLINE", "DELETED"]),
        )
        .enum_map(
            CURRENT_STATE_FIELD,
            state_map("NETWORK_LINK_STATE", &["ONLINE", "OFFLINE", "DELETED"]),
        )
        .edge(EdgeDef::one("source_host", ResourceKind::Host).back_ref("outgoing_links"))
        .edge(EdgeDef::one("destination_host", ResourceKind::Host).back_ref("incoming_links"))
        .delete_policy(DeletePolicy::TwoPhase)
        .done()?;

    // ==================== Schedules ====================

    let status = [
        ("SCHEDULE_STATUS_UNSPECIFIED", ""),
        ("SCHEDULE_STATUS_MAINTENANCE", "MAINTENANCE"),
        ("SCHEDULE_STATUS_OS_UPDATE", "OS_UPDATE"),
    ];

    let single = b
        .add_kind(ResourceKind::SingleSchedule)
        .field(name())
        .field(FieldDef::enumeration("schedule_status").sortable())
        .enum_map("schedule_status", status)
        .field(FieldDef::int("start_seconds").required().with_range(Some(0), None).sortable())
        .field(FieldDef::int("end_seconds").with_range(Some(0), None).sortable())
        .validator(validate_single_schedule);
    relation_targets(single, "single_schedules").done()?;

    let repeated = b
        .add_kind(ResourceKind::RepeatedSchedule)
        .field(name())
        .field(FieldDef::enumeration("schedule_status").sortable())
        .enum_map("schedule_status", status)
        .field(
            FieldDef::int("duration_seconds")
                .required()
                .with_range(Some(1), Some(86_400)),
        )
        .field(FieldDef::string("cron_minutes").required())
        .field(FieldDef::string("cron_hours").required())
        .field(FieldDef::string("cron_day_month").required())
        .field(FieldDef::string("cron_month").required())
        .field(FieldDef::string("cron_day_week").required())
        .validator(validate_cron);
    relation_targets(repeated, "repeated_schedules").done()?;

    // ==================== Telemetry ====================

    let telemetry_kind = [
        ("TELEMETRY_RESOURCE_KIND_UNSPECIFIED", ""),
        ("TELEMETRY_RESOURCE_KIND_METRICS", "METRICS"),
        ("TELEMETRY_RESOURCE_KIND_LOGS", "LOGS"),
    ];

    b.add_kind(ResourceKind::TelemetryGroup)
        .field(name())
        .field(FieldDef::enumeration("kind").required().immutable().sortable())
        .enum_map("kind", telemetry_kind)
        .field(FieldDef::enumeration("collector_kind").sortable())
        .enum_map(
            "collector_kind",
            [
                ("COLLECTOR_KIND_UNSPECIFIED", ""),
                ("COLLECTOR_KIND_HOST", "HOST"),
                ("COLLECTOR_KIND_CLUSTER", "CLUSTER"),
            ],
        )
        .field(FieldDef::string("groups").with_max_len(1000))
        .done()?;

    b.add_kind(ResourceKind::TelemetryProfile)
        .field(FieldDef::enumeration("kind").required().sortable())
        .enum_map("kind", telemetry_kind)
        .field(FieldDef::int("metrics_interval").with_range(Some(1), Some(3600)).sortable())
        .field(FieldDef::enumeration("log_level").sortable())
        .enum_map(
            "log_level",
            [
                ("SEVERITY_LEVEL_UNSPECIFIED", ""),
                ("SEVERITY_LEVEL_CRITICAL", "CRITICAL"),
                ("SEVERITY_LEVEL_ERROR", "ERROR"),
                ("SEVERITY_LEVEL_WARN", "WARN"),
                ("SEVERITY_LEVEL_INFO", "INFO"),
                ("SEVERITY_LEVEL_DEBUG", "DEBUG"),
            ],
        )
        .edge(
            EdgeDef::one("group", ResourceKind::TelemetryGroup)
                .required()
                .back_ref("profiles"),
        )
        .edge(target("target_instance", ResourceKind::Instance, "telemetry_profiles"))
        .edge(target("target_host", ResourceKind::Host, "telemetry_profiles"))
        .edge(target("target_site", ResourceKind::Site, "telemetry_profiles"))
        .edge(target("target_region", ResourceKind::Region, "telemetry_profiles"))
        .validator(validate_telemetry_profile)
        .done()?;

    // ==================== Workloads ====================

    b.add_kind(ResourceKind::Workload)
        .field(name())
        .field(FieldDef::enumeration("kind").required().immutable().sortable())
        .enum_map(
            "kind",
            [
                ("WORKLOAD_KIND_UNSPECIFIED", ""),
                ("WORKLOAD_KIND_CLUSTER", "CLUSTER"),
                ("WORKLOAD_KIND_DHCP", "DHCP"),
            ],
        )
        .field(FieldDef::string("external_id").with_max_len(NAME_MAX_LEN).unique().sortable())
        .field(FieldDef::enumeration(DESIRED_STATE_FIELD).sortable())
        .field(FieldDef::enumeration(CURRENT_STATE_FIELD).sortable())
        .enum_map(
            DESIRED_STATE_FIELD,
            state_map("WORKLOAD_STATE", &["PROVISIONED", "ERROR", "DELETED"]),
        )
        .enum_map(
            CURRENT_STATE_FIELD,
            state_map("WORKLOAD_STATE", &["PROVISIONED", "ERROR", "DELETED"]),
        )
        .delete_policy(DeletePolicy::TwoPhase)
        .done()?;

    b.add_kind(ResourceKind::WorkloadMember)
        .field(FieldDef::enumeration("kind").required().immutable())
        .enum_map(
            "kind",
            [
                ("WORKLOAD_MEMBER_KIND_UNSPECIFIED", ""),
                ("WORKLOAD_MEMBER_KIND_CLUSTER_NODE", "CLUSTER_NODE"),
            ],
        )
        .edge(
            EdgeDef::one("workload", ResourceKind::Workload)
                .required()
                .back_ref("members"),
        )
        .edge(
            EdgeDef::one("instance", ResourceKind::Instance)
                .required()
                .back_ref("workload_members"),
        )
        .done()?;

    // ==================== Tenant ====================

    b.add_kind(ResourceKind::Tenant)
        .field(FieldDef::bool("watcher_osmanager").with_default(false.into()))
        .field(FieldDef::enumeration(DESIRED_STATE_FIELD).sortable())
        .field(FieldDef::enumeration(CURRENT_STATE_FIELD).sortable())
        .enum_map(DESIRED_STATE_FIELD, state_map("TENANT_STATE", &["CREATED", "DELETED"]))
        .enum_map(CURRENT_STATE_FIELD, state_map("TENANT_STATE", &["CREATED", "DELETED"]))
        .delete_policy(DeletePolicy::TwoPhase)
        .done()?;

    b.build()
}

fn name() -> FieldDef {
    FieldDef::string("name").with_max_len(NAME_MAX_LEN).sortable()
}

fn target(name: &str, kind: ResourceKind, back_ref: &str) -> EdgeDef {
    EdgeDef::one(name, kind)
        .oneof(RELATION_GROUP)
        .on_delete(OnDelete::Unlink)
        .back_ref(back_ref)
}

fn relation_targets<'a>(
    kind: crate::KindBuilder<'a>,
    back_ref: &str,
) -> crate::KindBuilder<'a> {
    kind.edge(target("target_host", ResourceKind::Host, back_ref))
        .edge(target("target_site", ResourceKind::Site, back_ref))
        .edge(target("target_region", ResourceKind::Region, back_ref))
        .edge(target("target_workload", ResourceKind::Workload, back_ref))
}

fn state_map(prefix: &str, states: &[&str]) -> Vec<(String, String)> {
    let mut entries = vec![(format!("{prefix}_UNSPECIFIED"), String::new())];
    entries.extend(
        states
            .iter()
            .map(|s| (format!("{prefix}_{s}"), s.to_string())),
    );
    entries
}

// ==================== Validators ====================

fn validate_instance_kind(r: &dyn ResourceView) -> Result<(), String> {
    let has_vm_fields = r.is_set("vm_cpu_cores") || r.is_set("vm_memory_bytes");
    match r.enum_value("kind") {
        Some("METAL") => {
            if has_vm_fields {
                return Err("bare-metal instance must not set vm_cpu_cores or vm_memory_bytes".into());
            }
            if !r.has_link("host") {
                return Err("bare-metal instance requires a host".into());
            }
            Ok(())
        }
        Some("VM") => {
            if !(r.is_set("vm_cpu_cores") && r.is_set("vm_memory_bytes")) {
                return Err("vm instance requires vm_cpu_cores and vm_memory_bytes".into());
            }
            Ok(())
        }
        _ => Err("instance kind must be set".into()),
    }
}

fn validate_vlan(r: &dyn ResourceView) -> Result<(), String> {
    let (min, max) = VLAN_RANGE;
    match r.int("vlan_id") {
        Some(vlan) if (min..=max).contains(&vlan) => Ok(()),
        Some(vlan) => Err(format!("vlan_id {vlan} out of range {min}-{max}")),
        None => Err("vlan_id is required".into()),
    }
}

fn validate_single_schedule(r: &dyn ResourceView) -> Result<(), String> {
    match (r.int("start_seconds"), r.int("end_seconds")) {
        (Some(start), Some(end)) if end <= start => Err(format!(
            "end_seconds {end} must be after start_seconds {start}"
        )),
        _ => Ok(()),
    }
}

fn validate_telemetry_profile(r: &dyn ResourceView) -> Result<(), String> {
    match r.enum_value("kind") {
        Some("METRICS") if !r.is_set("metrics_interval") => {
            Err("metrics profile requires metrics_interval".into())
        }
        Some("LOGS") if !r.is_set("log_level") => Err("logs profile requires log_level".into()),
        Some(_) => Ok(()),
        None => Err("telemetry profile kind must be set".into()),
    }
}

/// Cron fields and their inclusive ranges.
const CRON_FIELDS: [(&str, u32, u32); 5] = [
    ("cron_minutes", 0, 59),
    ("cron_hours", 0, 23),
    ("cron_day_month", 1, 31),
    ("cron_month", 1, 12),
    ("cron_day_week", 0, 6),
];

fn validate_cron(r: &dyn ResourceView) -> Result<(), String> {
    for (field, min, max) in CRON_FIELDS {
        let expr = r
            .string(field)
            .ok_or_else(|| format!("{field} is required"))?;
        if !cron_field_valid(expr, min, max) {
            return Err(format!("{field} {expr:?} is not a valid cron field ({min}-{max})"));
        }
    }
    Ok(())
}

/// Accepts `*`, `n`, `a-b`, each optionally with `/step`, joined by commas.
fn cron_field_valid(expr: &str, min: u32, max: u32) -> bool {
    let in_range = |s: &str| s.parse::<u32>().is_ok_and(|n| (min..=max).contains(&n));

    !expr.is_empty()
        && expr.split(',').all(|part| {
            let (base, step) = match part.split_once('/') {
                Some((base, step)) => (base, Some(step)),
                None => (part, None),
            };
            if let Some(step) = step {
                if !step.parse::<u32>().is_ok_and(|n| n >= 1 && n <= max) {
                    return false;
                }
            }
            match base.split_once('-') {
                _ if base == "*" => true,
                Some((lo, hi)) => {
                    in_range(lo) && in_range(hi) && lo.parse::<u32>().ok() <= hi.parse::<u32>().ok()
                }
                None => in_range(base),
            }
        })
}
