//! Identity types for inventory resources.
//!
//! - `RowId` is the opaque arena address of a stored row. Never exposed to clients.
//! - `ResourceId` is the external identifier, `<kind-prefix>-<8 lowercase hex>`.
//! - `TenantId` scopes every resource to exactly one tenant.

use crate::IdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Arena address of a stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

impl RowId {
    /// Create a new RowId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// The tag identifying which schema a resource carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Region,
    Site,
    OrganizationalUnit,
    Host,
    Instance,
    NetworkSegment,
    IpAddress,
    Netlink,
    SingleSchedule,
    RepeatedSchedule,
    TelemetryGroup,
    TelemetryProfile,
    Workload,
    WorkloadMember,
    Tenant,
}

impl ResourceKind {
    /// Every resource kind, in declaration order.
    pub const ALL: [ResourceKind; 15] = [
        ResourceKind::Region,
        ResourceKind::Site,
        ResourceKind::OrganizationalUnit,
        ResourceKind::Host,
        ResourceKind::Instance,
        ResourceKind::NetworkSegment,
        ResourceKind::IpAddress,
        ResourceKind::Netlink,
        ResourceKind::SingleSchedule,
        ResourceKind::RepeatedSchedule,
        ResourceKind::TelemetryGroup,
        ResourceKind::TelemetryProfile,
        ResourceKind::Workload,
        ResourceKind::WorkloadMember,
        ResourceKind::Tenant,
    ];

    /// Prefix used in resource ids of this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            ResourceKind::Region => "region",
            ResourceKind::Site => "site",
            ResourceKind::OrganizationalUnit => "ou",
            ResourceKind::Host => "host",
            ResourceKind::Instance => "inst",
            ResourceKind::NetworkSegment => "netseg",
            ResourceKind::IpAddress => "ipaddr",
            ResourceKind::Netlink => "netlink",
            ResourceKind::SingleSchedule => "singlesche",
            ResourceKind::RepeatedSchedule => "repeatedsche",
            ResourceKind::TelemetryGroup => "telemetrygroup",
            ResourceKind::TelemetryProfile => "telemetryprofile",
            ResourceKind::Workload => "workload",
            ResourceKind::WorkloadMember => "workloadmember",
            ResourceKind::Tenant => "tenant",
        }
    }

    /// Human-readable kind name.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Region => "Region",
            ResourceKind::Site => "Site",
            ResourceKind::OrganizationalUnit => "OrganizationalUnit",
            ResourceKind::Host => "Host",
            ResourceKind::Instance => "Instance",
            ResourceKind::NetworkSegment => "NetworkSegment",
            ResourceKind::IpAddress => "IpAddress",
            ResourceKind::Netlink => "Netlink",
            ResourceKind::SingleSchedule => "SingleSchedule",
            ResourceKind::RepeatedSchedule => "RepeatedSchedule",
            ResourceKind::TelemetryGroup => "TelemetryGroup",
            ResourceKind::TelemetryProfile => "TelemetryProfile",
            ResourceKind::Workload => "Workload",
            ResourceKind::WorkloadMember => "WorkloadMember",
            ResourceKind::Tenant => "Tenant",
        }
    }

    /// Look up a kind by its id prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.prefix() == prefix)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of hex digits in the random part of a resource id.
pub const RESOURCE_ID_HEX_LEN: usize = 8;

/// External resource identifier, `<kind-prefix>-<8 lowercase hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId {
    kind: ResourceKind,
    value: String,
}

impl ResourceId {
    /// Generate a fresh random id for a kind.
    pub fn generate(kind: ResourceKind) -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self {
            kind,
            value: format!("{}-{}", kind.prefix(), &random[..RESOURCE_ID_HEX_LEN]),
        }
    }

    /// Parse an id of any known kind.
    pub fn parse(input: &str) -> Result<Self, IdError> {
        let (prefix, suffix) = input.rsplit_once('-').ok_or_else(|| IdError::Malformed {
            id: input.to_string(),
        })?;

        let kind = ResourceKind::from_prefix(prefix).ok_or_else(|| IdError::UnknownPrefix {
            id: input.to_string(),
            prefix: prefix.to_string(),
        })?;

        let well_formed = suffix.len() == RESOURCE_ID_HEX_LEN
            && suffix
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !well_formed {
            return Err(IdError::Malformed {
                id: input.to_string(),
            });
        }

        Ok(Self {
            kind,
            value: input.to_string(),
        })
    }

    /// Parse an id and require it to belong to `kind`.
    pub fn parse_as(kind: ResourceKind, input: &str) -> Result<Self, IdError> {
        let id = Self::parse(input).map_err(|e| match e {
            IdError::UnknownPrefix { id, .. } => IdError::PrefixMismatch {
                id,
                expected: kind.prefix().to_string(),
            },
            other => other,
        })?;
        if id.kind != kind {
            return Err(IdError::PrefixMismatch {
                id: input.to_string(),
                expected: kind.prefix().to_string(),
            });
        }
        Ok(id)
    }

    /// The kind encoded in the prefix.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for ResourceId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.value
    }
}

/// Identifier of the tenant owning a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(Uuid);

impl TenantId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random tenant id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(input: &str) -> Result<Self, IdError> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| IdError::InvalidTenant {
                id: input.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
