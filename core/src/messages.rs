//! Common error messages shared across inventory components.
//!
//! Calling layers match on some of these substrings, so they are kept stable.

/// Error: update attempted to change the owning tenant.
pub const ERR_TENANT_UPDATE: &str = "tenant update is not allowed: tenant_id is immutable";

/// Error: create payload tenant differs from the request tenant.
pub const ERR_TENANT_MISMATCH: &str = "payload tenant_id does not match the request tenant";

/// Error: client supplied an id on create.
pub const ERR_RESOURCE_ID_ON_CREATE: &str = "resource_id must not be set on create";

/// Error: update without a field mask.
pub const ERR_EMPTY_FIELD_MASK: &str = "field mask must not be empty";

/// Error: full-replace update requested.
pub const ERR_FULL_REPLACE: &str = "full replace is not supported; list the paths to update";

/// Error: payload kind differs from the kind of the addressed resource.
pub const ERR_KIND_MISMATCH: &str = "payload kind does not match the resource kind";
