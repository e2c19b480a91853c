//! Field masks for partial update.

use inv_registry::{EdgeDef, FieldDef, KindDef};

use crate::error::{MutationError, MutationResult};

/// Paths every resource carries that no update may touch.
const SERVER_PATHS: [&str; 3] = ["resource_id", "created_at", "updated_at"];

const TENANT_PATH: &str = "tenant_id";

const FULL_REPLACE_PATH: &str = "*";

/// The explicit list of paths an update may modify.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMask {
    paths: Vec<String>,
}

impl FieldMask {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Checks that need no schema: emptiness, full replace, tenant change.
    pub fn check_shape(&self) -> MutationResult<()> {
        if self.paths.is_empty() {
            return Err(MutationError::EmptyFieldMask);
        }
        if self.paths.iter().any(|p| p == FULL_REPLACE_PATH) {
            return Err(MutationError::FullReplace);
        }
        if self.paths.iter().any(|p| p == TENANT_PATH) {
            return Err(MutationError::TenantUpdate);
        }
        Ok(())
    }

    /// Resolve each path against the kind. Duplicates collapse.
    pub(crate) fn resolve<'d>(&self, def: &'d KindDef) -> MutationResult<Vec<MaskPath<'d>>> {
        self.check_shape()?;

        let mut resolved = Vec::new();
        let mut seen: Vec<&str> = Vec::new();
        for path in &self.paths {
            let path = path.trim();
            if seen.contains(&path) {
                continue;
            }
            seen.push(path);

            if SERVER_PATHS.contains(&path) {
                return Err(MutationError::immutable_path(path));
            }
            if let Some(field) = def.get_field(path) {
                if field.immutable {
                    return Err(MutationError::immutable_path(path));
                }
                resolved.push(MaskPath::Field(field));
            } else if let Some(edge) = def.get_edge(path) {
                resolved.push(MaskPath::Edge(edge));
            } else if def.is_oneof_group(path) {
                resolved.push(MaskPath::Group(def.oneof_members(path)));
            } else {
                return Err(MutationError::unknown_field(def.kind, path));
            }
        }
        Ok(resolved)
    }
}

impl<S: Into<String>> FromIterator<S> for FieldMask {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A mask path bound to the kind's schema.
#[derive(Debug)]
pub(crate) enum MaskPath<'d> {
    Field(&'d FieldDef),
    Edge(&'d EdgeDef),
    /// A one-of group touches every member edge.
    Group(Vec<&'d EdgeDef>),
}
