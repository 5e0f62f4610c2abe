//! Ordered schema upgrade steps.
//!
//! Schema changes are modeled as an ordered list of `(version, step)` pairs
//! rather than ad hoc version bumps: the plan is replayed inside the upgrade
//! window of every version-raising open, applying exactly the steps newer
//! than the engine's stored version.

use shelfdb_engine::{EngineResult, UpgradeContext};
use std::collections::BTreeMap;

/// One schema change, applied during an upgrade window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStep {
    /// Create an object store keyed by `key_path`, if it does not exist.
    CreateStore {
        /// Store name.
        name: String,
        /// Primary key field.
        key_path: String,
    },
}

impl SchemaStep {
    fn apply(&self, ctx: &mut UpgradeContext<'_>) -> EngineResult<()> {
        match self {
            SchemaStep::CreateStore { name, key_path } => {
                // Re-adding an existing collection is a no-op, not an error.
                if ctx.contains_store(name) {
                    return Ok(());
                }
                ctx.create_store(name, key_path)
            }
        }
    }
}

/// An ordered plan of schema steps keyed by the version that introduces
/// each one.
#[derive(Debug, Clone, Default)]
pub struct SchemaPlan {
    steps: BTreeMap<u64, SchemaStep>,
}

impl SchemaPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `step` as the change introduced by `version`.
    pub fn insert(&mut self, version: u64, step: SchemaStep) {
        self.steps.insert(version, step);
    }

    /// Withdraws the step registered for `version`, if any.
    pub fn remove(&mut self, version: u64) {
        self.steps.remove(&version);
    }

    /// Number of registered steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Applies, in version order, every step newer than the stored version
    /// and no newer than the version being opened.
    pub fn apply(&self, ctx: &mut UpgradeContext<'_>) -> EngineResult<()> {
        for (version, step) in &self.steps {
            if *version > ctx.old_version() && *version <= ctx.new_version() {
                step.apply(ctx)?;
            }
        }
        Ok(())
    }
}
