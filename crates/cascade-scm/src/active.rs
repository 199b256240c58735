//! Shared ownership of the most recently fitted model.
//!
//! Fitting produces a new [`ScmModel`]; queries run against an immutable
//! snapshot. `ActiveModel` is the single writer slot that swaps snapshots
//! atomically: readers holding an `Arc` from before a swap keep a
//! consistent model for the lifetime of their query.

use std::sync::{Arc, RwLock};

use cascade_core::errors::{CascadeError, CascadeResult};

use crate::model::ScmModel;

/// A swap-on-fit slot for the current model.
#[derive(Debug, Default)]
pub struct ActiveModel {
    slot: RwLock<Option<Arc<ScmModel>>>,
}

impl ActiveModel {
    /// An empty slot: no model has been fitted or loaded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new model, returning the shared handle now being served.
    pub fn replace(&self, model: ScmModel) -> CascadeResult<Arc<ScmModel>> {
        let handle = Arc::new(model);
        let mut slot = self
            .slot
            .write()
            .map_err(|e| CascadeError::Concurrency(e.to_string()))?;
        *slot = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// The currently served model, if any.
    pub fn current(&self) -> CascadeResult<Option<Arc<ScmModel>>> {
        let slot = self
            .slot
            .read()
            .map_err(|e| CascadeError::Concurrency(e.to_string()))?;
        Ok(slot.clone())
    }

    /// Remove the served model. In-flight readers keep their snapshots.
    pub fn clear(&self) -> CascadeResult<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|e| CascadeError::Concurrency(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}
