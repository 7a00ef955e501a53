use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::ItemsetLength;

/// Cooperative cancellation flag shared between the caller and a mining run.
///
/// Clones observe the same flag. The level driver polls it between levels, so a
/// cancelled run stops after the level currently being counted.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub(crate) fn check(&self, level: ItemsetLength) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled { level })
        } else {
            Ok(())
        }
    }
}
