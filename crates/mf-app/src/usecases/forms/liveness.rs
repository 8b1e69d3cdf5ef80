use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Mounted flag of a form session.
///
/// Cloned into whatever outlives a single call; once closed it never opens
/// again.
#[derive(Debug, Clone)]
pub struct SessionLiveness {
    mounted: Arc<AtomicBool>,
}

impl SessionLiveness {
    pub fn mounted() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn close(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

impl Default for SessionLiveness {
    fn default() -> Self {
        Self::mounted()
    }
}
