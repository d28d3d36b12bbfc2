//! Per-stream request sequencing.
//!
//! Every logical stream (table fetches, bulk actions, session calls, history
//! lookups) owns one `RequestStream`. Each request takes a [`TaskId`] from it
//! before suspending on the network; when the response comes back it is applied
//! only if that id is still the latest one issued. Anything older is stale and
//! dropped, so the last request always wins regardless of arrival order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::TaskId;

#[derive(Debug, Clone)]
pub struct RequestStream {
    name: &'static str,
    latest: Arc<AtomicU64>,
}

impl RequestStream {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Issues the next id. Every id issued before it becomes stale.
    pub fn issue(&self) -> TaskId {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        TaskId::new(self.name, generation)
    }

    /// Generation of the most recently issued id, `0` if none was issued.
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Whether a response for `id` may still be applied.
    pub fn is_latest(&self, id: TaskId) -> bool {
        let fresh = id.stream() == self.name && id.generation() == self.latest();
        if !fresh {
            debug!(
                "{}: dropping stale response {} (latest is {})",
                self.name,
                id,
                self.latest()
            );
        }
        fresh
    }

    /// Makes every outstanding id stale without issuing a new request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
