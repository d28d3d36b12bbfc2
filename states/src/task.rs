//! Task identity and cooperative cancellation.
//!
//! - `TaskId`: identifies one request issued on a logical stream, combining the
//!   stream name with a generation counter
//! - `TaskHandle`: pairs a `TaskId` with a `CancellationToken` so the owner of a
//!   view can drop interest in a request that is still in flight
//!
//! ```ignore
//! use chaos_states::{RequestStream, TaskHandle};
//! use tokio_util::sync::CancellationToken;
//!
//! let stream = RequestStream::new("history");
//! let handle = TaskHandle::new(stream.issue(), CancellationToken::new());
//!
//! // The view closed before the response arrived.
//! handle.cancel();
//! ```

use std::fmt;

use tokio_util::sync::CancellationToken;

/// Identifier of one request issued on a [`RequestStream`](crate::RequestStream).
///
/// Higher generations were issued later. Two ids are only comparable when they
/// come from the same stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    stream: &'static str,
    generation: u64,
}

impl TaskId {
    /// Creates a new `TaskId` for the given stream and generation.
    pub fn new(stream: &'static str, generation: u64) -> Self {
        Self { stream, generation }
    }

    /// Name of the stream that issued this id.
    pub fn stream(&self) -> &'static str {
        self.stream
    }

    /// Generation counter of this id.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.stream, self.generation)
    }
}

/// Handle to an in-flight request with cooperative cancellation.
///
/// Cancelling does not abort the network call. It marks the result as
/// unwanted; the task checks `is_cancelled()` before applying anything.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    /// Creates a new `TaskHandle` with the given id and cancellation token.
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns a clone of the cancellation token, for the async side of the task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Marks the task's result as unwanted.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
