//! Per-user action history, fetched on demand.
//!
//! Read-only and independent of the directory table. Each `open` supersedes
//! the previous one, and `close` cancels whatever is still in flight.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chaos_states::{Notices, RequestStream, TaskHandle};
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::error::ApiResult;
use crate::model::ActionHistoryEntry;
use crate::session::SessionManager;
use crate::transport::Transport;

pub const HISTORY_FAILED: &str = "Failed to load history";

/// GET `/api/Admin/users/{id}/history`
pub async fn fetch_history(
    transport: &Transport,
    user_id: &str,
) -> ApiResult<Vec<ActionHistoryEntry>> {
    let path = format!("/api/Admin/users/{}/history", user_id.trim());
    transport.send_json(transport.get(&path)).await
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryView {
    /// User whose history is open, `None` when closed.
    pub user_id: Option<String>,
    /// In server order.
    pub entries: Vec<ActionHistoryEntry>,
    pub loading: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct HistoryState {
    view: HistoryView,
    in_flight: Option<TaskHandle>,
}

#[derive(Debug, Clone)]
pub struct ActionHistory {
    state: Arc<Mutex<HistoryState>>,
    session: SessionManager,
    notices: Notices,
    stream: RequestStream,
}

impl ActionHistory {
    pub fn new(session: SessionManager, notices: Notices) -> Self {
        Self {
            state: Arc::new(Mutex::new(HistoryState::default())),
            session,
            notices,
            stream: RequestStream::new("history"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> HistoryView {
        self.lock().view.clone()
    }

    /// Shows the history of `user_id`, replacing whatever was open.
    pub async fn open(&self, user_id: &str) {
        let handle = TaskHandle::new(self.stream.issue(), CancellationToken::new());
        let cancelled = handle.cancellation_token();
        {
            let mut state = self.lock();
            if let Some(previous) = state.in_flight.replace(handle.clone()) {
                previous.cancel();
            }
            state.view = HistoryView {
                user_id: Some(user_id.to_owned()),
                entries: Vec::new(),
                loading: true,
                last_error: None,
            };
        }

        let result = tokio::select! {
            biased;
            () = cancelled.cancelled() => {
                debug!("history {}: closed before the response arrived", handle.id());
                return;
            }
            result = fetch_history(self.session.transport(), user_id) => result,
        };

        if handle.is_cancelled() || !self.stream.is_latest(handle.id()) {
            return;
        }

        match result {
            Ok(entries) => {
                info!("history {}: {} entries", handle.id(), entries.len());
                let mut state = self.lock();
                state.view.entries = entries;
                state.view.loading = false;
                state.in_flight = None;
            }
            Err(e) if e.is_auth_failure() => {
                warn!("history {}: {e}", handle.id());
                self.close();
                self.session.force_deauth();
            }
            Err(e) => {
                warn!("history {}: {e}", handle.id());
                let message = e.user_message(HISTORY_FAILED);
                {
                    let mut state = self.lock();
                    state.view.loading = false;
                    state.view.last_error = Some(message.clone());
                    state.in_flight = None;
                }
                self.notices.error(message);
            }
        }
    }

    /// Discards the open history. A fetch still in flight is never applied.
    pub fn close(&self) {
        let mut state = self.lock();
        if let Some(in_flight) = state.in_flight.take() {
            in_flight.cancel();
        }
        self.stream.invalidate();
        state.view = HistoryView::default();
    }
}
