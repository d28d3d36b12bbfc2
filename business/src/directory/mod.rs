//! The user directory: a server-paged table with selection and bulk actions.
//!
//! Every table fetch takes a ticket from the `table` stream and every bulk
//! action from the `bulk` stream; only the latest response of each stream is
//! applied. The state lock is never held across a network call.

mod api;
mod query;
mod selection;

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chaos_states::{Notices, RequestStream};
use log::{debug, info, warn};

use crate::model::DirectoryRow;
use crate::session::SessionManager;

pub use query::{
    DEFAULT_PAGE_SIZE, Filters, QueryChange, QueryState, RequestDescriptor, SortGesture,
    SortOrder, TableGesture,
};
pub use selection::BulkAction;

pub const FETCH_FAILED: &str = "Failed to fetch users";

/// Everything the table view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryView {
    pub query: QueryState,
    /// Rows of the last successful fetch, replaced wholesale.
    pub rows: Vec<DirectoryRow>,
    /// Always a subset of the ids in `rows`.
    pub selection: BTreeSet<String>,
    pub loading: bool,
    /// False once a selection or mutation may have made `query.total` stale.
    pub total_is_fresh: bool,
    pub action_in_progress: bool,
    pub last_error: Option<String>,
}

impl DirectoryView {
    fn prune_selection(&mut self) {
        let rows = &self.rows;
        self.selection
            .retain(|id| rows.iter().any(|row| &row.id == id));
    }
}

#[derive(Debug, Clone)]
pub struct UserDirectory {
    view: Arc<Mutex<DirectoryView>>,
    session: SessionManager,
    notices: Notices,
    table: RequestStream,
    bulk: RequestStream,
}

impl UserDirectory {
    pub fn new(session: SessionManager, notices: Notices) -> Self {
        Self {
            view: Arc::new(Mutex::new(DirectoryView::default())),
            session,
            notices,
            table: RequestStream::new("table"),
            bulk: RequestStream::new("bulk"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DirectoryView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> DirectoryView {
        self.lock().clone()
    }

    pub fn current_state(&self) -> QueryState {
        self.lock().query.clone()
    }

    pub fn rows(&self) -> Vec<DirectoryRow> {
        self.lock().rows.clone()
    }

    pub fn selection(&self) -> BTreeSet<String> {
        self.lock().selection.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Applies a table interaction and fetches once if it changed the query.
    pub async fn on_user_gesture(&self, gesture: TableGesture) -> QueryChange {
        let change = {
            let mut view = self.lock();
            let change = view.query.apply(gesture);
            if change == QueryChange::Resized {
                view.rows.clear();
                view.selection.clear();
            }
            change
        };

        if change == QueryChange::Unchanged {
            debug!("on_user_gesture: query unchanged, not fetching");
            return change;
        }
        self.fetch().await;
        change
    }

    /// Fetches the current query again.
    pub async fn refresh(&self) {
        self.fetch().await;
    }

    async fn fetch(&self) {
        let ticket = self.table.issue();
        let descriptor = {
            let mut view = self.lock();
            view.loading = true;
            view.query.descriptor()
        };
        debug!("fetch {ticket}: {descriptor:?}");

        let result = api::list_users(self.session.transport(), &descriptor).await;

        if !self.table.is_latest(ticket) {
            return;
        }

        match result {
            Ok(page) => {
                info!(
                    "fetch {ticket}: {} rows of {} on page {}",
                    page.items.len(),
                    page.total,
                    descriptor.page
                );
                let mut view = self.lock();
                view.rows = page.items;
                view.query.total = page.total;
                view.total_is_fresh = true;
                view.loading = false;
                view.last_error = None;
                view.prune_selection();
            }
            Err(e) if e.is_auth_failure() => {
                warn!("fetch {ticket}: {e}");
                self.drop_unauthorized();
            }
            Err(e) => {
                warn!("fetch {ticket}: {e}");
                let message = e.user_message(FETCH_FAILED);
                {
                    let mut view = self.lock();
                    view.loading = false;
                    view.last_error = Some(message.clone());
                }
                self.notices.error(message);
            }
        }
    }

    /// Clears what the operator may no longer see and signs out.
    fn drop_unauthorized(&self) {
        {
            let mut view = self.lock();
            view.rows.clear();
            view.selection.clear();
            view.loading = false;
            view.action_in_progress = false;
        }
        self.session.force_deauth();
    }
}
