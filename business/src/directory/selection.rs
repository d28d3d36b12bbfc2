//! Row selection and the bulk actions that consume it.

use std::collections::BTreeSet;

use log::{debug, info, warn};

use super::{UserDirectory, api};

/// A server-side mutation of several users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Block,
    Unblock,
    Delete,
    /// Acts on a server predicate; takes no ids.
    DeleteUnverified,
}

impl BulkAction {
    pub fn success_message(self) -> &'static str {
        match self {
            Self::Block => "Users blocked successfully",
            Self::Unblock => "Users unblocked successfully",
            Self::Delete => "Users deleted successfully",
            Self::DeleteUnverified => "Unverified users deleted successfully",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Block => "Failed to block users",
            Self::Unblock => "Failed to unblock users",
            Self::Delete => "Failed to delete users",
            Self::DeleteUnverified => "Operation failed",
        }
    }

    fn operation(self) -> Option<&'static str> {
        match self {
            Self::Block => Some("block"),
            Self::Unblock => Some("unblock"),
            Self::Delete => Some("delete"),
            Self::DeleteUnverified => None,
        }
    }

    fn clears_selection(self) -> bool {
        self != Self::DeleteUnverified
    }
}

impl UserDirectory {
    /// Replaces the selection. Ids not on the current page are ignored.
    pub fn select<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut view = self.lock();
        let selection: BTreeSet<String> = ids
            .into_iter()
            .map(Into::into)
            .filter(|id| view.rows.iter().any(|row| &row.id == id))
            .collect();
        view.selection = selection;
        view.total_is_fresh = false;
    }

    pub async fn block(&self, ids: Vec<String>) {
        self.run(BulkAction::Block, ids).await;
    }

    pub async fn unblock(&self, ids: Vec<String>) {
        self.run(BulkAction::Unblock, ids).await;
    }

    pub async fn delete(&self, ids: Vec<String>) {
        self.run(BulkAction::Delete, ids).await;
    }

    /// Deletes every unconfirmed account. Leaves the selection alone.
    pub async fn delete_unverified(&self) {
        self.run(BulkAction::DeleteUnverified, Vec::new()).await;
    }

    pub async fn block_selected(&self) {
        let ids = self.selected_ids();
        self.block(ids).await;
    }

    pub async fn unblock_selected(&self) {
        let ids = self.selected_ids();
        self.unblock(ids).await;
    }

    pub async fn delete_selected(&self) {
        let ids = self.selected_ids();
        self.delete(ids).await;
    }

    fn selected_ids(&self) -> Vec<String> {
        self.lock().selection.iter().cloned().collect()
    }

    /// Runs `action`, then refetches the current query on success. Rows are
    /// never edited locally.
    pub async fn run(&self, action: BulkAction, ids: Vec<String>) {
        let operation = action.operation();
        if operation.is_some() && ids.is_empty() {
            debug!("{action:?}: nothing selected, no request sent");
            return;
        }

        let ticket = self.bulk.issue();
        {
            let mut view = self.lock();
            view.action_in_progress = true;
            view.total_is_fresh = false;
        }

        let transport = self.session.transport();
        let result = match operation {
            Some(operation) => api::mutate_users(transport, operation, &ids).await,
            None => api::delete_unverified(transport).await,
        };

        if !self.bulk.is_latest(ticket) {
            return;
        }

        match result {
            Ok(()) => {
                info!("{action:?} {ticket}: applied to {} users", ids.len());
                {
                    let mut view = self.lock();
                    view.action_in_progress = false;
                    if action.clears_selection() {
                        view.selection.clear();
                    }
                }
                self.notices.success(action.success_message());
                self.fetch().await;
            }
            Err(e) if e.is_auth_failure() => {
                warn!("{action:?} {ticket}: {e}");
                self.drop_unauthorized();
            }
            Err(e) => {
                warn!("{action:?} {ticket}: {e}");
                self.lock().action_in_progress = false;
                self.notices.error(e.user_message(action.failure_message()));
            }
        }
    }
}
