use chaos_states::{NoticeReceiver, notice_channel};

use crate::config::BusinessConfig;
use crate::directory::UserDirectory;
use crate::history::ActionHistory;
use crate::session::SessionManager;
use crate::token_store::TokenStore;
use crate::transport::Transport;

/// All console components wired to one transport and one notice channel.
#[derive(Debug, Clone)]
pub struct Console {
    pub session: SessionManager,
    pub directory: UserDirectory,
    pub history: ActionHistory,
}

impl Console {
    /// Returns the console and the receiving end of its notices.
    pub fn new(config: BusinessConfig, tokens: TokenStore) -> (Self, NoticeReceiver) {
        let (notices, receiver) = notice_channel();
        let transport = Transport::new(config, tokens);
        let session = SessionManager::new(transport, notices.clone());
        let directory = UserDirectory::new(session.clone(), notices.clone());
        let history = ActionHistory::new(session.clone(), notices);
        (
            Self {
                session,
                directory,
                history,
            },
            receiver,
        )
    }
}
