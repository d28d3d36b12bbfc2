//! Core of the admin console: session lifecycle, the server-synchronized user
//! directory and per-user action history, over an authenticated HTTP transport.

mod config;
mod console;
pub mod directory;
mod error;
pub mod history;
pub mod http;
mod model;
mod route;
pub mod session;
mod token_store;
mod transport;

pub use config::{BusinessConfig, DEFAULT_API_BASE_URL};
pub use console::Console;
pub use directory::{
    BulkAction, DirectoryView, QueryChange, QueryState, RequestDescriptor, SortGesture, SortOrder,
    TableGesture, UserDirectory,
};
pub use error::{ApiError, ApiResult, StorageError};
pub use history::{ActionHistory, HistoryView};
pub use model::{
    ActionHistoryEntry, ActionKind, DirectoryRow, RegisterRequest, UserProfile, parse_timestamp,
};
pub use route::Route;
pub use session::{ResetPasswordForm, Session, SessionManager, SessionPhase};
pub use token_store::{MemoryStorage, TokenStorage, TokenStore, TokenTier};
pub use transport::Transport;

pub use chaos_states::{Notice, NoticeLevel, NoticeReceiver, Notices, notice_channel};
