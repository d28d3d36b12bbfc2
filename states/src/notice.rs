//! User-visible notices.
//!
//! Core components never return errors across their boundary. They report
//! outcomes here instead, and the presentation layer drains the receiver and
//! shows each notice once.

use flume::{Receiver, Sender};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Sending half, cloned into every component that reports to the user.
#[derive(Debug, Clone)]
pub struct Notices {
    send: Sender<Notice>,
}

/// Receiving half, owned by the presentation layer.
#[derive(Debug)]
pub struct NoticeReceiver {
    recv: Receiver<Notice>,
}

/// Creates a connected notice channel.
pub fn notice_channel() -> (Notices, NoticeReceiver) {
    let (send, recv) = flume::unbounded();
    (Notices { send }, NoticeReceiver { recv })
}

impl Notices {
    pub fn success(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Error, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Info, message.into());
    }

    fn emit(&self, level: NoticeLevel, message: String) {
        // Nobody listening is fine; the outcome is already in component state.
        if self.send.send(Notice { level, message }).is_err() {
            debug!("notice dropped: receiver is gone");
        }
    }
}

impl NoticeReceiver {
    pub fn try_recv(&self) -> Option<Notice> {
        self.recv.try_recv().ok()
    }

    /// Takes every notice queued so far.
    pub fn drain(&self) -> Vec<Notice> {
        self.recv.drain().collect()
    }
}
