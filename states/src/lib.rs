//! Concurrency primitives shared by the console crates: request sequencing,
//! cancellable task handles and the notice channel.

mod notice;
mod stream;
mod task;

pub use notice::{Notice, NoticeLevel, NoticeReceiver, Notices, notice_channel};
pub use stream::RequestStream;
pub use task::{TaskHandle, TaskId};
