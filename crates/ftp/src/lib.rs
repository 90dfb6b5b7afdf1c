//! FTP/FTPS transport for the site synchronizer.
//!
//! Wraps `suppaftp`'s blocking client. Every command runs on tokio's
//! blocking pool with the single control connection behind a mutex, so
//! commands are naturally serialized.

mod reply;
mod transport;

pub use reply::{is_already_exists, parse_reply, reply_text};
pub use transport::{DEFAULT_TIMEOUT, FtpTransport};
