//! In-process session storage with undo history and idle expiry.
mod clock;
mod session;
mod version;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session::{SessionContext, SessionInfo};
pub use version::{SweeperHandle, VersionStore};
