//! Data transfer objects shared by the session and the HTTP API.
//!
//! - `entry`: RemoteEntry, EntryKind, DirectoryEntry for remote listings
//! - `navigation`: NavigationState with single-selection rules
//! - `alert`: Alert, AlertAction and the pending AlertQueue
//! - `screen`: ScreenView/SessionView snapshots, FileKind, CreatorPhase

pub mod alert;
pub mod entry;
pub mod navigation;
pub mod screen;

pub use alert::*;
pub use entry::*;
pub use navigation::*;
pub use screen::*;
