//! Screen state machines and the stack that owns them.
//!
//! - `stack`: Navigator, Screen and typed ScreenHandle tokens
//! - `picker`: DirectoryPicker (one directory level, single selection)
//! - `creator`: FileCreator (name + type form)
//! - `lister`: RemoteDirectoryLister (folders-only listing)
//! - `export`: ExportTrigger (single upload)
//! - `session`: Session, which drives the screens against a cloud client

pub mod creator;
pub mod export;
pub mod lister;
pub mod picker;
pub mod session;
pub mod stack;

pub use creator::{CreateRequest, FileCreator};
pub use export::ExportTrigger;
pub use lister::RemoteDirectoryLister;
pub use picker::{DirectoryPicker, ExportJob};
pub use session::{Session, SharedSession};
pub use stack::{HostScreen, Navigator, Screen, ScreenHandle};
