pub mod block;
pub mod compose;
pub mod config;
pub mod layout;
pub mod session;

pub use block::BlockPlanner;
pub use compose::{Composition, TrialComposer};
pub use config::{ConditionQuota, TaskConfig};
pub use layout::LayoutGenerator;
pub use session::{Presenter, Recorder, Session};
