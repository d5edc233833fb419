pub mod opcodes;
pub mod pushdrop;
pub mod script_builder;
pub mod viewer;

pub use overlay_txscript_errors::TxScriptError;
pub use pushdrop::{LockPosition, PushDropError, PushDropResult, PushDropToken};
pub use viewer::ScriptViewer;

/// Upper bound on the size of any script the crate parses or builds.
pub const MAX_SCRIPTS_SIZE: usize = 10_000_000;
