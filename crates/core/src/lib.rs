//! Core library for the Sort Visualiser application.
//!
//! The crate animates classic comparison sorts over a sequence of bar
//! heights. Each module owns one piece of that pipeline: the sequence store,
//! the step renderer and its surfaces, the pacing primitive, the instrumented
//! algorithm engines and the session controller that ties them together.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod pacing;
pub mod render;
pub mod sequence;
pub mod session;

pub use algorithms::{
    run_algorithm, Algorithm, NullObserver, StepContext, StepEvent, StepObserver,
};
pub use config::{delay_from_speed, AppConfig, SessionConfig, SurfaceConfig};
pub use error::{Result, SortVizError};
pub use pacing::{CancelToken, DelayHandle, Pacer};
pub use render::{
    Bar, BarColor, CellGrid, FrameBuffer, MergeOverlay, SharedRenderer, StepRenderer, Surface,
};
pub use sequence::SequenceStore;
pub use session::{RunHandle, RunOutcome, Session};
