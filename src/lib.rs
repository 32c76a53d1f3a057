#![forbid(unsafe_code)]

pub mod animate;
pub mod batch;
pub mod config;
pub mod draw;
pub mod error;
pub mod log;
pub mod model;
pub mod reduce;
pub mod samples;
pub mod stimulus;
pub mod text;
pub mod trials;

pub use animate::{render_trial, FrameState, TrajectoryState, TRAIL_LEN};
pub use batch::{run_batch, BatchSummary};
pub use config::{Fps, RenderConfig};
pub use error::{GazeError, GazeResult};
pub use model::{GazeSample, LogRow, Trial, TrialStats};
