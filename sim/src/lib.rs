//! `sim` — Scenario simulator: labelled vector streams, replay, evaluation.

pub mod evaluate;
pub mod replay;
pub mod scenarios;
pub mod stream;
pub mod target;

pub use evaluate::{evaluate, evaluate_tracker, RunReport};
pub use replay::{load_replay, save_replay, ReplayLog};
pub use scenarios::{Scenario, ScenarioKind};
pub use stream::{Frame, StreamParams, VectorStream};
pub use target::{MotionSpec, SimTarget};
