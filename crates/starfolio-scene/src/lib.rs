//! Scene coordination: cancellable timers, the planet entry sequencer, the
//! app screen flow, and the galaxy session that wires every system together.

pub mod entry;
pub mod flow;
pub mod session;
pub mod timers;

pub use entry::{EntryNotice, EntrySequencer, EntryStage, EntryTimings, LandingPhase};
pub use flow::{AppFlow, Screen};
pub use session::{FrameReport, GalaxySession};
pub use timers::{Fired, Timers};
