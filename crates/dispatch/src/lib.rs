//! Action Dispatch
//!
//! Turns gesture events into side effects: context gating, per-action
//! cooldown, and the sink traits behind which input injection, screenshots,
//! and notifications live.

mod dispatcher;
mod gate;
mod recording;
mod sink;

pub use dispatcher::{ActionDispatcher, ActionState, DispatchConfig, DispatchOutcome};
pub use gate::{ContextGate, ContextProbe, StaticContext};
pub use recording::{Action, RecordingSink};
pub use sink::{
    Hotkey, InputSink, MouseButton, Notification, Notifier, ScreenshotSink, ScrollDirection,
    SinkError,
};
