// State management module.
// Holds the feed controller, the typing engine, and per-tab UI state.

#![allow(dead_code)]

pub mod console;
pub mod feed;
pub mod script;
pub mod terminal;

pub use console::{ConsoleLevel, ConsoleMessage, ConsoleState};
pub use feed::{
    ErrorKind, FeedEvent, FeedState, RenderInstruction, SKELETON_CARDS, WarningKind, load_projects,
};
pub use script::{CommandBlock, TerminalScript, experience_script};
pub use terminal::{ColorLine, Segment, SegmentKind, TermBlock, Tick, TypingEngine};
