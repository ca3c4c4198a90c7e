//! Non-destructive image adjustments: a fixed pipeline of color, enhancement,
//! blur and geometry stages rebuilt from the source on every change, plus the
//! crop mapping that turns an on-screen selection into source pixels.

pub mod config;
pub mod crop;
pub mod editor;
pub mod error;
pub mod imageio;
pub mod processing;
pub mod state;

pub use crop::{DisplayTransform, Point, ScreenRect, SourceRect};
pub use editor::{Editor, QuarterTurn};
pub use error::EditError;
pub use state::{AdjustmentParameters, FlipState};
