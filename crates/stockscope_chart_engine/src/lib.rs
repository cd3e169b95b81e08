pub mod calendar;
pub mod crosshair;
pub mod merge;
pub mod window;

pub use calendar::{RawTime, normalize};
pub use crosshair::{CandleIndex, PointerEvent, PointerPosition, resolve};
pub use merge::merge;
pub use window::{Window, WindowError, WindowOrigin, default_window};
