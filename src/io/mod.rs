//! Standard I/O emulation
//!
//! - [`console`]: captured output of a run
//! - [`format`]: `printf` formatting and escape decoding
//! - [`input`]: the `scanf` token queue

pub mod console;
pub mod format;
pub mod input;

pub use console::{Console, OutputKind};
pub use format::{format_printf, unescape};
pub use input::InputQueue;
