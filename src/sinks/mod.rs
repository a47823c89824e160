//! Sink and stream writer implementations

pub mod console;
pub mod stream;

pub use console::{route_and_write, ConsoleSink};
pub use stream::{ConsoleWriter, Destination, MemoryWriter, StreamWriter};

pub use crate::core::LogSink;
