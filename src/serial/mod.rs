//! Addressed message channel over a line-delimited byte stream.
//!
//! The transport hands over one byte at a time; the framer assembles
//! newline-delimited lines, the parser classifies each line as a handshake
//! or an addressed command, and the channel dispatches callbacks. Anything
//! that does not parse is counted and dropped; the console must keep
//! running unattended.

pub mod channel;
pub mod framer;
pub mod parser;

pub use channel::{ChannelStats, MessageSink, SerialChannel};
pub use framer::{CompletedLine, LineFramer, MAX_LINE_LEN};
pub use parser::{classify, parse_value, ParsedMessage, HANDSHAKE};
