//! Serial message channel: framer + parser + synchronous dispatch.

use super::framer::{LineFramer, MAX_LINE_LEN};
use super::parser::{classify, parse_value, ParsedMessage};

/// Receiver for channel events.
///
/// Both callbacks run synchronously inside [`SerialChannel::feed`]; they
/// must not block and must not feed the same channel re-entrantly.
pub trait MessageSink {
    /// A handshake line arrived.
    fn on_handshake(&mut self);
    /// An addressed command arrived; non-numeric values arrive as 0.
    fn on_message(&mut self, address: &str, value: i32);
}

/// Running counters over everything the channel has seen.
///
/// Dropped input is counted, never surfaced; the console runs unattended,
/// so diagnostics are pull-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Completed lines, regardless of outcome.
    pub lines: u32,
    /// Handshake lines dispatched.
    pub handshakes: u32,
    /// Command lines dispatched.
    pub commands: u32,
    /// Lines matching neither grammar, dropped.
    pub malformed: u32,
    /// Lines that overflowed the framer, dropped.
    pub truncated: u32,
}

/// Composes a [`LineFramer`] and the message parser over a byte stream.
pub struct SerialChannel<const N: usize = MAX_LINE_LEN> {
    framer: LineFramer<N>,
    stats: ChannelStats,
}

impl<const N: usize> SerialChannel<N> {
    /// Create an idle channel.
    pub const fn new() -> Self {
        Self {
            framer: LineFramer::new(),
            stats: ChannelStats {
                lines: 0,
                handshakes: 0,
                commands: 0,
                malformed: 0,
                truncated: 0,
            },
        }
    }

    /// Feed one byte from the transport, dispatching on completed lines.
    ///
    /// Truncated and malformed lines are counted and dropped; the framer
    /// recovers at the next delimiter.
    pub fn feed<S: MessageSink>(&mut self, byte: u8, sink: &mut S) {
        let Some(line) = self.framer.feed(byte) else {
            return;
        };
        self.stats.lines += 1;
        if line.truncated() {
            self.stats.truncated += 1;
            return;
        }
        match classify(line.as_str()) {
            ParsedMessage::Handshake => {
                self.stats.handshakes += 1;
                sink.on_handshake();
            }
            ParsedMessage::Command { address, value } => {
                self.stats.commands += 1;
                sink.on_message(address, parse_value(value));
            }
            ParsedMessage::Malformed => {
                self.stats.malformed += 1;
            }
        }
    }

    /// Counters since construction.
    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    /// Drop any partially accumulated line.
    pub fn clear(&mut self) {
        self.framer.clear();
    }
}

impl<const N: usize> Default for SerialChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}
