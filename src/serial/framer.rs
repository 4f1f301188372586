//! Byte-at-a-time line framer with a bounded buffer.

/// Maximum accumulated line length, delimiter excluded.
pub const MAX_LINE_LEN: usize = 64;

/// A completed line handed out by [`LineFramer::feed`].
///
/// `truncated` is set when bytes were dropped because the line outgrew the
/// buffer before its delimiter arrived. Truncation is always explicit;
/// a caller that forwards a truncated line does so knowingly.
#[derive(Debug, Clone, Copy)]
pub struct CompletedLine<'a> {
    bytes: &'a [u8],
    truncated: bool,
}

impl<'a> CompletedLine<'a> {
    /// Raw line content, delimiter excluded.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Line content as UTF-8, or `""` when the bytes are not valid UTF-8.
    pub fn as_str(&self) -> &'a str {
        core::str::from_utf8(self.bytes).unwrap_or("")
    }

    /// True when overflow bytes were dropped before the delimiter arrived.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

/// Accumulates bytes until a `\n` delimiter completes a line.
///
/// After a line is returned the buffer resets itself on the next `feed`,
/// so the framer can be driven forever from a polling loop.
pub struct LineFramer<const N: usize = MAX_LINE_LEN> {
    buf: [u8; N],
    len: usize,
    truncated: bool,
    complete: bool,
}

impl<const N: usize> LineFramer<N> {
    /// Create an empty framer.
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            truncated: false,
            complete: false,
        }
    }

    /// Feed one byte; returns the completed line when `byte` is `\n`.
    ///
    /// On overflow the first N bytes are kept, the rest dropped, and the
    /// eventually-completed line is flagged truncated.
    pub fn feed(&mut self, byte: u8) -> Option<CompletedLine<'_>> {
        if self.complete {
            self.clear();
        }
        if byte == b'\n' {
            self.complete = true;
            return Some(CompletedLine {
                bytes: &self.buf[..self.len],
                truncated: self.truncated,
            });
        }
        if self.len < N {
            self.buf[self.len] = byte;
            self.len += 1;
        } else {
            self.truncated = true;
        }
        None
    }

    /// Discard any partial line.
    pub fn clear(&mut self) {
        self.len = 0;
        self.truncated = false;
        self.complete = false;
    }

    /// Bytes accumulated toward the current line.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing has accumulated.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> Default for LineFramer<N> {
    fn default() -> Self {
        Self::new()
    }
}
