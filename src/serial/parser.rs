//! Two-token message classifier.
//!
//! Only two line grammars exist on the wire, so this is a whitespace
//! tokenizer, not a pattern engine: the sentinel `handshake` line, and
//! `<address> <value>` with one-or-more spaces between the tokens.

/// Sentinel line marking connection establishment.
pub const HANDSHAKE: &str = "handshake";

/// Classification of one completed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedMessage<'a> {
    /// The exact `handshake` literal (surrounding whitespace ignored).
    Handshake,
    /// `<address> <value>`: first token and last token of the line.
    Command { address: &'a str, value: &'a str },
    /// Neither grammar; the caller drops these.
    Malformed,
}

/// Classify a completed line.
///
/// The address is the first whitespace-delimited token, the value the last;
/// any tokens between them are ignored. Lines with fewer than two tokens
/// are malformed, except the handshake sentinel, which is a single token
/// compared exactly (so `handshake 5` is a command addressed `handshake`).
pub fn classify(line: &str) -> ParsedMessage<'_> {
    let line = line.trim();
    if line == HANDSHAKE {
        return ParsedMessage::Handshake;
    }

    let mut tokens = line.split_whitespace();
    let Some(address) = tokens.next() else {
        return ParsedMessage::Malformed;
    };
    let Some(mut value) = tokens.next() else {
        return ParsedMessage::Malformed;
    };
    for rest in tokens {
        value = rest;
    }
    ParsedMessage::Command { address, value }
}

/// Permissive integer parse: optional sign, then the longest leading digit
/// run. Anything that yields no digits parses to 0; overflow saturates.
pub fn parse_value(token: &str) -> i32 {
    let bytes = token.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for &b in digits {
        if !b.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value * 10 + (b - b'0') as i64;
        if value > i32::MAX as i64 + 1 {
            value = i32::MAX as i64 + 1;
            break;
        }
    }
    if !seen {
        return 0;
    }
    if negative {
        value = -value;
    }
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
