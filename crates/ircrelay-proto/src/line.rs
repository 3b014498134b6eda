//! Per-connection line framing.
//!
//! Bytes arrive from the transport in arbitrary chunks. [`LineFramer`]
//! accumulates them and hands back complete lines with the terminator
//! removed. LF ends a line; a CR directly before it is dropped with it.
//!
//! Control bytes other than CR, LF and TAB never reach the buffer. The
//! EOT byte (0x04) some terminal clients emit is discarded the same way.

use bytes::{BufMut, BytesMut};

/// Default reassembly cap, in bytes.
pub const DEFAULT_MAX_BUFFER: usize = 4096;

const EOT: u8 = 0x04;

/// Result of a [`LineFramer::feed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The bytes were appended to the buffer.
    Buffered,
    /// The buffer grew past the cap without a terminator and was cleared.
    Overflowed {
        /// Number of bytes thrown away.
        discarded: usize,
    },
}

/// Accumulates raw bytes and yields newline-terminated lines.
#[derive(Debug)]
pub struct LineFramer {
    buffer: BytesMut,
    /// Bytes already scanned without finding a newline
    next_index: usize,
    max_len: usize,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// Create a framer with the default 4096 byte cap.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_BUFFER)
    }

    /// Create a framer with a custom cap.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(512),
            next_index: 0,
            max_len,
        }
    }

    /// Append bytes from the transport.
    ///
    /// Never blocks. If the buffer ends up larger than the cap while
    /// holding no terminator at all, the partial data is discarded.
    pub fn feed(&mut self, bytes: &[u8]) -> FeedOutcome {
        self.buffer.reserve(bytes.len());
        for &byte in bytes {
            if !is_stripped(byte) {
                self.buffer.put_u8(byte);
            }
        }

        if self.buffer.len() > self.max_len && self.find_newline().is_none() {
            let discarded = self.buffer.len();
            self.clear();
            return FeedOutcome::Overflowed { discarded };
        }

        FeedOutcome::Buffered
    }

    /// Pop the next complete line, without its terminator.
    ///
    /// Returns `None` when no terminator has been received yet.
    pub fn next_message(&mut self) -> Option<String> {
        let Some(offset) = self.find_newline() else {
            self.next_index = self.buffer.len();
            return None;
        };

        let mut line = self.buffer.split_to(offset + 1);
        self.next_index = 0;

        line.truncate(offset);
        if line.last() == Some(&b'\r') {
            line.truncate(offset - 1);
        }

        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Number of bytes waiting for a terminator.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.next_index = 0;
    }

    fn find_newline(&self) -> Option<usize> {
        self.buffer[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|pos| self.next_index + pos)
    }
}

#[inline]
fn is_stripped(byte: u8) -> bool {
    if byte == EOT {
        return true;
    }
    (byte < 0x20 || byte == 0x7f) && !matches!(byte, b'\r' | b'\n' | b'\t')
}
