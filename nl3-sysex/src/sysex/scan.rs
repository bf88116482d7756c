//! Frame boundary scanning

use tracing::debug;

use crate::{SYSEX_END, SYSEX_START};

/// Iterate over the `F0 … F7` frames in `stream`, sentinels included
pub fn scan(stream: &[u8]) -> FrameScanner<'_> {
    FrameScanner { data: stream, pos: 0 }
}

/// Lazy iterator returned by [`scan`]
///
/// Bytes outside frames are skipped. A start byte seen before the end byte
/// abandons the open frame, and an unterminated frame at end of stream is
/// dropped.
#[derive(Debug, Clone)]
pub struct FrameScanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for FrameScanner<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let offset = self.data[self.pos..]
            .iter()
            .position(|b| *b == SYSEX_START);
        let Some(offset) = offset else {
            self.pos = self.data.len();
            return None;
        };

        let mut start = self.pos + offset;
        for (i, byte) in self.data.iter().enumerate().skip(start + 1) {
            match *byte {
                SYSEX_END => {
                    self.pos = i + 1;
                    return Some(&self.data[start..=i]);
                }
                SYSEX_START => {
                    debug!(offset = start, "Abandoning unterminated frame");
                    start = i;
                }
                _ => {}
            }
        }

        debug!(offset = start, "Dropping unterminated frame at end of stream");
        self.pos = self.data.len();
        None
    }
}
