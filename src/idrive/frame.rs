use thiserror::Error;

/// Length of every controller frame on the bus.
pub const FRAME_LEN: usize = 8;

/// Bytes 4..8 as sent while no auxiliary button is held.
pub const IDLE_BUTTONS: [u8; 4] = [0x00, 0x00, 0xC0, 0xF8];

/// Errors raised when building a [`Frame`] from untrusted input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Invalid frame length: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// One raw controller frame.
///
/// ```text
/// 0    sequence counter (wraps at 255, 0 marks a sender restart)
/// 1,2  rotary position, little endian
/// 3    knob: center in bits 0-1, direction in the high nibble
/// 4    menu / back
/// 5    com / option
/// 6    media / nav
/// 7    map
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a frame directly from a received CAN payload.
    pub fn from_buf(buf: &[u8; FRAME_LEN]) -> Self {
        Self(*buf)
    }

    pub fn counter(&self) -> u8 {
        self.0[0]
    }

    /// Absolute rotary position.
    pub fn position(&self) -> u16 {
        u16::from_le_bytes([self.0[1], self.0[2]])
    }

    /// Raw byte at `index`. Panics if `index >= FRAME_LEN`.
    pub fn byte(&self, index: usize) -> u8 {
        self.0[index]
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }
}

impl From<[u8; FRAME_LEN]> for Frame {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = FrameError;

    fn try_from(buf: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; FRAME_LEN] = buf.try_into().map_err(|_| FrameError::Length {
            expected: FRAME_LEN,
            actual: buf.len(),
        })?;
        Ok(Self(bytes))
    }
}
