use super::channel::{Channel, Level};

const PRIMARY: u8 = 0b10;
const EXTENDED: u8 = 0b01;
const FIELD: u8 = 0b11;

/// Last reported level of every channel, packed two bits per channel.
///
/// Channel `i` occupies byte `i / 4`, most significant field first, so the
/// first byte holds center, left, up and right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LatchState([u8; 3]);

impl LatchState {
    pub const fn new() -> Self {
        Self([0; 3])
    }

    fn slot(channel: Channel) -> (usize, u32) {
        let index = channel.index();
        (index / 4, (6 - 2 * (index % 4)) as u32)
    }

    pub fn get(&self, channel: Channel) -> Level {
        let (byte, shift) = Self::slot(channel);
        let field = (self.0[byte] >> shift) & FIELD;
        if field & PRIMARY != 0 {
            Level::Primary
        } else if field & EXTENDED != 0 {
            Level::Extended
        } else {
            Level::Released
        }
    }

    pub fn set(&mut self, channel: Channel, level: Level) {
        let (byte, shift) = Self::slot(channel);
        self.0[byte] &= !(FIELD << shift);
        let bits = match level {
            Level::Released => 0,
            Level::Primary => PRIMARY,
            Level::Extended => EXTENDED,
        };
        self.0[byte] |= bits << shift;
    }

    pub fn clear(&mut self) {
        self.0 = [0; 3];
    }

    pub fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }
}
