use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::channel::Channel;

/// Classification for switch state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Pressed,
    /// The channel went straight from released to the long-press pattern.
    Extended,
    Released,
}

impl Transition {
    fn offset(self) -> u8 {
        match self {
            Transition::Pressed => 0,
            Transition::Extended => 1,
            Transition::Released => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Transition::Pressed => "pressed",
            Transition::Extended => "extended",
            Transition::Released => "released",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid switch event code: {0} (expected 1-36)")]
pub struct InvalidEventCode(pub u8);

/// A `(channel, transition)` pair, numbered with the controller's legacy
/// event codes 1 to 36.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SwitchEvent {
    CenterPressed = 1,
    CenterExtended = 2,
    CenterReleased = 3,
    LeftPressed = 4,
    LeftExtended = 5,
    LeftReleased = 6,
    UpPressed = 7,
    UpExtended = 8,
    UpReleased = 9,
    RightPressed = 10,
    RightExtended = 11,
    RightReleased = 12,
    DownPressed = 13,
    DownExtended = 14,
    DownReleased = 15,
    MediaPressed = 16,
    MediaExtended = 17,
    MediaReleased = 18,
    MenuPressed = 19,
    MenuExtended = 20,
    MenuReleased = 21,
    MapPressed = 22,
    MapExtended = 23,
    MapReleased = 24,
    ComPressed = 25,
    ComExtended = 26,
    ComReleased = 27,
    NavPressed = 28,
    NavExtended = 29,
    NavReleased = 30,
    BackPressed = 31,
    BackExtended = 32,
    BackReleased = 33,
    OptionPressed = 34,
    OptionExtended = 35,
    OptionReleased = 36,
}

// Channels in event code order; each owns three consecutive codes.
const CODE_GROUPS: [Channel; 12] = [
    Channel::Center,
    Channel::Left,
    Channel::Up,
    Channel::Right,
    Channel::Down,
    Channel::Media,
    Channel::Menu,
    Channel::Map,
    Channel::Com,
    Channel::Nav,
    Channel::Back,
    Channel::Option,
];

impl SwitchEvent {
    /// Every event, indexed by `code - 1`.
    pub const ALL: [SwitchEvent; 36] = [
        SwitchEvent::CenterPressed,
        SwitchEvent::CenterExtended,
        SwitchEvent::CenterReleased,
        SwitchEvent::LeftPressed,
        SwitchEvent::LeftExtended,
        SwitchEvent::LeftReleased,
        SwitchEvent::UpPressed,
        SwitchEvent::UpExtended,
        SwitchEvent::UpReleased,
        SwitchEvent::RightPressed,
        SwitchEvent::RightExtended,
        SwitchEvent::RightReleased,
        SwitchEvent::DownPressed,
        SwitchEvent::DownExtended,
        SwitchEvent::DownReleased,
        SwitchEvent::MediaPressed,
        SwitchEvent::MediaExtended,
        SwitchEvent::MediaReleased,
        SwitchEvent::MenuPressed,
        SwitchEvent::MenuExtended,
        SwitchEvent::MenuReleased,
        SwitchEvent::MapPressed,
        SwitchEvent::MapExtended,
        SwitchEvent::MapReleased,
        SwitchEvent::ComPressed,
        SwitchEvent::ComExtended,
        SwitchEvent::ComReleased,
        SwitchEvent::NavPressed,
        SwitchEvent::NavExtended,
        SwitchEvent::NavReleased,
        SwitchEvent::BackPressed,
        SwitchEvent::BackExtended,
        SwitchEvent::BackReleased,
        SwitchEvent::OptionPressed,
        SwitchEvent::OptionExtended,
        SwitchEvent::OptionReleased,
    ];

    pub fn new(channel: Channel, transition: Transition) -> Self {
        let group = CODE_GROUPS
            .iter()
            .position(|c| *c == channel)
            .unwrap_or_default();
        Self::ALL[group * 3 + transition.offset() as usize]
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn channel(self) -> Channel {
        CODE_GROUPS[(self.code() as usize - 1) / 3]
    }

    pub fn transition(self) -> Transition {
        match (self.code() - 1) % 3 {
            0 => Transition::Pressed,
            1 => Transition::Extended,
            _ => Transition::Released,
        }
    }
}

impl TryFrom<u8> for SwitchEvent {
    type Error = InvalidEventCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        code.checked_sub(1)
            .and_then(|index| Self::ALL.get(index as usize).copied())
            .ok_or(InvalidEventCode(code))
    }
}

impl fmt::Display for SwitchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.channel(), self.transition().name())
    }
}

/// Anything the decoder can report for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderEvent {
    Switch(SwitchEvent),
    /// Signed rotary movement since the previous accepted frame.
    Rotary(i16),
}

impl fmt::Display for DecoderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoderEvent::Switch(event) => write!(f, "{event}"),
            DecoderEvent::Rotary(delta) => write!(f, "rotary {delta:+}"),
        }
    }
}

/// Receiver for decoded events. Called synchronously from
/// [`IDriveDecoder::decode`](super::IDriveDecoder::decode).
pub trait EventSink {
    fn switch_event(&mut self, event: SwitchEvent);
    fn rotary_event(&mut self, delta: i16);
}

impl EventSink for Vec<DecoderEvent> {
    fn switch_event(&mut self, event: SwitchEvent) {
        self.push(DecoderEvent::Switch(event));
    }

    fn rotary_event(&mut self, delta: i16) {
        self.push(DecoderEvent::Rotary(delta));
    }
}

/// Adapts a pair of closures into an [`EventSink`].
///
/// ```
/// use idrive_decoder::idrive::{Callbacks, Frame, IDriveDecoder};
///
/// let mut presses = 0;
/// let mut travel = 0i32;
/// let mut sink = Callbacks::new(|_event| presses += 1, |delta| travel += i32::from(delta));
///
/// let mut decoder = IDriveDecoder::new();
/// decoder.decode(&Frame::new([0, 0x10, 0, 0x01, 0, 0, 0xC0, 0xF8]), &mut sink);
/// drop(sink);
/// assert_eq!(presses, 1);
/// ```
pub struct Callbacks<S, R> {
    switch: S,
    rotary: R,
}

impl<S, R> Callbacks<S, R>
where
    S: FnMut(SwitchEvent),
    R: FnMut(i16),
{
    pub fn new(switch: S, rotary: R) -> Self {
        Self { switch, rotary }
    }
}

impl<S, R> EventSink for Callbacks<S, R>
where
    S: FnMut(SwitchEvent),
    R: FnMut(i16),
{
    fn switch_event(&mut self, event: SwitchEvent) {
        (self.switch)(event)
    }

    fn rotary_event(&mut self, delta: i16) {
        (self.rotary)(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_legacy_numbering() {
        assert_eq!(SwitchEvent::CenterPressed.code(), 1);
        assert_eq!(SwitchEvent::DownReleased.code(), 15);
        assert_eq!(SwitchEvent::MediaPressed.code(), 16);
        assert_eq!(SwitchEvent::MapExtended.code(), 23);
        assert_eq!(SwitchEvent::BackReleased.code(), 33);
        assert_eq!(SwitchEvent::OptionReleased.code(), 36);

        for (index, event) in SwitchEvent::ALL.iter().enumerate() {
            assert_eq!(event.code() as usize, index + 1);
        }
    }

    #[test]
    fn new_agrees_with_channel_and_transition() {
        for channel in Channel::ALL {
            for transition in [Transition::Pressed, Transition::Extended, Transition::Released] {
                let event = SwitchEvent::new(channel, transition);
                assert_eq!(event.channel(), channel);
                assert_eq!(event.transition(), transition);
            }
        }
        assert_eq!(
            SwitchEvent::new(Channel::Nav, Transition::Extended),
            SwitchEvent::NavExtended
        );
    }

    #[test]
    fn rejects_codes_outside_range() {
        assert_eq!(SwitchEvent::try_from(0), Err(InvalidEventCode(0)));
        assert_eq!(SwitchEvent::try_from(37), Err(InvalidEventCode(37)));
        assert_eq!(SwitchEvent::try_from(28), Ok(SwitchEvent::NavPressed));
    }

    #[test]
    fn displays_readable_names() {
        assert_eq!(SwitchEvent::LeftExtended.to_string(), "left extended");
        assert_eq!(DecoderEvent::Rotary(-11).to_string(), "rotary -11");
        assert_eq!(DecoderEvent::Rotary(32).to_string(), "rotary +32");
    }
}
