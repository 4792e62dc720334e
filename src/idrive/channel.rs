use std::fmt;

use serde::{Deserialize, Serialize};

use super::frame::Frame;

/// Logical inputs reported by the controller, in decode order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Center,
    Left,
    Up,
    Right,
    Down,
    Menu,
    Back,
    Com,
    Option,
    Media,
    Nav,
    Map,
}

impl Channel {
    pub const ALL: [Channel; 12] = [
        Channel::Center,
        Channel::Left,
        Channel::Up,
        Channel::Right,
        Channel::Down,
        Channel::Menu,
        Channel::Back,
        Channel::Com,
        Channel::Option,
        Channel::Media,
        Channel::Nav,
        Channel::Map,
    ];

    /// Position in decode order, also the channel's latch field.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Center => "center",
            Channel::Left => "left",
            Channel::Up => "up",
            Channel::Right => "right",
            Channel::Down => "down",
            Channel::Menu => "menu",
            Channel::Back => "back",
            Channel::Com => "com",
            Channel::Option => "option",
            Channel::Media => "media",
            Channel::Nav => "nav",
            Channel::Map => "map",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Engagement of a single channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Level {
    #[default]
    Released,
    Primary,
    /// Held long enough for the controller to report the long-press pattern.
    Extended,
}

/// How a channel's level is read out of its frame byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classifier {
    /// Dedicated bits. The primary bit wins when both are set.
    Bits { primary: u8, extended: u8 },
    /// Exact match of the high nibble, shared by the four directions.
    Nibble { primary: u8, extended: u8 },
}

const DIRECTION_MASK: u8 = 0xF0;

impl Classifier {
    pub fn classify(self, raw: u8) -> Level {
        match self {
            Classifier::Bits { primary, extended } => {
                if raw & primary != 0 {
                    Level::Primary
                } else if raw & extended != 0 {
                    Level::Extended
                } else {
                    Level::Released
                }
            }
            Classifier::Nibble { primary, extended } => match raw & DIRECTION_MASK {
                nibble if nibble == primary => Level::Primary,
                nibble if nibble == extended => Level::Extended,
                _ => Level::Released,
            },
        }
    }
}

/// Where and how to read one channel from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDescriptor {
    pub channel: Channel,
    pub byte: usize,
    pub classifier: Classifier,
}

impl ChannelDescriptor {
    const fn bits(channel: Channel, byte: usize, primary: u8, extended: u8) -> Self {
        Self {
            channel,
            byte,
            classifier: Classifier::Bits { primary, extended },
        }
    }

    const fn nibble(channel: Channel, primary: u8, extended: u8) -> Self {
        Self {
            channel,
            byte: 3,
            classifier: Classifier::Nibble { primary, extended },
        }
    }

    pub fn classify(&self, frame: &Frame) -> Level {
        self.classifier.classify(frame.byte(self.byte))
    }
}

/// Descriptor table, one entry per channel in decode order.
pub const CHANNELS: [ChannelDescriptor; 12] = [
    ChannelDescriptor::bits(Channel::Center, 3, 0x01, 0x02),
    ChannelDescriptor::nibble(Channel::Left, 0xA0, 0xB0),
    ChannelDescriptor::nibble(Channel::Up, 0x10, 0x20),
    ChannelDescriptor::nibble(Channel::Right, 0x40, 0x50),
    ChannelDescriptor::nibble(Channel::Down, 0x70, 0x80),
    ChannelDescriptor::bits(Channel::Menu, 4, 0x04, 0x08),
    ChannelDescriptor::bits(Channel::Back, 4, 0x20, 0x40),
    ChannelDescriptor::bits(Channel::Com, 5, 0x08, 0x10),
    ChannelDescriptor::bits(Channel::Option, 5, 0x01, 0x02),
    ChannelDescriptor::bits(Channel::Media, 6, 0x01, 0x02),
    ChannelDescriptor::bits(Channel::Nav, 6, 0x08, 0x10),
    ChannelDescriptor::bits(Channel::Map, 7, 0x01, 0x02),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idrive::frame::IDLE_BUTTONS;

    fn knob(byte3: u8) -> Frame {
        let [b4, b5, b6, b7] = IDLE_BUTTONS;
        Frame::new([1, 0, 0, byte3, b4, b5, b6, b7])
    }

    fn level(frame: &Frame, channel: Channel) -> Level {
        CHANNELS[channel.index()].classify(frame)
    }

    #[test]
    fn table_follows_decode_order() {
        for (i, (descriptor, channel)) in CHANNELS.iter().zip(Channel::ALL).enumerate() {
            assert_eq!(descriptor.channel, channel);
            assert_eq!(channel.index(), i);
        }
    }

    #[test]
    fn idle_frame_releases_everything() {
        let frame = knob(0x00);
        for descriptor in &CHANNELS {
            assert_eq!(descriptor.classify(&frame), Level::Released, "{}", descriptor.channel);
        }
    }

    #[test]
    fn primary_bit_wins_over_extended() {
        assert_eq!(level(&knob(0x03), Channel::Center), Level::Primary);
        assert_eq!(level(&knob(0x02), Channel::Center), Level::Extended);
    }

    #[test]
    fn direction_nibble_is_exclusive() {
        let cases = [
            (0xA0, Channel::Left, Level::Primary),
            (0xB0, Channel::Left, Level::Extended),
            (0x10, Channel::Up, Level::Primary),
            (0x20, Channel::Up, Level::Extended),
            (0x40, Channel::Right, Level::Primary),
            (0x50, Channel::Right, Level::Extended),
            (0x70, Channel::Down, Level::Primary),
            (0x80, Channel::Down, Level::Extended),
        ];

        for (raw, active, expected) in cases {
            let frame = knob(raw | 0x01);
            for channel in [Channel::Left, Channel::Up, Channel::Right, Channel::Down] {
                let want = if channel == active { expected } else { Level::Released };
                assert_eq!(level(&frame, channel), want, "raw {raw:#04x} {channel}");
            }
            // Center lives in the low bits and is unaffected.
            assert_eq!(level(&frame, Channel::Center), Level::Primary);
        }
    }

    #[test]
    fn unknown_nibble_means_no_direction() {
        for raw in [0x30, 0x60, 0x90, 0xC0, 0xF0] {
            let frame = knob(raw);
            for channel in [Channel::Left, Channel::Up, Channel::Right, Channel::Down] {
                assert_eq!(level(&frame, channel), Level::Released);
            }
        }
    }

    #[test]
    fn auxiliary_buttons_read_their_own_bytes() {
        let frame = Frame::new([1, 0, 0, 0x00, 0x44, 0x09, 0xD1, 0xFA]);
        assert_eq!(level(&frame, Channel::Menu), Level::Primary);
        assert_eq!(level(&frame, Channel::Back), Level::Extended);
        assert_eq!(level(&frame, Channel::Com), Level::Primary);
        assert_eq!(level(&frame, Channel::Option), Level::Primary);
        assert_eq!(level(&frame, Channel::Media), Level::Primary);
        assert_eq!(level(&frame, Channel::Nav), Level::Extended);
        assert_eq!(level(&frame, Channel::Map), Level::Extended);
    }

    #[test]
    fn channel_names_round_trip_through_serde() {
        let parsed: Vec<Channel> = serde_yaml::from_str("[center, option, map]").unwrap();
        assert_eq!(parsed, vec![Channel::Center, Channel::Option, Channel::Map]);
        assert_eq!(Channel::Nav.to_string(), "nav");
    }
}
