use tracing::{debug, trace};

use super::channel::{Channel, ChannelDescriptor, Level, CHANNELS};
use super::event::{DecoderEvent, EventSink, SwitchEvent, Transition};
use super::frame::Frame;
use super::latch::LatchState;

const INITIAL_COUNTER: u8 = 0xFF;
const INITIAL_POSITION: u16 = 0x7FFF;
// Counter distances above this are frames from the past.
const ACCEPT_WINDOW: u8 = 0x7F;

/// Frame decoder for the iDrive controller.
///
/// Feed every received frame to [`decode`](Self::decode) in arrival order.
/// The decoder keeps the last accepted counter and rotary position plus the
/// latched level of each channel, and reports only changes.
///
/// Counter `0` marks a sender restart: all latched state is dropped before
/// the frame is decoded, so channels that are still held are reported as
/// freshly pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IDriveDecoder {
    last_counter: u8,
    last_position: u16,
    latch: LatchState,
}

impl Default for IDriveDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl IDriveDecoder {
    pub const fn new() -> Self {
        Self {
            last_counter: INITIAL_COUNTER,
            last_position: INITIAL_POSITION,
            latch: LatchState::new(),
        }
    }

    /// Forget everything seen so far. Emits nothing.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Decode one frame, reporting events to `sink` in emission order:
    /// the rotary delta first, then switches in [`Channel::ALL`] order.
    pub fn decode<S: EventSink + ?Sized>(&mut self, frame: &Frame, sink: &mut S) {
        let counter = frame.counter();
        if counter == 0 {
            debug!("sequence counter restarted, clearing latched state");
            self.reset();
        }

        let diff = counter.wrapping_sub(self.last_counter);
        if diff > ACCEPT_WINDOW {
            trace!(
                counter,
                last_counter = self.last_counter,
                "dropping out-of-order frame"
            );
            return;
        }
        self.last_counter = counter;

        self.handle_rotary(frame.position(), sink);

        for descriptor in &CHANNELS {
            self.handle_channel(descriptor, frame, sink);
        }
    }

    /// Decode one frame and collect its events.
    pub fn decode_events(&mut self, frame: &Frame) -> Vec<DecoderEvent> {
        let mut events = Vec::new();
        self.decode(frame, &mut events);
        events
    }

    fn handle_rotary<S: EventSink + ?Sized>(&mut self, position: u16, sink: &mut S) {
        if position == self.last_position {
            return;
        }
        let delta = position.wrapping_sub(self.last_position) as i16;
        self.last_position = position;
        sink.rotary_event(delta);
    }

    fn handle_channel<S: EventSink + ?Sized>(
        &mut self,
        descriptor: &ChannelDescriptor,
        frame: &Frame,
        sink: &mut S,
    ) {
        let channel = descriptor.channel;
        let new = descriptor.classify(frame);
        let old = self.latch.get(channel);
        if new == old {
            return;
        }

        self.latch.set(channel, new);

        // A direct primary/extended swap only re-latches; it is not a new press.
        let transition = match (old, new) {
            (Level::Released, Level::Primary) => Transition::Pressed,
            (Level::Released, Level::Extended) => Transition::Extended,
            (_, Level::Released) => Transition::Released,
            _ => return,
        };
        sink.switch_event(SwitchEvent::new(channel, transition));
    }

    pub fn last_counter(&self) -> u8 {
        self.last_counter
    }

    pub fn last_position(&self) -> u16 {
        self.last_position
    }

    /// Currently latched level of `channel`.
    pub fn level(&self, channel: Channel) -> Level {
        self.latch.get(channel)
    }

    pub fn latch(&self) -> &LatchState {
        &self.latch
    }
}
