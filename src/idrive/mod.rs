mod channel;
mod decoder;
mod event;
mod frame;
mod latch;

pub use channel::{Channel, ChannelDescriptor, Classifier, Level, CHANNELS};
pub use decoder::IDriveDecoder;
pub use event::{Callbacks, DecoderEvent, EventSink, InvalidEventCode, SwitchEvent, Transition};
pub use frame::{Frame, FrameError, FRAME_LEN, IDLE_BUTTONS};
pub use latch::LatchState;
