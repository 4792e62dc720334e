//! Decoder for the 8-byte CAN frames emitted by an iDrive rotary controller.
//!
//! The controller reports a sequence counter, an absolute rotary position and
//! the raw state of its knob and auxiliary buttons in every frame. The
//! [`IDriveDecoder`](idrive::IDriveDecoder) turns that stream into rotary
//! deltas and press/extended/release transitions.
//!
//! ```
//! use idrive_decoder::idrive::{DecoderEvent, Frame, IDriveDecoder};
//!
//! let mut decoder = IDriveDecoder::new();
//! decoder.decode_events(&Frame::new([0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0xF8]));
//!
//! let events = decoder.decode_events(&Frame::new([0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0xC0, 0xF8]));
//! assert_eq!(events.len(), 1);
//! assert!(matches!(events[0], DecoderEvent::Switch(_)));
//! ```

pub mod idrive;
