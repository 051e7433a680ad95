//! MIDI message decoding and poll-style input.

mod input;
mod message;

pub use input::{MidiError, MidiSource};
pub use message::{channel, message_type, MidiMessage, CONTROL_CHANGE};
