//! MIDI status-byte decoding.
//!
//! The first byte of a MIDI message is the status byte: the high nibble is
//! the message type, the low nibble is the channel. Channels are reported
//! 1-based (1-16) throughout this crate, matching how controllers label
//! them; the 0-based wire nibble never escapes this module.

/// Control Change message type (high nibble of the status byte).
pub const CONTROL_CHANGE: u8 = 0b1011;

const STATUS_MASK: u8 = 0xF0;

/// Extract the message type from a status byte.
pub fn message_type(status_byte: u8) -> u8 {
    (status_byte & STATUS_MASK) >> 4
}

/// Extract the channel from a status byte, 1-based (1-16).
pub fn channel(status_byte: u8) -> u8 {
    (status_byte & !STATUS_MASK) + 1
}

/// A decoded MIDI message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiMessage {
    /// Message type from the status byte's high nibble.
    pub message_type: u8,
    /// Channel, 1-based (1-16).
    pub channel: u8,
    /// Data bytes following the status byte. For a Control Change message
    /// this is `[controller_number, controller_value]`.
    pub data: Vec<u8>,
}

impl MidiMessage {
    /// Decode a raw MIDI message. Returns `None` for an empty buffer.
    pub fn from_raw(raw: &[u8]) -> Option<Self> {
        let (&status, data) = raw.split_first()?;
        Some(Self {
            message_type: message_type(status),
            channel: channel(status),
            data: data.to_vec(),
        })
    }

    /// Whether this is a Control Change message.
    pub fn is_control_change(&self) -> bool {
        self.message_type == CONTROL_CHANGE
    }
}
