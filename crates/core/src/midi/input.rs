//! Poll-style wrapper over a midir input connection.
//!
//! midir delivers bytes on its own thread via a callback. The callback
//! forwards `(bytes, timestamp)` into a channel so the main loop can poll
//! for messages without blocking. The port closes when the source drops.

use std::io::{stdin, stdout, Write};
use std::sync::mpsc::{channel, Receiver, TryRecvError};

use midir::{Ignore, MidiInput, MidiInputConnection, MidiInputPort};
use thiserror::Error;

use super::message::MidiMessage;

/// Errors opening a MIDI input port.
#[derive(Debug, Error)]
pub enum MidiError {
    #[error("failed to initialize MIDI input: {0}")]
    Init(#[from] midir::InitError),

    #[error("no MIDI input ports available")]
    NoPorts,

    #[error("no MIDI input port matching '{0}'")]
    PortNotFound(String),

    #[error("failed to read MIDI port name: {0}")]
    PortInfo(#[from] midir::PortInfoError),

    #[error("failed to connect to MIDI input port: {0}")]
    Connect(#[from] midir::ConnectError<MidiInput>),

    #[error("failed to read port selection: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("invalid port selection '{0}'")]
    InvalidSelection(String),
}

/// How a MIDI input port is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PortSelector {
    /// Numeric index into the port list.
    Index(usize),
    /// Case-insensitive substring of the port name.
    Name(String),
}

impl PortSelector {
    fn parse(selector: &str) -> Self {
        match selector.trim().parse::<usize>() {
            Ok(index) => PortSelector::Index(index),
            Err(_) => PortSelector::Name(selector.trim().to_string()),
        }
    }
}

/// A MIDI input source that can be polled for decoded messages.
pub struct MidiSource {
    // RAII: dropping the connection closes the port.
    _connection: MidiInputConnection<()>,
    receiver: Receiver<(Vec<u8>, u64)>,
    port_name: String,
}

impl MidiSource {
    /// Open a MIDI input port.
    ///
    /// `selector` is a numeric port index or a case-insensitive name
    /// substring. With no selector, the single available port is used, or
    /// the user is prompted to pick one when several exist.
    pub fn open(selector: Option<&str>) -> Result<Self, MidiError> {
        let mut midi_in = MidiInput::new("vlcmidi")?;
        midi_in.ignore(Ignore::None);

        let ports = midi_in.ports();
        if ports.is_empty() {
            return Err(MidiError::NoPorts);
        }

        let port = match selector {
            Some(selector) => find_port(&midi_in, &ports, selector)?,
            None if ports.len() == 1 => ports[0].clone(),
            None => prompt_for_port(&midi_in, &ports)?,
        };
        let port_name = midi_in.port_name(&port)?;

        let (sender, receiver) = channel();
        let connection = midi_in.connect(
            &port,
            "vlcmidi-input",
            move |timestamp, bytes, _| {
                // Callback runs on midir's thread; just hand the bytes over.
                let _ = sender.send((bytes.to_vec(), timestamp));
            },
            (),
        )?;

        log::info!("Connected to MIDI input port '{}'", port_name);

        Ok(Self {
            _connection: connection,
            receiver,
            port_name,
        })
    }

    /// Poll for one pending message, without blocking.
    ///
    /// Returns `None` when nothing is pending.
    pub fn poll_message(&self) -> Option<MidiMessage> {
        match self.receiver.try_recv() {
            Ok((bytes, timestamp)) => {
                log::debug!(
                    "Received message {:?} from '{}' (t={})",
                    bytes,
                    self.port_name,
                    timestamp
                );
                MidiMessage::from_raw(&bytes)
            }
            Err(TryRecvError::Empty) => None,
            // The sender lives inside the connection we own, so this arm is
            // unreachable while `self` is alive.
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Name of the connected port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

fn find_port(
    midi_in: &MidiInput,
    ports: &[MidiInputPort],
    selector: &str,
) -> Result<MidiInputPort, MidiError> {
    match PortSelector::parse(selector) {
        PortSelector::Index(index) => ports
            .get(index)
            .cloned()
            .ok_or_else(|| MidiError::PortNotFound(selector.to_string())),
        PortSelector::Name(name) => {
            let needle = name.to_lowercase();
            ports
                .iter()
                .find(|port| {
                    midi_in
                        .port_name(port)
                        .map(|n| n.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
                .cloned()
                .ok_or(MidiError::PortNotFound(name))
        }
    }
}

fn prompt_for_port(
    midi_in: &MidiInput,
    ports: &[MidiInputPort],
) -> Result<MidiInputPort, MidiError> {
    println!("Available MIDI input ports:");
    for (index, port) in ports.iter().enumerate() {
        println!("  {}: {}", index, midi_in.port_name(port)?);
    }
    print!("Select input port: ");
    stdout().flush()?;

    let mut line = String::new();
    stdin().read_line(&mut line)?;
    let index = line
        .trim()
        .parse::<usize>()
        .map_err(|_| MidiError::InvalidSelection(line.trim().to_string()))?;

    ports
        .get(index)
        .cloned()
        .ok_or_else(|| MidiError::InvalidSelection(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parses_index() {
        assert_eq!(PortSelector::parse("2"), PortSelector::Index(2));
        assert_eq!(PortSelector::parse(" 0 "), PortSelector::Index(0));
    }

    #[test]
    fn test_selector_parses_name() {
        assert_eq!(
            PortSelector::parse("nanoKONTROL"),
            PortSelector::Name("nanoKONTROL".to_string())
        );
        // Mixed input is treated as a name.
        assert_eq!(
            PortSelector::parse("2i2 MIDI"),
            PortSelector::Name("2i2 MIDI".to_string())
        );
    }
}
