//! Core library for vlcmidi: drive VLC's HTTP remote-control interface
//! from a MIDI controller.
//!
//! This crate provides:
//! - MIDI status-byte decoding and a poll-style input source (midir)
//! - A controller-value to command dispatcher
//! - A thin client for VLC's Lua HTTP interface
//! - YAML configuration loading
//!
//! # Data flow
//!
//! Raw MIDI bytes -> [`MidiMessage`] -> [`CommandDispatcher`] (filtered by
//! channel and controller number) -> registered action -> [`VlcClient`].

pub mod config;
pub mod dispatch;
pub mod midi;
pub mod vlc;

// Re-export main types
pub use config::{CommandSpec, Config, ConfigError, MidiConfig, VlcConfig};
pub use dispatch::{Action, CommandDispatcher};
pub use midi::{MidiError, MidiMessage, MidiSource, CONTROL_CHANGE};
pub use vlc::{VlcClient, VlcError};
