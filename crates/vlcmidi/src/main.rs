use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use vlcmidi_core::{CommandDispatcher, Config, MidiSource, VlcClient};

/// Interval between MIDI polls; bounds CPU usage while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Send VLC commands based on MIDI input messages.
#[derive(Parser, Debug)]
#[command(name = "vlcmidi")]
#[command(about = "Drive VLC's HTTP remote-control interface from a MIDI controller")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    config_file: PathBuf,

    /// MIDI input port (index or name substring); overrides the config file
    #[arg(long)]
    midi_port: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = Config::load(&args.config_file)
        .with_context(|| format!("loading config file {}", args.config_file.display()))?;

    let vlc = VlcClient::new(&config.vlc.host, config.vlc.port, &config.vlc.password);

    // Bind each command's name and extra parameters into its action up front;
    // the table is read-only once the loop starts.
    let mut dispatcher =
        CommandDispatcher::new(config.midi.channel, config.midi.controller_number);
    for (&controller_value, spec) in &config.commands {
        let vlc = vlc.clone();
        let command = spec.command.clone();
        let params = spec.query_params();
        dispatcher.register_command(
            controller_value,
            Box::new(move |value| {
                log::debug!("Controller value {} -> command '{}'", value, command);
                vlc.status_cmd(&command, &params)?;
                Ok(())
            }),
        );
    }

    let port = args.midi_port.as_deref().or(config.midi.port.as_deref());
    // MidiError is not Sync (midir's ConnectError holds the MidiInput), so it
    // can't go through anyhow's Context trait directly.
    let midi = MidiSource::open(port)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("opening MIDI input")?;

    log::info!("Entering main loop. Press Ctrl-C to exit.");
    loop {
        if let Some(message) = midi.poll_message() {
            // HTTP failures propagate and terminate the loop.
            dispatcher.process_message(&message)?;
        }
        thread::sleep(POLL_INTERVAL);
    }
}
