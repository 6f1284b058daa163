//! Console client for the elements camera game.
//!
//! Captures webcam frames, sends them to the processing backend, keeps the
//! annotated result on a mirrored render surface, and plays the sound
//! effects the backend asks for. The engine runs on the main thread; the
//! interactive shell runs beside it.

mod config;
mod shell;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elements_audio::{ClipMixer, SoundRegistry};
use elements_capture::{CameraConfig, CameraSession, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use elements_engine::{Controller, LoopConfig};
use elements_ipc::{command_channel, event_channel, ClientCommand};
use elements_transport::GameClient;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "elements", about = "Camera client for the elements game backend")]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the config file).
    #[arg(long)]
    server: Option<String>,

    /// Camera index (overrides the config file).
    #[arg(long)]
    camera: Option<u32>,

    /// Start the camera immediately instead of waiting for `start`.
    #[arg(long)]
    autostart: bool,
}

/// Initialize logging.
fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "elements=info,elements_engine=info,elements_capture=info,elements_codec=info,elements_transport=info,elements_audio=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(server) = args.server {
        config.server_url = server;
    }
    if let Some(camera) = args.camera {
        config.camera_index = camera;
    }

    info!(server = %config.server_url, "Elements client starting");

    // A missing clip only mutes that one effect; the game stays playable.
    let entries: Vec<_> = config
        .sound_entries()
        .into_iter()
        .filter(|(event, path)| {
            if path.is_file() {
                true
            } else {
                warn!(event = %event, path = %path.display(), "Sound clip not found, effect muted");
                false
            }
        })
        .collect();
    let registry = SoundRegistry::load(&entries)?;
    let mixer = ClipMixer::start(&registry)?;

    let client = GameClient::new(&config.server_url)?;
    let camera = CameraSession::new(CameraConfig {
        index: config.camera_index,
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        fps: config.fps,
    });

    let (command_tx, command_rx) = command_channel();
    let (event_tx, event_rx) = event_channel();

    let loop_config = LoopConfig {
        jpeg_quality: config.jpeg_quality,
        ..LoopConfig::for_fps(config.fps)
    };
    let mut controller = Controller::new(
        camera,
        client,
        mixer.dispatcher(),
        command_rx,
        event_tx,
        loop_config,
    )?;

    if args.autostart {
        let _ = command_tx.send(ClientCommand::StartCamera);
    }

    let input = shell::spawn_input_thread(command_tx, controller.surface_handle());
    let printer = shell::spawn_event_thread(event_rx);

    // Blocks until the shell requests shutdown.
    controller.run();

    drop(controller);
    drop(mixer);
    input.join().ok();
    printer.join().ok();

    info!("Elements client stopped");
    Ok(())
}
