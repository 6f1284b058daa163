//! Interactive console shell.
//!
//! One thread reads commands from stdin, one prints engine events. The
//! shell owns shutdown: closing stdin or typing `quit` stops the engine.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use elements_codec::Surface;
use elements_ipc::{ClientCommand, ClientEvent};

fn print_help() {
    println!("Commands: start, stop, reset, state, snap [path], help, quit");
}

/// Spawn the stdin command reader.
pub fn spawn_input_thread(
    command_tx: Sender<ClientCommand>,
    surface: Arc<Mutex<Surface>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        print_help();

        let send = |command: ClientCommand| {
            if command_tx.send(command).is_err() {
                warn!("Engine is no longer accepting commands");
            }
        };

        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };

            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("start") => send(ClientCommand::StartCamera),
                Some("stop") => send(ClientCommand::StopCamera),
                Some("reset") => send(ClientCommand::Reset),
                Some("state") => send(ClientCommand::GetState),
                Some("snap") => save_snapshot(&surface, parts.next().unwrap_or("frame.png")),
                Some("help") => print_help(),
                Some("quit") | Some("exit") => break,
                Some(other) => println!("Unknown command '{}'; try 'help'", other),
                None => {}
            }
        }

        let _ = command_tx.send(ClientCommand::Shutdown);
    })
}

/// Write the most recent processed frame to `path`.
fn save_snapshot(surface: &Mutex<Surface>, path: &str) {
    let surface = surface.lock();
    if surface.generation() == 0 {
        println!("No processed frame yet");
        return;
    }
    match surface.as_image().save(path) {
        Ok(()) => println!(
            "Saved {}x{} frame to {}",
            surface.width(),
            surface.height(),
            path
        ),
        Err(e) => warn!("Failed to save snapshot: {}", e),
    }
}

/// Spawn the engine event printer.
pub fn spawn_event_thread(event_rx: Receiver<ClientEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        for event in event_rx.iter() {
            match event {
                ClientEvent::StateChanged { previous, current } => {
                    debug!(from = previous.name(), to = current.name(), "Loop state");
                }
                ClientEvent::PermissionAlert { message } => {
                    error!("Camera access denied: {}", message);
                    println!("Camera permission is required to play. Grant access and try 'start' again.");
                }
                ClientEvent::Stats(stats) => {
                    info!(
                        fps = stats.fps,
                        round_trips = stats.round_trips,
                        transport_failures = stats.transport_failures,
                        server_failures = stats.server_failures,
                        "Loop stats"
                    );
                }
                ClientEvent::GameUpdated(snapshot) => {
                    if snapshot.gold_achieved {
                        println!("Gold achieved!");
                    }
                    debug!(effects = ?snapshot.active_effects, "Game updated");
                }
                ClientEvent::Error {
                    recoverable,
                    message,
                } => {
                    warn!(recoverable, "Engine error: {}", message);
                }
                ClientEvent::Ready => info!("Engine ready"),
                ClientEvent::Shutdown => info!("Engine shut down"),
            }
        }
    })
}
