//! Blocking engine controller.
//!
//! The controller owns the camera, the backend client, and the audio
//! dispatcher, and runs on its own thread. While idle it services commands
//! from the UI shell; on `StartCamera` it blocks on the frame loop until
//! the loop stops or is cancelled, then goes back to servicing commands.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use elements_audio::EffectSink;
use elements_capture::FrameSource;
use elements_codec::{RenderSink, Surface};
use elements_ipc::{ClientCommand, ClientEvent, GameSnapshot};
use elements_transport::FrameProcessor;

use crate::error::EngineResult;
use crate::metrics::LoopMetrics;
use crate::scheduler::{run_reset, FrameLoop, LoopConfig, LoopExit, LoopHandle, StateCell};

/// How long to block on the command channel per iteration while idle.
const COMMAND_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The engine controller.
///
/// Generic over its three seams so the lifecycle can be tested with
/// scripted components.
pub struct Controller<S, P, D> {
    source: S,
    processor: P,
    dispatcher: D,
    sink: RenderSink,
    surface: Arc<Mutex<Surface>>,
    snapshot: Arc<RwLock<GameSnapshot>>,
    state: StateCell,
    handle: LoopHandle,
    metrics: Arc<LoopMetrics>,
    command_rx: Receiver<ClientCommand>,
    event_tx: Sender<ClientEvent>,
    config: LoopConfig,
    runtime: tokio::runtime::Runtime,
    alert_shown: bool,
}

impl<S, P, D> Controller<S, P, D>
where
    S: FrameSource,
    P: FrameProcessor,
    D: EffectSink,
{
    pub fn new(
        source: S,
        processor: P,
        dispatcher: D,
        command_rx: Receiver<ClientCommand>,
        event_tx: Sender<ClientEvent>,
        config: LoopConfig,
    ) -> EngineResult<Self> {
        // The loop runs as one sequential future on this thread, so a
        // current-thread runtime is all it needs.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (width, height) = source.dimensions();
        Ok(Self {
            source,
            processor,
            dispatcher,
            sink: RenderSink::new(),
            surface: Arc::new(Mutex::new(Surface::new(width, height))),
            snapshot: Arc::new(RwLock::new(GameSnapshot::default())),
            state: StateCell::new(event_tx.clone()),
            handle: LoopHandle::new(),
            metrics: Arc::new(LoopMetrics::new(config.target_fps())),
            command_rx,
            event_tx,
            config,
            runtime,
            alert_shown: false,
        })
    }

    /// The render target processed frames are painted onto.
    pub fn surface_handle(&self) -> Arc<Mutex<Surface>> {
        Arc::clone(&self.surface)
    }

    /// The local game snapshot.
    pub fn snapshot_handle(&self) -> Arc<RwLock<GameSnapshot>> {
        Arc::clone(&self.snapshot)
    }

    /// Loop statistics.
    pub fn metrics_handle(&self) -> Arc<LoopMetrics> {
        Arc::clone(&self.metrics)
    }

    /// A guard other threads can use to cancel a running loop.
    ///
    /// Re-armed every time a new loop starts.
    pub fn cancel_handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Service commands until shutdown. Blocks the calling thread.
    pub fn run(&mut self) {
        info!("Engine controller started");
        self.send_event(ClientEvent::Ready);

        loop {
            match self.command_rx.recv_timeout(COMMAND_POLL_INTERVAL) {
                Ok(ClientCommand::StartCamera) => {
                    if !self.run_loop() {
                        break;
                    }
                }
                Ok(ClientCommand::StopCamera) => {
                    debug!("Loop not running, ignoring stop");
                }
                Ok(ClientCommand::Reset) => {
                    self.runtime
                        .block_on(run_reset(&self.processor, &self.dispatcher));
                }
                Ok(ClientCommand::GetState) => self.report_state(),
                Ok(ClientCommand::Shutdown) => break,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Command channel closed");
                    break;
                }
            }
        }

        self.source.stop();
        self.dispatcher.stop_all();
        self.send_event(ClientEvent::Shutdown);
        info!("Engine controller stopped");
    }

    /// Start the camera and block on the frame loop until it exits.
    ///
    /// Returns false when the loop exited because of a shutdown command.
    fn run_loop(&mut self) -> bool {
        if let Err(e) = self.source.start() {
            if e.is_permission_denied() {
                warn!("Camera permission denied: {}", e);
                // The alert stays up on the UI side; show it once.
                if !self.alert_shown {
                    self.alert_shown = true;
                    self.send_event(ClientEvent::PermissionAlert {
                        message: e.to_string(),
                    });
                }
            } else {
                error!("Camera start failed: {}", e);
                self.send_event(ClientEvent::Error {
                    recoverable: true,
                    message: e.to_string(),
                });
            }
            return true;
        }

        let (width, height) = self.source.dimensions();
        self.surface.lock().resize(width, height);
        self.handle.rearm();
        self.metrics.reset();
        info!(width, height, "Frame loop starting");

        let exit = self.runtime.block_on(
            FrameLoop {
                source: &mut self.source,
                processor: &self.processor,
                dispatcher: &self.dispatcher,
                sink: &self.sink,
                surface: self.surface.as_ref(),
                snapshot: self.snapshot.as_ref(),
                state: &self.state,
                handle: &self.handle,
                metrics: self.metrics.as_ref(),
                command_rx: &self.command_rx,
                event_tx: &self.event_tx,
                config: self.config.clone(),
            }
            .run(),
        );

        info!(exit = ?exit, "Frame loop exited");
        self.source.stop();
        self.state.rearm();

        !matches!(exit, LoopExit::ShutdownRequested)
    }

    fn report_state(&self) {
        let current = self.state.get();
        self.send_event(ClientEvent::StateChanged {
            previous: current,
            current,
        });
    }

    fn send_event(&self, event: ClientEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!("Dropping engine event: {}", e);
        }
    }
}
