//! The frame loop: capture, round trip, render, reschedule.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use parking_lot::{Mutex, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};

use elements_audio::EffectSink;
use elements_capture::FrameSource;
use elements_codec::{encode_frame, RenderSink, Surface, DEFAULT_JPEG_QUALITY};
use elements_ipc::{ClientCommand, ClientEvent, GameSnapshot, LoopState};
use elements_transport::{FrameProcessor, ProcessedFrameResult};

use crate::metrics::LoopMetrics;

/// Frame-loop tuning knobs.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Pacing interval between cycle starts.
    pub frame_interval: Duration,

    /// JPEG quality for outbound frames.
    pub jpeg_quality: u8,

    /// How often loop statistics are emitted.
    pub stats_interval: Duration,
}

impl LoopConfig {
    /// Config paced at `fps` cycles per second.
    pub fn for_fps(fps: u32) -> Self {
        Self {
            frame_interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            ..Self::default()
        }
    }

    /// Target cycle rate implied by the pacing interval.
    pub fn target_fps(&self) -> f32 {
        1.0 / self.frame_interval.as_secs_f32().max(f32::EPSILON)
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(33),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            stats_interval: Duration::from_secs(5),
        }
    }
}

/// Cancellation guard shared between the loop and whoever may stop it.
///
/// Cancelling is a synchronous flag flip; the loop observes it at the next
/// resumption point and performs no further work afterwards.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    alive: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Request cancellation. Returns immediately.
    pub fn cancel(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        !self.alive.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation before starting a new loop.
    pub(crate) fn rearm(&self) {
        self.alive.store(true, Ordering::SeqCst);
    }
}

impl Default for LoopHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared loop state with change notification.
pub(crate) struct StateCell {
    current: RwLock<LoopState>,
    event_tx: Sender<ClientEvent>,
}

impl StateCell {
    pub fn new(event_tx: Sender<ClientEvent>) -> Self {
        Self {
            current: RwLock::new(LoopState::Idle),
            event_tx,
        }
    }

    pub fn get(&self) -> LoopState {
        *self.current.read()
    }

    /// Transition to `next` and notify the UI.
    pub fn set(&self, next: LoopState) {
        let mut current = self.current.write();
        let previous = *current;
        if previous == next {
            return;
        }
        debug_assert!(
            previous.allows(next),
            "illegal transition {} -> {}",
            previous.name(),
            next.name()
        );
        *current = next;
        drop(current);

        trace!(from = previous.name(), to = next.name(), "Loop state changed");
        if let Err(e) = self.event_tx.try_send(ClientEvent::StateChanged {
            previous,
            current: next,
        }) {
            warn!("Dropping state event: {}", e);
        }
    }

    /// Silently return to `Idle`, starting a fresh state machine.
    pub fn rearm(&self) {
        *self.current.write() = LoopState::Idle;
    }
}

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopExit {
    /// The cancel guard fired.
    Cancelled,

    /// A stop command arrived; the engine stays up.
    StopRequested,

    /// A shutdown command arrived; the engine must exit.
    ShutdownRequested,
}

/// One running frame loop, borrowed from the controller for its lifetime.
///
/// The loop is a single sequential future: at most one frame is ever in
/// flight because the next capture cannot begin until the current round
/// trip resolves and the cycle reschedules.
pub(crate) struct FrameLoop<'a, S, P, D> {
    pub source: &'a mut S,
    pub processor: &'a P,
    pub dispatcher: &'a D,
    pub sink: &'a RenderSink,
    pub surface: &'a Mutex<Surface>,
    pub snapshot: &'a RwLock<GameSnapshot>,
    pub state: &'a StateCell,
    pub handle: &'a LoopHandle,
    pub metrics: &'a LoopMetrics,
    pub command_rx: &'a Receiver<ClientCommand>,
    pub event_tx: &'a Sender<ClientEvent>,
    pub config: LoopConfig,
}

impl<S, P, D> FrameLoop<'_, S, P, D>
where
    S: FrameSource,
    P: FrameProcessor,
    D: EffectSink,
{
    pub async fn run(mut self) -> LoopExit {
        debug!("Frame loop running");
        let mut ticker = tokio::time::interval(self.config.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_stats = Instant::now();

        loop {
            ticker.tick().await;
            if self.handle.is_cancelled() {
                return self.halt(LoopExit::Cancelled);
            }

            if let Some(exit) = self.drain_commands().await {
                return self.halt(exit);
            }
            if self.handle.is_cancelled() {
                return self.halt(LoopExit::Cancelled);
            }

            self.state.set(LoopState::Capturing);
            let frame = match self.source.grab() {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Frame capture failed: {}", e);
                    self.metrics.record_capture_drop();
                    self.state.set(LoopState::Scheduled);
                    continue;
                }
            };
            self.metrics.record_frame();

            let payload = match encode_frame(&frame, self.config.jpeg_quality) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Frame encoding failed: {}", e);
                    self.metrics.record_capture_drop();
                    self.state.set(LoopState::Scheduled);
                    continue;
                }
            };

            self.state.set(LoopState::AwaitingResponse);
            let result = self.processor.process_frame(&payload).await;

            // If cancellation landed while the round trip was in flight,
            // the result must have no observable effect.
            if self.handle.is_cancelled() {
                return self.halt(LoopExit::Cancelled);
            }

            match result {
                Ok(result) if result.success => {
                    self.state.set(LoopState::Rendering);
                    self.metrics.record_round_trip();

                    if let Some(image) = result.image.as_deref() {
                        let drawn = {
                            let mut surface = self.surface.lock();
                            self.sink.present(image, &mut surface)
                        };
                        if !drawn {
                            self.metrics.record_decode_drop();
                        }
                    }

                    if !result.sound_events.is_empty() {
                        self.dispatcher.trigger(&result.sound_events);
                    }
                    self.update_snapshot(&result);
                }
                Ok(result) => {
                    warn!(
                        error = result.error.as_deref().unwrap_or("unspecified"),
                        "Server failed to process frame"
                    );
                    self.metrics.record_server_failure();
                }
                Err(e) => {
                    warn!("Frame round trip failed: {}", e);
                    self.metrics.record_transport_failure();
                }
            }

            self.state.set(LoopState::Scheduled);

            if last_stats.elapsed() >= self.config.stats_interval {
                last_stats = Instant::now();
                self.send_event(ClientEvent::Stats(self.metrics.snapshot()));
            }
        }
    }

    /// Handle commands that arrived since the last cycle, without blocking.
    async fn drain_commands(&self) -> Option<LoopExit> {
        loop {
            match self.command_rx.try_recv() {
                Ok(ClientCommand::Reset) => {
                    run_reset(self.processor, self.dispatcher).await;
                }
                Ok(ClientCommand::StopCamera) => return Some(LoopExit::StopRequested),
                Ok(ClientCommand::Shutdown) => return Some(LoopExit::ShutdownRequested),
                Ok(ClientCommand::GetState) => {
                    let current = self.state.get();
                    self.send_event(ClientEvent::StateChanged {
                        previous: current,
                        current,
                    });
                }
                Ok(ClientCommand::StartCamera) => {
                    debug!("Loop already running, ignoring start");
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => return Some(LoopExit::ShutdownRequested),
            }
        }
    }

    /// Fold server-reported facts into the local snapshot.
    fn update_snapshot(&self, result: &ProcessedFrameResult) {
        let mut snapshot = self.snapshot.write();
        let mut changed = false;

        if let Some(gold) = result.gold_achieved {
            if snapshot.gold_achieved != gold {
                snapshot.gold_achieved = gold;
                changed = true;
            }
        }
        for event in &result.sound_events {
            changed |= snapshot.active_effects.insert(event.clone());
        }

        if changed {
            let copy = snapshot.clone();
            drop(snapshot);
            self.send_event(ClientEvent::GameUpdated(copy));
        }
    }

    fn halt(&self, exit: LoopExit) -> LoopExit {
        self.state.set(LoopState::Stopped);
        debug!(exit = ?exit, "Frame loop halted");
        exit
    }

    fn send_event(&self, event: ClientEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!("Dropping engine event: {}", e);
        }
    }
}

/// Run one reset round trip and silence local audio on success.
///
/// A failed reset changes nothing locally; the server keeps its state and
/// clips keep playing.
pub(crate) async fn run_reset<P, D>(processor: &P, dispatcher: &D)
where
    P: FrameProcessor,
    D: EffectSink,
{
    match processor.reset_game().await {
        Ok(()) => {
            debug!("Game reset acknowledged, silencing clips");
            dispatcher.stop_all();
        }
        Err(e) => warn!("Game reset failed: {}", e),
    }
}
