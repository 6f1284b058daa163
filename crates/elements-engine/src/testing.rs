//! Scripted frame sources, processors, and sinks for loop tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use crossbeam_channel::{Receiver, Sender};
use image::{Rgb, RgbImage};
use parking_lot::{Mutex, RwLock};

use elements_audio::EffectSink;
use elements_capture::{CaptureError, CaptureResult, FrameSource, RawFrame};
use elements_codec::{to_data_url, FramePayload, RenderSink, Surface};
use elements_ipc::{ClientCommand, GameSnapshot, LoopState, LoopStats};
use elements_transport::{FrameProcessor, ProcessedFrameResult, TransportError, TransportResult};

use crate::metrics::LoopMetrics;
use crate::scheduler::{FrameLoop, LoopConfig, LoopExit, LoopHandle, StateCell};

/// Camera stand-in producing solid gray frames.
pub struct ScriptedSource {
    width: u32,
    height: u32,
    started: bool,
    grabs: u64,
    fail_first: bool,
    deny: bool,
}

impl ScriptedSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            started: false,
            grabs: 0,
            fail_first: false,
            deny: false,
        }
    }

    /// Make the first grab fail with a device error.
    pub fn fail_first_grab(mut self) -> Self {
        self.fail_first = true;
        self
    }

    /// Make every start attempt fail like a user refusing camera access.
    pub fn denied(mut self) -> Self {
        self.deny = true;
        self
    }
}

impl FrameSource for ScriptedSource {
    fn start(&mut self) -> CaptureResult<()> {
        if self.deny {
            return Err(CaptureError::PermissionDenied(
                "user refused camera access".to_string(),
            ));
        }
        self.started = true;
        Ok(())
    }

    fn grab(&mut self) -> CaptureResult<RawFrame> {
        if !self.started {
            return Err(CaptureError::NotStarted);
        }
        self.grabs += 1;
        if self.fail_first && self.grabs == 1 {
            return Err(CaptureError::Frame("scripted grab failure".to_string()));
        }

        let data = vec![128u8; RawFrame::rgb_buffer_size(self.width, self.height)];
        Ok(RawFrame::new(
            Bytes::from(data),
            self.width,
            self.height,
            self.grabs,
        ))
    }

    fn stop(&mut self) {
        self.started = false;
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_active(&self) -> bool {
        self.started
    }
}

/// One scripted backend response.
pub enum Reply {
    Success {
        image: Option<String>,
        sound_events: Vec<String>,
        gold_achieved: Option<bool>,
    },
    Failure(&'static str),
    Transport,
}

/// Backend stand-in replaying scripted responses.
///
/// Once the script runs out it answers with empty successes, so loops can
/// cycle indefinitely until a command stops them.
pub struct ScriptedProcessor {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicU64,
    resets: AtomicU64,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    stop_after: Option<(u64, Sender<ClientCommand>)>,
    cancel_on: Option<(u64, LoopHandle)>,
}

impl ScriptedProcessor {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicU64::new(0),
            resets: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            stop_after: None,
            cancel_on: None,
        }
    }

    /// Queue a stop command once `calls` round trips have started.
    pub fn stop_after(mut self, calls: u64, tx: Sender<ClientCommand>) -> Self {
        self.stop_after = Some((calls, tx));
        self
    }

    /// Fire the cancel guard while round trip number `call` is in flight.
    pub fn cancel_on_call(mut self, call: u64, handle: LoopHandle) -> Self {
        self.cancel_on = Some((call, handle));
        self
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> u64 {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl FrameProcessor for ScriptedProcessor {
    async fn process_frame(
        &self,
        _payload: &FramePayload,
    ) -> TransportResult<ProcessedFrameResult> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        // Simulated server latency.
        tokio::time::sleep(Duration::from_millis(5)).await;

        if let Some((at, handle)) = &self.cancel_on {
            if call == *at {
                handle.cancel();
            }
        }
        if let Some((at, tx)) = &self.stop_after {
            if call == *at {
                let _ = tx.try_send(ClientCommand::StopCamera);
            }
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.replies.lock().pop_front() {
            Some(Reply::Success {
                image,
                sound_events,
                gold_achieved,
            }) => Ok(ProcessedFrameResult {
                success: true,
                image,
                sound_events,
                error: None,
                gold_achieved,
            }),
            Some(Reply::Failure(message)) => Ok(ProcessedFrameResult {
                success: false,
                error: Some(message.to_string()),
                ..ProcessedFrameResult::default()
            }),
            Some(Reply::Transport) => Err(TransportError::Status(500)),
            None => Ok(ProcessedFrameResult {
                success: true,
                ..ProcessedFrameResult::default()
            }),
        }
    }

    async fn reset_game(&self) -> TransportResult<()> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Effect sink recording every dispatch.
#[derive(Default)]
pub struct RecordingSink {
    triggers: Mutex<Vec<Vec<String>>>,
    stop_alls: AtomicU64,
}

impl RecordingSink {
    pub fn trigger_batches(&self) -> Vec<Vec<String>> {
        self.triggers.lock().clone()
    }

    pub fn stop_alls(&self) -> u64 {
        self.stop_alls.load(Ordering::SeqCst)
    }
}

impl EffectSink for RecordingSink {
    fn trigger(&self, events: &[String]) {
        self.triggers.lock().push(events.to_vec());
    }

    fn stop_all(&self) {
        self.stop_alls.fetch_add(1, Ordering::SeqCst);
    }
}

/// A 2x1 PNG data URL with the given left and right pixels.
pub fn png_data_url_2x1(left: Rgb<u8>, right: Rgb<u8>) -> String {
    let mut image = RgbImage::new(2, 1);
    image.put_pixel(0, 0, left);
    image.put_pixel(1, 0, right);

    let mut bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .unwrap();
    to_data_url("image/png", &bytes)
}

/// Everything observable after one loop run.
pub struct LoopRun {
    pub exit: LoopExit,
    pub surface: Mutex<Surface>,
    pub snapshot: GameSnapshot,
    pub state: LoopState,
    pub stats: LoopStats,
}

/// Run one frame loop to completion against scripted components.
pub async fn drive(
    source: &mut ScriptedSource,
    processor: &ScriptedProcessor,
    dispatcher: &RecordingSink,
    commands: (Sender<ClientCommand>, Receiver<ClientCommand>),
    handle: &LoopHandle,
    pre: &[ClientCommand],
) -> LoopRun {
    let (command_tx, command_rx) = commands;
    let (event_tx, _event_rx) = elements_ipc::event_channel();

    for command in pre {
        command_tx.send(command.clone()).unwrap();
    }

    let config = LoopConfig {
        frame_interval: Duration::from_millis(1),
        stats_interval: Duration::from_secs(3600),
        ..LoopConfig::default()
    };

    let state = StateCell::new(event_tx.clone());
    let metrics = LoopMetrics::new(config.target_fps());
    metrics.reset();
    let surface = Mutex::new(Surface::new(2, 2));
    let snapshot = RwLock::new(GameSnapshot::default());
    let sink = RenderSink::new();

    source.start().unwrap();
    let exit = FrameLoop {
        source,
        processor,
        dispatcher,
        sink: &sink,
        surface: &surface,
        snapshot: &snapshot,
        state: &state,
        handle,
        metrics: &metrics,
        command_rx: &command_rx,
        event_tx: &event_tx,
        config,
    }
    .run()
    .await;

    let final_snapshot = snapshot.read().clone();
    LoopRun {
        exit,
        stats: metrics.snapshot(),
        snapshot: final_snapshot,
        state: state.get(),
        surface,
    }
}
