//! Frame-loop statistics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;

use elements_ipc::LoopStats;

/// Rolling window used to derive the effective cycle rate.
struct RateWindow {
    at: Instant,
    round_trips: u64,
}

/// Counters updated by the frame loop and read by the UI shell.
pub struct LoopMetrics {
    target_fps: f32,
    started_at: Mutex<Option<Instant>>,
    frames_captured: AtomicU64,
    round_trips: AtomicU64,
    transport_failures: AtomicU64,
    server_failures: AtomicU64,
    decode_drops: AtomicU64,
    capture_drops: AtomicU64,
    window: Mutex<RateWindow>,
}

impl LoopMetrics {
    pub fn new(target_fps: f32) -> Self {
        Self {
            target_fps,
            started_at: Mutex::new(None),
            frames_captured: AtomicU64::new(0),
            round_trips: AtomicU64::new(0),
            transport_failures: AtomicU64::new(0),
            server_failures: AtomicU64::new(0),
            decode_drops: AtomicU64::new(0),
            capture_drops: AtomicU64::new(0),
            window: Mutex::new(RateWindow {
                at: Instant::now(),
                round_trips: 0,
            }),
        }
    }

    /// Zero all counters and restart the uptime clock.
    pub fn reset(&self) {
        *self.started_at.lock() = Some(Instant::now());
        self.frames_captured.store(0, Ordering::Relaxed);
        self.round_trips.store(0, Ordering::Relaxed);
        self.transport_failures.store(0, Ordering::Relaxed);
        self.server_failures.store(0, Ordering::Relaxed);
        self.decode_drops.store(0, Ordering::Relaxed);
        self.capture_drops.store(0, Ordering::Relaxed);
        *self.window.lock() = RateWindow {
            at: Instant::now(),
            round_trips: 0,
        };
    }

    pub fn record_frame(&self) {
        self.frames_captured.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_round_trip(&self) {
        self.round_trips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_server_failure(&self) {
        self.server_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_drop(&self) {
        self.decode_drops.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_capture_drop(&self) {
        self.capture_drops.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frames_captured(&self) -> u64 {
        self.frames_captured.load(Ordering::Relaxed)
    }

    pub fn round_trips(&self) -> u64 {
        self.round_trips.load(Ordering::Relaxed)
    }

    pub fn capture_drops(&self) -> u64 {
        self.capture_drops.load(Ordering::Relaxed)
    }

    /// Snapshot the counters and advance the rate window.
    pub fn snapshot(&self) -> LoopStats {
        let round_trips = self.round_trips.load(Ordering::Relaxed);

        let mut window = self.window.lock();
        let elapsed = window.at.elapsed().as_secs_f32();
        let fps = if elapsed > 0.001 {
            (round_trips - window.round_trips) as f32 / elapsed
        } else {
            0.0
        };
        window.at = Instant::now();
        window.round_trips = round_trips;
        drop(window);

        let uptime_seconds = self
            .started_at
            .lock()
            .map(|at| at.elapsed().as_secs())
            .unwrap_or(0);

        LoopStats {
            fps,
            target_fps: self.target_fps,
            frames_captured: self.frames_captured.load(Ordering::Relaxed),
            round_trips,
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            server_failures: self.server_failures.load(Ordering::Relaxed),
            decode_drops: self.decode_drops.load(Ordering::Relaxed),
            capture_drops: self.capture_drops.load(Ordering::Relaxed),
            uptime_seconds,
        }
    }
}
