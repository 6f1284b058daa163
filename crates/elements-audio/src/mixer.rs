//! Clip mixing into one shared output stream.

use std::collections::HashMap;
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::registry::SoundRegistry;
use crate::{AudioResult, EffectSink, CHANNELS, SAMPLE_RATE};

/// Playback position of one clip.
struct Voice {
    samples: Arc<Vec<f32>>,
    cursor: usize,
    active: bool,
}

/// Shared playback state between the dispatcher and the output callback.
struct VoiceTable {
    voices: Mutex<HashMap<String, Voice>>,
}

impl VoiceTable {
    fn from_registry(registry: &SoundRegistry) -> Self {
        let voices = registry
            .clips()
            .map(|clip| {
                (
                    clip.name.clone(),
                    Voice {
                        samples: Arc::clone(&clip.samples),
                        cursor: 0,
                        active: false,
                    },
                )
            })
            .collect();

        Self {
            voices: Mutex::new(voices),
        }
    }

    /// Mix all active voices into `out`, advancing their cursors.
    fn mix_into(&self, out: &mut [f32]) {
        out.fill(0.0);

        let mut voices = self.voices.lock();
        for voice in voices.values_mut() {
            if !voice.active {
                continue;
            }

            let remaining = voice.samples.len() - voice.cursor;
            let count = remaining.min(out.len());
            for (dst, src) in out[..count]
                .iter_mut()
                .zip(&voice.samples[voice.cursor..voice.cursor + count])
            {
                *dst += src;
            }
            voice.cursor += count;

            if voice.cursor >= voice.samples.len() {
                voice.active = false;
                voice.cursor = 0;
            }
        }

        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }
}

/// Handle for triggering and silencing clips.
///
/// Cheap to clone; all clones share one voice table.
#[derive(Clone)]
pub struct EffectDispatcher {
    table: Arc<VoiceTable>,
}

impl EffectDispatcher {
    /// Returns true if the clip for `event` is currently playing.
    pub fn is_playing(&self, event: &str) -> bool {
        self.table
            .voices
            .lock()
            .get(event)
            .map(|voice| voice.active)
            .unwrap_or(false)
    }
}

impl EffectSink for EffectDispatcher {
    fn trigger(&self, events: &[String]) {
        let mut voices = self.table.voices.lock();
        for event in events {
            match voices.get_mut(event.as_str()) {
                Some(voice) => {
                    // Restart semantics: rewind whatever is playing and go
                    // again; never stack a second instance.
                    voice.cursor = 0;
                    voice.active = true;
                    debug!(event = %event, "Triggered clip");
                }
                None => {
                    debug!(event = %event, "Ignoring unknown sound event");
                }
            }
        }
    }

    fn stop_all(&self) {
        let mut voices = self.table.voices.lock();
        for voice in voices.values_mut() {
            voice.active = false;
            voice.cursor = 0;
        }
    }
}

/// Owns the cpal output stream that drains the voice table.
///
/// When no output device is available the mixer degrades to a silent no-op;
/// a missing sound card must never take the frame loop down.
pub struct ClipMixer {
    dispatcher: EffectDispatcher,
    _stream: Option<cpal::Stream>,
}

impl ClipMixer {
    /// Build the voice table from `registry` and start the output stream.
    pub fn start(registry: &SoundRegistry) -> AudioResult<Self> {
        let table = Arc::new(VoiceTable::from_registry(registry));
        let dispatcher = EffectDispatcher {
            table: Arc::clone(&table),
        };

        let stream = match open_output_stream(Arc::clone(&table)) {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!("Sound effects disabled: {}", e);
                None
            }
        };

        Ok(Self {
            dispatcher,
            _stream: stream,
        })
    }

    /// Get a dispatcher handle for this mixer.
    pub fn dispatcher(&self) -> EffectDispatcher {
        self.dispatcher.clone()
    }
}

fn open_output_stream(table: Arc<VoiceTable>) -> Result<cpal::Stream, String> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| "no default output device".to_string())?;

    let config = cpal::StreamConfig {
        channels: CHANNELS,
        sample_rate: cpal::SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Default,
    };

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                table.mix_into(data);
            },
            move |err| {
                warn!("Audio output error: {}", err);
            },
            None,
        )
        .map_err(|e| e.to_string())?;

    stream.play().map_err(|e| e.to_string())?;
    info!(sample_rate = SAMPLE_RATE, "Audio output stream started");
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Clip;

    fn dispatcher_with(clips: Vec<Clip>) -> EffectDispatcher {
        let registry = SoundRegistry::from_clips(clips);
        EffectDispatcher {
            table: Arc::new(VoiceTable::from_registry(&registry)),
        }
    }

    #[test]
    fn test_trigger_marks_clip_playing() {
        let dispatcher = dispatcher_with(vec![Clip::new("earth.wav", vec![0.5; 8])]);

        dispatcher.trigger(&["earth.wav".to_string()]);
        assert!(dispatcher.is_playing("earth.wav"));
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        let dispatcher = dispatcher_with(vec![Clip::new("earth.wav", vec![0.5; 8])]);

        dispatcher.trigger(&["mystery.wav".to_string(), "earth.wav".to_string()]);
        assert!(!dispatcher.is_playing("mystery.wav"));
        // Later events in the batch still fire.
        assert!(dispatcher.is_playing("earth.wav"));
    }

    #[test]
    fn test_clip_deactivates_when_exhausted() {
        let dispatcher = dispatcher_with(vec![Clip::new("air.wav", vec![0.25; 4])]);
        dispatcher.trigger(&["air.wav".to_string()]);

        let mut out = [0.0f32; 8];
        dispatcher.table.mix_into(&mut out);

        assert_eq!(&out[..4], &[0.25; 4]);
        assert_eq!(&out[4..], &[0.0; 4]);
        assert!(!dispatcher.is_playing("air.wav"));
    }

    #[test]
    fn test_retrigger_rewinds_mid_play() {
        let dispatcher = dispatcher_with(vec![Clip::new("water.wav", vec![0.5, 0.5, 0.9, 0.9])]);
        dispatcher.trigger(&["water.wav".to_string()]);

        let mut out = [0.0f32; 2];
        dispatcher.table.mix_into(&mut out);
        assert_eq!(out, [0.5, 0.5]);

        // Restart, never queue: playback resumes from the beginning.
        dispatcher.trigger(&["water.wav".to_string()]);
        dispatcher.table.mix_into(&mut out);
        assert_eq!(out, [0.5, 0.5]);
    }

    #[test]
    fn test_voices_mix_additively_and_clamp() {
        let dispatcher = dispatcher_with(vec![
            Clip::new("a", vec![0.75; 2]),
            Clip::new("b", vec![0.75; 2]),
        ]);
        dispatcher.trigger(&["a".to_string(), "b".to_string()]);

        let mut out = [0.0f32; 2];
        dispatcher.table.mix_into(&mut out);
        assert_eq!(out, [1.0, 1.0]);
    }

    #[test]
    fn test_stop_all_rewinds_everything() {
        let dispatcher = dispatcher_with(vec![
            Clip::new("a", vec![0.1; 8]),
            Clip::new("b", vec![0.2; 8]),
        ]);
        dispatcher.trigger(&["a".to_string(), "b".to_string()]);
        dispatcher.stop_all();

        assert!(!dispatcher.is_playing("a"));
        assert!(!dispatcher.is_playing("b"));

        let mut out = [0.0f32; 4];
        dispatcher.table.mix_into(&mut out);
        assert_eq!(out, [0.0; 4]);
    }
}
