//! Preloaded clip storage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hound::SampleFormat;
use tracing::info;

use crate::error::AudioError;
use crate::{AudioResult, CHANNELS, SAMPLE_RATE};

/// One decoded sound clip, interleaved stereo at the output sample rate.
#[derive(Debug, Clone)]
pub struct Clip {
    /// Event ID this clip answers to.
    pub name: String,

    /// Interleaved stereo f32 samples.
    pub samples: Arc<Vec<f32>>,
}

impl Clip {
    /// Create a clip from already-converted samples.
    pub fn new(name: impl Into<String>, samples: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            samples: Arc::new(samples),
        }
    }

    /// Clip length in stereo frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / CHANNELS as usize
    }
}

/// Mapping from event ID to a preloaded, reusable clip.
///
/// Initialized once at mount; lives for the component's lifetime.
#[derive(Debug, Default)]
pub struct SoundRegistry {
    clips: HashMap<String, Clip>,
}

impl SoundRegistry {
    /// Load all clips from `(event ID, path)` pairs.
    pub fn load(entries: &[(String, PathBuf)]) -> AudioResult<Self> {
        let mut clips = HashMap::with_capacity(entries.len());
        for (event, path) in entries {
            let samples = load_wav(path)?;
            info!(event = %event, path = %path.display(), "Preloaded sound clip");
            clips.insert(event.clone(), Clip::new(event.clone(), samples));
        }
        Ok(Self { clips })
    }

    /// Build a registry from in-memory clips.
    pub fn from_clips(clips: impl IntoIterator<Item = Clip>) -> Self {
        Self {
            clips: clips
                .into_iter()
                .map(|clip| (clip.name.clone(), clip))
                .collect(),
        }
    }

    /// Look up a clip by event ID.
    pub fn get(&self, event: &str) -> Option<&Clip> {
        self.clips.get(event)
    }

    /// Number of registered clips.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Returns true if no clips are registered.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Iterate over all clips.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.clips.values()
    }
}

/// Decode a WAV file to interleaved stereo f32 at the output sample rate.
fn load_wav(path: &Path) -> AudioResult<Vec<f32>> {
    let mut reader = hound::WavReader::open(path).map_err(|source| AudioError::ClipLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AudioError::ClipFormat {
            path: path.to_path_buf(),
            reason: "zero channels".to_string(),
        });
    }

    let raw: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|source| AudioError::ClipLoad {
                path: path.to_path_buf(),
                source,
            })?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|source| AudioError::ClipLoad {
                    path: path.to_path_buf(),
                    source,
                })?
        }
    };

    let stereo = to_stereo(&raw, spec.channels);
    Ok(resample_stereo(&stereo, spec.sample_rate, SAMPLE_RATE))
}

/// Convert interleaved samples of any channel count to interleaved stereo.
fn to_stereo(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        2 => samples.to_vec(),
        1 => samples.iter().flat_map(|&s| [s, s]).collect(),
        n => {
            // Keep the first two channels of wider layouts.
            let n = n as usize;
            samples
                .chunks_exact(n)
                .flat_map(|frame| [frame[0], frame[1]])
                .collect()
        }
    }
}

/// Linear resampling of interleaved stereo samples.
fn resample_stereo(samples: &[f32], from: u32, to: u32) -> Vec<f32> {
    if from == to || samples.is_empty() {
        return samples.to_vec();
    }

    let frames = samples.len() / 2;
    let out_frames = (frames as u64 * to as u64 / from as u64) as usize;
    let mut out = Vec::with_capacity(out_frames * 2);

    for i in 0..out_frames {
        let pos = i as f64 * from as f64 / to as f64;
        let idx = (pos as usize).min(frames - 1);
        let next = (idx + 1).min(frames - 1);
        let frac = (pos - idx as f64) as f32;

        for ch in 0..2 {
            let a = samples[idx * 2 + ch];
            let b = samples[next * 2 + ch];
            out.push(a + (b - a) * frac);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_wav(path: &Path, sample_rate: u32, channels: u16, frames: usize) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames * channels as usize {
            writer.write_sample((i % 128) as i16 * 256).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn temp_wav(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("elements-audio-test-{}-{}.wav", std::process::id(), name))
    }

    #[test]
    fn test_load_mono_wav_as_stereo() {
        let path = temp_wav("mono");
        write_test_wav(&path, SAMPLE_RATE, 1, 100);

        let entries = vec![("earth.wav".to_string(), path.clone())];
        let registry = SoundRegistry::load(&entries).unwrap();
        std::fs::remove_file(&path).ok();

        let clip = registry.get("earth.wav").unwrap();
        assert_eq!(clip.frames(), 100);
        // Mono duplicated into both channels.
        assert_eq!(clip.samples[0], clip.samples[1]);
    }

    #[test]
    fn test_resamples_to_output_rate() {
        let path = temp_wav("rate");
        write_test_wav(&path, SAMPLE_RATE / 2, 2, 100);

        let entries = vec![("water.wav".to_string(), path.clone())];
        let registry = SoundRegistry::load(&entries).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(registry.get("water.wav").unwrap().frames(), 200);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let entries = vec![(
            "fire.wav".to_string(),
            PathBuf::from("/nonexistent/fire.wav"),
        )];
        assert!(matches!(
            SoundRegistry::load(&entries),
            Err(AudioError::ClipLoad { .. })
        ));
    }

    #[test]
    fn test_lookup_by_event_id() {
        let registry = SoundRegistry::from_clips([Clip::new("air.wav", vec![0.0; 4])]);
        assert!(registry.get("air.wav").is_some());
        assert!(registry.get("unknown.wav").is_none());
    }
}
