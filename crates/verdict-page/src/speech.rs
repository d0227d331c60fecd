//! Speech-output collaborator seam.
//!
//! Actual text-to-speech is out of scope; the runtime only needs "speak
//! this, cancelling whatever was playing". Absence of the capability is a
//! non-fatal condition surfaced to the caller, never a crash.

use thiserror::Error;

/// Speech rate used for verdict playback.
pub const VERDICT_SPEECH_RATE: f32 = 0.9;
/// Speech pitch used for verdict playback.
pub const VERDICT_SPEECH_PITCH: f32 = 1.0;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech output unavailable: {0}")]
    Unavailable(String),
}

/// Something that can play an utterance.
pub trait SpeechOutput {
    /// Cancels any in-flight utterance, then speaks `text`.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::Unavailable`] when the capability is absent.
    fn speak(&mut self, text: &str, rate: f32, pitch: f32) -> Result<(), SpeechError>;
}

/// Speech backend that narrates to the log instead of an audio device.
#[derive(Debug, Default)]
pub struct LoggingSpeech;

impl SpeechOutput for LoggingSpeech {
    fn speak(&mut self, text: &str, rate: f32, pitch: f32) -> Result<(), SpeechError> {
        tracing::info!(rate, pitch, "speaking verdict: {text}");
        Ok(())
    }
}

/// The capability-absent backend.
#[derive(Debug, Default)]
pub struct NoSpeech;

impl SpeechOutput for NoSpeech {
    fn speak(&mut self, _text: &str, _rate: f32, _pitch: f32) -> Result<(), SpeechError> {
        Err(SpeechError::Unavailable(
            "no speech synthesis capability in this context".to_owned(),
        ))
    }
}
