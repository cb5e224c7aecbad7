use crate::audio::AudioBlob;

/// Sentinel title/transcript value while enrichment is in flight
pub const PROCESSING: &str = "processing";

/// Transcript substituted when the speech-to-text call fails
pub const FALLBACK_TRANSCRIPT: &str = "Transcription failed";

/// Title substituted when title generation fails
pub const FALLBACK_TITLE: &str = "Untitled Note";

/// Title assigned when enrichment is disabled by configuration
pub const DEFAULT_TITLE: &str = "Voice Note";

/// One persisted voice note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRecord {
    /// Store-assigned id, stable for the lifetime of the note
    pub id: i64,
    pub audio: AudioBlob,
    pub title: String,
    pub transcript: String,
    /// Creation timestamp in epoch milliseconds, immutable
    pub created_at_ms: i64,
    /// Human-readable mm:ss captured from the recording timer at stop time
    pub duration_label: String,
}

impl NoteRecord {
    /// Whether enrichment has not resolved the title/transcript yet
    pub fn is_processing(&self) -> bool {
        self.title == PROCESSING || self.transcript == PROCESSING
    }
}

/// A note as handed to the store at recording-stop time.
/// The store assigns the id and the creation timestamp.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub audio: AudioBlob,
    pub duration_label: String,
}

impl NewNote {
    pub fn new(audio: AudioBlob, duration_label: impl Into<String>) -> Self {
        Self {
            audio,
            duration_label: duration_label.into(),
        }
    }
}

/// Partial update applied by the enrichment pipeline.
#[derive(Debug, Clone, Default)]
pub struct NoteFields {
    pub title: Option<String>,
    pub transcript: Option<String>,
}

impl NoteFields {
    pub fn enriched(title: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            transcript: Some(transcript.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_state() {
        let record = NoteRecord {
            id: 1,
            audio: AudioBlob::wav(vec![0; 4]),
            title: PROCESSING.to_string(),
            transcript: PROCESSING.to_string(),
            created_at_ms: 0,
            duration_label: "00:05".to_string(),
        };
        assert!(record.is_processing());

        let finalized = NoteRecord {
            title: FALLBACK_TITLE.to_string(),
            transcript: FALLBACK_TRANSCRIPT.to_string(),
            ..record
        };
        assert!(!finalized.is_processing());
    }
}
