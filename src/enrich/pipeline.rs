//! Background enrichment pipeline.
//!
//! Fire-and-forget post-processing for saved notes: transcribe the audio,
//! generate a title, persist both. Every step is independently fallible and
//! falls back to placeholder content; a saved record always leaves the
//! "processing" sentinel, even when the external services are unreachable.

use crate::audio::AudioBlob;
use crate::enrich::config::EnrichmentConfig;
use crate::enrich::service::EnrichmentService;
use crate::store::note::{NoteFields, DEFAULT_TITLE, FALLBACK_TITLE, FALLBACK_TRANSCRIPT};
use crate::store::NoteStore;
use crate::{Result, VoxnoteError};
use crossbeam_channel::{bounded, Receiver, Sender};
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Commands that can be sent to the enrichment pipeline
#[derive(Debug, Clone)]
pub enum EnrichCommand {
    /// Enrich one freshly saved note
    Process {
        /// Unique task id for tracking
        task_id: Uuid,
        /// Store id of the placeholder record
        note_id: i64,
        /// The recorded payload
        audio: AudioBlob,
    },

    /// Generate highlight phrases across a set of transcripts
    Highlights {
        task_id: Uuid,
        transcripts: Vec<String>,
    },

    /// Shutdown the pipeline
    Shutdown,
}

/// Events emitted by the enrichment pipeline
#[derive(Debug, Clone)]
pub enum EnrichEvent {
    /// A note reached its final state
    NoteEnriched { note_id: i64, title: String },

    /// Highlights for an earlier request are ready
    HighlightsReady {
        task_id: Uuid,
        highlights: Vec<String>,
    },

    /// A background step degraded to fallback content (toast/log only)
    Degraded { message: String },

    /// Pipeline has shut down
    Shutdown,
}

/// Handle for feeding the pipeline and polling its events
#[derive(Clone)]
pub struct EnrichmentHandle {
    command_tx: Sender<EnrichCommand>,
    event_rx: Receiver<EnrichEvent>,
}

impl EnrichmentHandle {
    /// Enqueue enrichment for a saved note. Never blocks the save path;
    /// exactly one task is enqueued per saved record.
    pub fn enqueue_note(&self, note_id: i64, audio: AudioBlob) -> Result<Uuid> {
        let task_id = Uuid::new_v4();
        self.command_tx
            .try_send(EnrichCommand::Process {
                task_id,
                note_id,
                audio,
            })
            .map_err(|e| VoxnoteError::ChannelError(format!("enqueue note: {}", e)))?;
        Ok(task_id)
    }

    /// Request highlights for a set of transcripts (e.g. a calendar month)
    pub fn request_highlights(&self, transcripts: Vec<String>) -> Result<Uuid> {
        let task_id = Uuid::new_v4();
        self.command_tx
            .try_send(EnrichCommand::Highlights {
                task_id,
                transcripts,
            })
            .map_err(|e| VoxnoteError::ChannelError(format!("request highlights: {}", e)))?;
        Ok(task_id)
    }

    /// Try to receive an event without blocking
    pub fn try_recv_event(&self) -> Option<EnrichEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive the next event, blocking until one arrives
    pub fn recv_event(&self) -> Option<EnrichEvent> {
        self.event_rx.recv().ok()
    }

    pub fn shutdown(&self) {
        let _ = self.command_tx.send(EnrichCommand::Shutdown);
    }
}

/// Enrichment pipeline with channel-based communication
pub struct EnrichmentPipeline {
    config: EnrichmentConfig,
    store: NoteStore,
    command_tx: Sender<EnrichCommand>,
    command_rx: Receiver<EnrichCommand>,
    event_tx: Sender<EnrichEvent>,
    event_rx: Receiver<EnrichEvent>,
}

impl EnrichmentPipeline {
    pub fn new(config: EnrichmentConfig, store: NoteStore) -> Self {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        Self {
            config,
            store,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Get a handle for enqueueing work and polling events
    pub fn handle(&self) -> EnrichmentHandle {
        EnrichmentHandle {
            command_tx: self.command_tx.clone(),
            event_rx: self.event_rx.clone(),
        }
    }

    /// Start the pipeline worker thread
    pub fn start_worker(self) -> Result<()> {
        let config = self.config.clone();
        let store = self.store.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        std::thread::spawn(move || {
            info!("Enrichment worker starting (enabled: {})", config.is_enabled());

            let runtime = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    let _ = event_tx.send(EnrichEvent::Degraded {
                        message: format!("enrichment unavailable: {}", e),
                    });
                    let _ = event_tx.send(EnrichEvent::Shutdown);
                    return;
                }
            };

            let service = EnrichmentService::new(config);

            loop {
                match command_rx.recv() {
                    Ok(EnrichCommand::Process {
                        task_id,
                        note_id,
                        audio,
                    }) => {
                        debug!("Enriching note {} (task {})", note_id, task_id);
                        let title =
                            runtime.block_on(enrich_note(&service, &store, note_id, &audio, &event_tx));
                        let _ = event_tx.send(EnrichEvent::NoteEnriched { note_id, title });
                    }
                    Ok(EnrichCommand::Highlights {
                        task_id,
                        transcripts,
                    }) => {
                        let highlights = runtime
                            .block_on(service.generate_highlights(&transcripts))
                            .unwrap_or_else(|e| {
                                warn!("Highlight generation failed: {}", e);
                                let _ = event_tx.send(EnrichEvent::Degraded {
                                    message: e.user_message(),
                                });
                                Vec::new()
                            });
                        let _ = event_tx.send(EnrichEvent::HighlightsReady {
                            task_id,
                            highlights,
                        });
                    }
                    Ok(EnrichCommand::Shutdown) | Err(_) => {
                        info!("Enrichment worker shutting down");
                        let _ = event_tx.send(EnrichEvent::Shutdown);
                        break;
                    }
                }
            }
        });

        Ok(())
    }
}

/// Run the enrichment steps for one note; always finalizes the record.
/// Returns the resolved title.
async fn enrich_note(
    service: &EnrichmentService,
    store: &NoteStore,
    note_id: i64,
    audio: &AudioBlob,
    event_tx: &Sender<EnrichEvent>,
) -> String {
    let (title, transcript) = if !service.is_enabled() {
        (DEFAULT_TITLE.to_string(), String::new())
    } else {
        let transcript = match service.transcribe(audio).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Transcription failed for note {}: {}", note_id, e);
                let _ = event_tx.send(EnrichEvent::Degraded {
                    message: e.user_message(),
                });
                FALLBACK_TRANSCRIPT.to_string()
            }
        };

        let title = if transcript == FALLBACK_TRANSCRIPT || transcript.is_empty() {
            // Nothing meaningful to title
            FALLBACK_TITLE.to_string()
        } else {
            match service.generate_title(&transcript).await {
                Ok(title) if !title.is_empty() => title,
                Ok(_) => FALLBACK_TITLE.to_string(),
                Err(e) => {
                    warn!("Title generation failed for note {}: {}", note_id, e);
                    FALLBACK_TITLE.to_string()
                }
            }
        };

        (title, transcript)
    };

    // The record may have been deleted mid-flight; that is tolerated
    if let Err(e) = store.update(note_id, NoteFields::enriched(title.as_str(), transcript.as_str())) {
        warn!("Could not finalize note {}: {}", note_id, e);
    } else {
        debug!("Note {} finalized as {:?}", note_id, title);
    }

    title
}
