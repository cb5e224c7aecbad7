pub mod config;
pub mod pipeline;
pub mod service;

pub use config::EnrichmentConfig;
pub use pipeline::{EnrichCommand, EnrichEvent, EnrichmentHandle, EnrichmentPipeline};
pub use service::{EnrichmentService, MAX_HIGHLIGHTS};
