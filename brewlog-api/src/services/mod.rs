//! External service clients

pub mod enrichment_client;
pub mod webhook_notifier;

pub use enrichment_client::{EnrichmentClient, EnrichmentError, Recommendation};
pub use webhook_notifier::BackupNotifier;
