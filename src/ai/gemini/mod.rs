pub mod client;
pub mod enrichment;
pub mod types;

pub use enrichment::GeminiEnrichmentClient;
