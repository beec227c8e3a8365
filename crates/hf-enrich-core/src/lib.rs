pub mod config;
pub mod enrich;
pub mod error;
pub mod mapping;
pub mod model;
pub mod openrouter;
pub mod snapshot;
pub mod stats;

#[cfg(feature = "network")]
pub mod api;
#[cfg(feature = "network")]
pub mod probe;

pub use error::EnrichError;
pub use model::{HfModel, Pricing, ProviderEntry, ProviderStatus};
pub use openrouter::{OrEndpoint, OrModel, OrPricing};
