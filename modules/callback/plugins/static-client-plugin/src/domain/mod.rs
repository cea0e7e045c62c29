//! Domain layer for the static client plugin.

mod client;
pub mod service;

pub use service::StaticClient;
