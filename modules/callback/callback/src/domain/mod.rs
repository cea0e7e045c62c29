//! Domain layer for the callback module.

pub mod logic;
pub mod populator;
pub mod profile_manager;
pub mod session_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use logic::BridgeCallbackLogic;
pub use populator::populate_subject;
pub use profile_manager::ProfileManager;
pub use session_store::InMemorySessionStore;
