// Session-scoped account state owner
pub mod account_store;

// Shared real-trading analysis sub-step
pub mod analyst;

// Advisory operation flags
pub mod busy;

// Trading-mode transition coordinator
pub mod mode;

// Exchange synchronization coordinator
pub mod sync;

// System orchestrator
pub mod system;
