// === PUBLIC CONTRACT ===
// Other crates consume users through the contract module
pub mod contract;

pub use contract::{client, error, model};

// === MODULE WIRING ===
pub mod module;
pub use module::UserManagement;

// === INTERNAL MODULES ===
// Exposed for the server binary and for tests; external consumers should
// stick to `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
