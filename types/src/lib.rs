//! Fundamental types for the vault staking ledger.
//!
//! Every other crate in the workspace identifies accounts, asset units and
//! instants with the types defined here.

pub mod account;
pub mod time;
pub mod unit;

pub use account::AccountId;
pub use time::Timestamp;
pub use unit::UnitId;
