//! Core business logic module
//!
//! This module contains the core transaction processing components:
//! - `traits` - Trait abstractions for interchangeable implementations
//! - `engine` - Transaction processing orchestration
//! - `account_manager` - Account registry and balance lookups
//! - `transaction_store` - Transaction storage and status lifecycle
//! - `fees` - Transfer fee policy

pub mod account_manager;
pub mod engine;
pub mod fees;
pub mod traits;
pub mod transaction_store;

pub use account_manager::AccountManager;
pub use engine::{Settlement, TransactionEngine};
pub use fees::{FeePolicy, DEFAULT_FEE_RATE};
pub use traits::TransactionLog;
pub use transaction_store::TransactionStore;
