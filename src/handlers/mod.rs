//! Command Handlers module
//!
//! Use-case handlers that orchestrate wallet operations.
//! Each handler coordinates domain services inside a unit of work.

mod commands;
mod wallet_handler;

pub use commands::*;
pub use wallet_handler::WalletHandler;
