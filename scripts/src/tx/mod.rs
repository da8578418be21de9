//! Everything talking to the ledger

pub mod abi;
pub mod client;
pub mod ledger;
pub mod reader;
pub mod sender;
