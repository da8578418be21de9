//! Ordered deployment of the registry contracts

pub mod coordinator;
pub mod plan;
pub mod predict;
pub mod registry;

#[cfg(test)]
pub(crate) mod mock;
