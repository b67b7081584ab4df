//! Scripts for deploying and managing the dice game contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod context;
pub mod deployments;
pub mod errors;
pub mod procedures;
mod solidity;
pub mod types;
pub mod utils;
