//! Scripts for deploying and upgrading UUPS proxies from compiled Hardhat artifacts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod backend;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod deployments;
pub mod erc1967;
pub mod errors;
pub mod presets;
mod solidity;
pub mod types;
pub mod utils;
