//! Scripts for deploying and initializing the bridge and test token contracts.

#![deny(missing_docs)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod errors;
mod solidity;
pub mod utils;
