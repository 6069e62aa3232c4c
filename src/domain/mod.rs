//! Domain model: catalog entries, tokens, provisioning requests and results,
//! the gateway wire shapes and the ports the application layer depends on.

pub mod catalog;
pub mod gateway;
pub mod merchant;
pub mod ports;
pub mod provisioning;
pub mod token;
