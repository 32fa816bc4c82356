// Library interface for jenkins-provision
// Exposes internal modules for testing and potential library usage

pub mod cli;
pub mod config;
pub mod container;
pub mod directories;
pub mod errors;
pub mod logging;
pub mod ports;
pub mod provisioner;
pub mod runtime;
pub mod suggestions;
