//! Binary-side application wiring.

pub(crate) mod command_dispatcher;
pub(crate) mod config;
pub(crate) mod context;
pub(crate) mod exit_handler;
pub(crate) mod progress;
pub(crate) mod runtime;
pub(crate) mod settings;
pub(crate) mod terminal;
