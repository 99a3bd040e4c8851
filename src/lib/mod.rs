#[macro_use]
extern crate lazy_static;
extern crate tracing;

pub mod beszel;
pub mod cli;
pub mod logger;
pub mod server;
pub mod widget;
