/// Persona Console - operator console core
///
/// Personality configuration engine, content lifecycle workflow and the
/// client side of the content service contract.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
