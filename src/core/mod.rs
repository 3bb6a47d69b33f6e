pub mod logging;

// Personality sliders, derived traits and the service document mapping
pub mod personality;

// Content lifecycle state machine and its async driver
pub mod content;

// Remote content/personality service contract
pub mod service;
