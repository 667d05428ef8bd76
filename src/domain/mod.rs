// Patient input and rule-based commentary
pub mod health;

// Market data domain
pub mod market;

// Feature layouts, scalers, metrics
pub mod ml;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
