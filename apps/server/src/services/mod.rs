//! Services used by the route handlers.

pub mod bank;
