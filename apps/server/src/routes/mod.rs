//! HTTP route handlers

pub mod answers;
pub mod bank;
pub mod navigation;
pub mod questions;
pub mod settings;
