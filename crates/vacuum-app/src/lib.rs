//! Headless demo host for the particle vacuum effect.

pub mod config;
pub mod demo;
