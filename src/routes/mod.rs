//! Route modules for Submission Box

pub mod health;
pub mod submit;
