//! Crop leaf diagnosis gateway.
//!
//! Accepts a leaf image over HTTP, forwards it to a vision language model with a
//! fixed diagnostic prompt, and relays the model's JSON verdict to the caller.

pub mod config;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod services;
pub mod startup;
