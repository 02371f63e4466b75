//! Client for the lbx `/configs` API.

mod client;

pub use client::ConfigClient;
