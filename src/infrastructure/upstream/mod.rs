//! Upstream source implementations

pub mod congress;

pub use congress::{CongressApiClient, CongressApiConfig};
