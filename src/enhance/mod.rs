//! Enhancement service integration

mod client;

pub use client::{EnhanceClient, EnhanceError, EnhanceRequest, EnhanceResponse};
