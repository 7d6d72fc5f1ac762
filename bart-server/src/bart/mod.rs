//! BART legacy API client.
//!
//! This module provides an HTTP client for the two BART feeds the board
//! needs, and the normalizer that turns their loosely shaped JSON into
//! fixed records.
//!
//! Key characteristics of the feeds:
//! - JSON is generated from XML, so single results may be bare objects
//!   and attributes may be `@`-prefixed keys
//! - The API key travels as a query parameter, never a header
//! - The real-time feed reports whole minutes, or `Leaving` for a train
//!   at the platform

mod client;
mod error;
mod mock;
pub mod normalize;
mod source;

pub use client::{BartClient, BartConfig};
pub use error::BartError;
pub use mock::MockBartClient;
pub use normalize::{EstimateRecord, EtdBoard, EtdGroup, ShapeError, TripCandidate};
pub use source::{Feed, FeedSource};
