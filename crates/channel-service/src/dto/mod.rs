//! Data transfer objects for requests and responses
//!
//! This module provides:
//! - Request DTOs carrying raw channel attributes and subscriber input
//! - Response DTOs for serializing outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{CreateChannelRequest, CreateSubscriberRequest, UpdateChannelRequest};
pub use responses::{ChannelResponse, ChannelSubscribersResponse, SubscriberResponse};
