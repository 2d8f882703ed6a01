//! # channel-service
//!
//! Application layer: channel lifecycle, subscribe/unsubscribe orchestration,
//! subscriber listing, and the DTOs exchanged at the boundary.

pub mod dto;
pub mod services;

pub use services::{
    ChannelService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    SubscriberService,
};
