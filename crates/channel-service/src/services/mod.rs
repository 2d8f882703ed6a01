//! Business logic services
//!
//! This module contains the service layer implementations that handle
//! validation and orchestration of domain operations.

pub mod channel;
pub mod context;
pub mod error;
pub mod subscriber;

// Re-export all services for convenience
pub use channel::ChannelService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use subscriber::SubscriberService;
