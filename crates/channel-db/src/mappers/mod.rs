//! Entity to model mappers
//!
//! This module provides conversions between domain entities (channel-core) and database models.
//! - `TryFrom<Model> for Entity` / `From<Model> for Entity`: Convert database rows to
//!   domain objects
//! - `*Row` structs: Prepare entity data for database writes

mod channel;
mod subscriber;

pub use channel::{flag_to_i16, ChannelRow};
pub use subscriber::SubscriberRow;
