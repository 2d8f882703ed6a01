//! # channel-db
//!
//! Database layer implementing the channel-core repository traits with
//! PostgreSQL via SQLx, plus an in-memory store for tests and development.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use channel_common::AppConfig;
//! use channel_db::{create_pool, run_migrations, PgChannelRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let pool = create_pool(&config.database).await?;
//!     run_migrations(&pool).await?;
//!     let channels = PgChannelRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, PgPool};
pub use repositories::{
    PgChannelRepository, PgSubscriberRepository, PgSubscriptionLinkRepository,
};
