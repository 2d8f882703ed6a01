//! Value objects - immutable types that represent domain concepts

mod roles;
mod snowflake;
mod source;

pub use roles::{normalize_roles, AllowedRoles, ROLE_SEPARATOR};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use source::{InvalidSourceOrigin, SourceOrigin};

pub(crate) use source::coerce_integer;
