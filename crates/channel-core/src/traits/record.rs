//! Persisted-record capability shared by channels and subscribers

use crate::value_objects::Snowflake;

/// A record that is identified once it has been saved
pub trait Record {
    /// Identifier assigned by the first successful save
    fn id(&self) -> Option<Snowflake>;

    /// True until the record has been saved
    fn is_new_record(&self) -> bool {
        self.id().is_none()
    }
}
