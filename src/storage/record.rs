//! Records stored alongside the index.

use serde::{Deserialize, Serialize};

use crate::common::{Error, Key, Result};

/// A student record keyed by roll number.
///
/// The tree indexes only `roll_no`; name and department live in the
/// record store. Serialized field names match the record file format
/// (`rollNo`, `name`, `department`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub roll_no: Key,
    pub name: String,
    pub department: String,
}

impl Record {
    /// Create a record.
    pub fn new(roll_no: Key, name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            roll_no,
            name: name.into(),
            department: department.into(),
        }
    }

    /// Reject records with a blank name or department.
    ///
    /// # Errors
    /// Returns `Error::InvalidRecord` naming the missing field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidRecord(format!(
                "roll number {} has no name",
                self.roll_no
            )));
        }
        if self.department.trim().is_empty() {
            return Err(Error::InvalidRecord(format!(
                "roll number {} has no department",
                self.roll_no
            )));
        }
        Ok(())
    }
}
