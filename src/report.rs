use crate::{error::CleanerResult, registry::DisabledRecord};
use serde::Serialize;

pub const RC_SUCCESS: i32 = 0;
pub const RC_CHANGED: i32 = 200;
pub const RC_ERROR: i32 = 2;

/// Machine-readable summary printed on stdout once the run completes.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub disabled: &'a [DisabledRecord],
}

impl<'a> Report<'a> {
    pub fn new(disabled: &'a [DisabledRecord]) -> Self {
        Self { disabled }
    }

    /// Pretty printed JSON with sorted keys.
    pub fn render(&self) -> CleanerResult<String> {
        // Value objects are BTreeMap backed
        let value = serde_json::to_value(self)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    pub fn exit_code(&self) -> i32 {
        exit_code(!self.disabled.is_empty(), false)
    }
}

pub fn exit_code(disabled_any: bool, aborted: bool) -> i32 {
    if aborted {
        RC_ERROR
    } else if disabled_any {
        RC_CHANGED
    } else {
        RC_SUCCESS
    }
}
