use serde::{Deserialize, Serialize};

use crate::schema::FlexId;

/// A user returned by the responsible-user search. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: FlexId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
