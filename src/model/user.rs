use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A local tracker profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// First character of the name, upper-cased, for avatar-style display
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}
