use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dorm row from the `dorms` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dorm {
    pub id: Uuid,
    pub university_id: Uuid,
    pub short_name: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
