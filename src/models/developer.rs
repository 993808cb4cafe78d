use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored developer row. `id` is assigned by the upstream directory, never by the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Developer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub about: Option<String>,
    pub profile_photo: Option<String>,
    pub intro_video: Option<String>,
    pub resume: Option<String>,
}

impl Developer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
