use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Schema only: no service or route reads employers yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub company_description: String,
}
