use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: i64,
    pub name: String,
}

/// One row of the developer/skill relation joined with the skill name.
#[derive(Debug, Clone, FromRow)]
pub struct DeveloperSkill {
    pub developer_id: i64,
    pub skill_id: i64,
    pub name: String,
}
