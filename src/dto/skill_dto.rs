use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::models::skill::Skill;
use crate::dto::nullable;
use crate::utils::validation::{into_result, take_non_null};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct SkillPayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSkill {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillChanges {
    pub name: Option<String>,
}

impl SkillPayload {
    pub fn into_new(self) -> Result<NewSkill, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        let name = take_non_null(self.name, "name", true, &mut errors);
        match name {
            Some(name) if errors.errors().is_empty() => Ok(NewSkill { name }),
            _ => Err(errors),
        }
    }

    /// `partial` is PATCH: nothing is required.
    pub fn into_changes(self, partial: bool) -> Result<SkillChanges, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        let name = take_non_null(self.name, "name", !partial, &mut errors);
        into_result(errors)?;
        Ok(SkillChanges { name })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SkillResponse {
    pub id: i64,
    pub name: String,
}

impl From<Skill> for SkillResponse {
    fn from(value: Skill) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}
