use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::dto::skill_dto::SkillResponse;
use crate::dto::{lenient_id, lenient_ids, nullable};
use crate::models::{developer::Developer, skill::Skill};
use crate::storage::{AssetKind, MediaStorage};
use crate::utils::validation::{error_with_message, into_result, take_non_null};

const NOT_A_FILE: &str =
    "The submitted data was not a file. Check the encoding type on the form.";

/// Write shape shared by create, PUT and PATCH. Files arrive separately as multipart parts.
///
/// Every field is a double option so an explicit `null` can be told apart from an omitted field.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct DeveloperPayload {
    #[serde(default, deserialize_with = "lenient_id")]
    #[schema(value_type = Option<i64>)]
    pub id: Option<Option<i64>>,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub first_name: Option<Option<String>>,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub last_name: Option<Option<String>>,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub about: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile_photo: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub intro_video: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub resume: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient_ids")]
    #[schema(value_type = Option<Vec<i64>>)]
    pub skill_ids: Option<Option<Vec<i64>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeveloper {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub about: Option<String>,
    pub skill_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeveloperChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub about: Option<Option<String>>,
    /// Asset fields explicitly sent as null.
    pub cleared_assets: Vec<AssetKind>,
    pub skill_ids: Option<Vec<i64>>,
}

impl DeveloperPayload {
    pub fn into_new(self) -> Result<NewDeveloper, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        self.check_assets(&mut errors);

        let id = take_non_null(self.id, "id", true, &mut errors);
        let first_name = take_non_null(self.first_name, "first_name", true, &mut errors);
        let last_name = take_non_null(self.last_name, "last_name", true, &mut errors);
        let email = take_non_null(self.email, "email", true, &mut errors);
        let skill_ids = take_non_null(self.skill_ids, "skill_ids", true, &mut errors);

        match (id, first_name, last_name, email, skill_ids) {
            (Some(id), Some(first_name), Some(last_name), Some(email), Some(skill_ids))
                if errors.errors().is_empty() =>
            {
                Ok(NewDeveloper {
                    id,
                    first_name,
                    last_name,
                    email,
                    about: self.about.flatten(),
                    skill_ids,
                })
            }
            _ => Err(errors),
        }
    }

    /// `partial` is PATCH; PUT requires the same fields as create except `id`,
    /// which comes from the path and is ignored in the body.
    pub fn into_changes(self, partial: bool) -> Result<DeveloperChanges, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        self.check_assets(&mut errors);

        let required = !partial;
        let first_name = take_non_null(self.first_name, "first_name", required, &mut errors);
        let last_name = take_non_null(self.last_name, "last_name", required, &mut errors);
        let email = take_non_null(self.email, "email", required, &mut errors);
        let skill_ids = take_non_null(self.skill_ids, "skill_ids", required, &mut errors);
        into_result(errors)?;

        let cleared_assets = [
            (AssetKind::ProfilePhoto, &self.profile_photo),
            (AssetKind::IntroVideo, &self.intro_video),
            (AssetKind::Resume, &self.resume),
        ]
        .into_iter()
        .filter(|(_, value)| matches!(value, Some(None)))
        .map(|(kind, _)| kind)
        .collect();

        Ok(DeveloperChanges {
            first_name,
            last_name,
            email,
            about: self.about,
            cleared_assets,
            skill_ids,
        })
    }

    // Outside multipart an asset may only be cleared with null.
    fn check_assets(&self, errors: &mut ValidationErrors) {
        for (kind, value) in [
            (AssetKind::ProfilePhoto, &self.profile_photo),
            (AssetKind::IntroVideo, &self.intro_video),
            (AssetKind::Resume, &self.resume),
        ] {
            if matches!(value, Some(Some(_))) {
                errors.add(kind.field_name(), error_with_message("invalid", NOT_A_FILE));
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeveloperResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub about: Option<String>,
    pub profile_photo: Option<String>,
    pub intro_video: Option<String>,
    pub resume: Option<String>,
    pub skills: Vec<SkillResponse>,
}

impl DeveloperResponse {
    pub fn new(developer: Developer, skills: Vec<Skill>, media: &MediaStorage) -> Self {
        let url = |path: Option<String>| path.map(|p| media.url(&p));
        Self {
            id: developer.id,
            first_name: developer.first_name,
            last_name: developer.last_name,
            email: developer.email,
            about: developer.about,
            profile_photo: url(developer.profile_photo),
            intro_video: url(developer.intro_video),
            resume: url(developer.resume),
            skills: skills.into_iter().map(Into::into).collect(),
        }
    }
}
