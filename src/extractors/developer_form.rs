//! Developer write body, accepted as JSON or as `multipart/form-data`.
//!
//! Multipart text parts are folded into the same JSON object the JSON path
//! deserializes, so both encodings share `DeveloperPayload` validation. File
//! parts for asset fields are kept in memory as `AssetUpload`s and written to
//! media storage by the service once the rest of the payload is known to be valid.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::{Map, Value};

use crate::dto::developer_dto::{DeveloperChanges, DeveloperPayload, NewDeveloper};
use crate::error::{Error, Result};
use crate::storage::{AssetKind, AssetUpload};

const DEVELOPER_ASSETS: [AssetKind; 3] = [
    AssetKind::ProfilePhoto,
    AssetKind::IntroVideo,
    AssetKind::Resume,
];

#[derive(Debug)]
pub struct DeveloperForm {
    pub payload: DeveloperPayload,
    pub uploads: Vec<AssetUpload>,
    pub multipart: bool,
}

impl DeveloperForm {
    pub fn into_new(self) -> Result<(NewDeveloper, Vec<AssetUpload>)> {
        let form = self.complete(false);
        Ok((form.payload.into_new()?, form.uploads))
    }

    pub fn into_changes(self, partial: bool) -> Result<(DeveloperChanges, Vec<AssetUpload>)> {
        let form = self.complete(partial);
        Ok((form.payload.into_changes(partial)?, form.uploads))
    }

    // A form body cannot carry an empty list, so a full multipart write without
    // `skill_ids` means no skills.
    fn complete(mut self, partial: bool) -> Self {
        if self.multipart && !partial && self.payload.skill_ids.is_none() {
            self.payload.skill_ids = Some(Some(Vec::new()));
        }
        self
    }
}

#[async_trait]
impl<S> FromRequest<S> for DeveloperForm
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| Error::BadRequest(e.body_text()))?;
            return from_multipart(multipart).await;
        }

        if content_type.is_empty() || content_type.starts_with("application/json") {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| Error::BadRequest(e.body_text()))?;
            let payload = if body.is_empty() {
                DeveloperPayload::default()
            } else {
                serde_json::from_slice(&body)?
            };
            return Ok(Self {
                payload,
                uploads: Vec::new(),
                multipart: false,
            });
        }

        Err(Error::UnsupportedMediaType(format!(
            "Unsupported media type \"{}\" in request.",
            content_type
        )))
    }
}

async fn from_multipart(mut multipart: Multipart) -> Result<DeveloperForm> {
    let mut fields = Map::new();
    let mut skill_ids: Option<Vec<Value>> = None;
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(kind) = AssetKind::from_field(&name).filter(|k| DEVELOPER_ASSETS.contains(k)) {
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let data = field.bytes().await?;
                    uploads.retain(|u: &AssetUpload| u.kind != kind);
                    uploads.push(AssetUpload {
                        kind,
                        file_name,
                        data,
                    });
                }
                None => {
                    // A plain text part: empty clears the asset, anything else is rejected later.
                    let text = field.text().await?;
                    let value = if text.is_empty() {
                        Value::Null
                    } else {
                        Value::String(text)
                    };
                    fields.insert(name, value);
                }
            }
            continue;
        }

        let text = field.text().await?;
        if name == "skill_ids" {
            let ids = skill_ids.get_or_insert_with(Vec::new);
            ids.extend(
                text.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string())),
            );
        } else if !name.is_empty() {
            fields.insert(name, Value::String(text));
        }
    }

    if let Some(ids) = skill_ids {
        fields.insert("skill_ids".to_string(), Value::Array(ids));
    }

    tracing::debug!(
        fields = fields.len(),
        uploads = uploads.len(),
        "Parsed multipart developer form"
    );

    let payload = serde_json::from_value(Value::Object(fields))?;
    Ok(DeveloperForm {
        payload,
        uploads,
        multipart: true,
    })
}
