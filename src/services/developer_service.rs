use std::collections::{BTreeSet, HashMap};

use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::dto::developer_dto::{DeveloperChanges, NewDeveloper};
use crate::error::{Error, Result};
use crate::models::developer::Developer;
use crate::models::skill::{DeveloperSkill, Skill};
use crate::services::skill_service::SkillService;
use crate::storage::{AssetKind, AssetUpload, MediaStorage};
use crate::utils::validation::field_error;

const DEVELOPER_COLUMNS: &str =
    "id, first_name, last_name, email, about, profile_photo, intro_video, resume";

#[derive(Clone)]
pub struct DeveloperService {
    pool: PgPool,
    media: MediaStorage,
}

#[derive(Debug, Clone)]
pub struct DeveloperWithSkills {
    pub developer: Developer,
    pub skills: Vec<Skill>,
}

impl DeveloperService {
    pub fn new(pool: PgPool, media: MediaStorage) -> Self {
        Self { pool, media }
    }

    pub async fn list(&self) -> Result<Vec<DeveloperWithSkills>> {
        let developers = sqlx::query_as::<_, Developer>(&format!(
            "SELECT {} FROM developers ORDER BY id",
            DEVELOPER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = developers.iter().map(|d| d.id).collect();
        let mut conn = self.pool.acquire().await?;
        let mut skills = Self::skills_for(&mut conn, &ids).await?;

        Ok(developers
            .into_iter()
            .map(|developer| {
                let skills = skills.remove(&developer.id).unwrap_or_default();
                DeveloperWithSkills { developer, skills }
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<DeveloperWithSkills> {
        let developer = sqlx::query_as::<_, Developer>(&format!(
            "SELECT {} FROM developers WHERE id = $1",
            DEVELOPER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        let mut conn = self.pool.acquire().await?;
        let skills = Self::skills_of(&mut conn, id).await?;
        Ok(DeveloperWithSkills { developer, skills })
    }

    pub async fn create(
        &self,
        new: NewDeveloper,
        uploads: Vec<AssetUpload>,
    ) -> Result<DeveloperWithSkills> {
        let mut tx = self.pool.begin().await?;

        if Self::id_taken(&mut tx, new.id).await? {
            return Err(Error::Conflict(
                "developer with this id already exists.".to_string(),
            ));
        }
        if Self::email_taken(&mut tx, &new.email, None).await? {
            return Err(Error::Conflict(
                "developer with this email already exists.".to_string(),
            ));
        }
        Self::ensure_skills_exist(&mut tx, &new.skill_ids).await?;

        let assets = self.store_uploads(&uploads).await?;
        let outcome = Self::insert_record(tx, &new, &assets).await;
        let record = self.discard_on_error(&assets, outcome).await?;

        tracing::info!(
            developer_id = record.developer.id,
            name = %record.developer.full_name(),
            skills = record.skills.len(),
            "Developer created"
        );
        Ok(record)
    }

    async fn insert_record(
        mut tx: Transaction<'_, Postgres>,
        new: &NewDeveloper,
        assets: &HashMap<AssetKind, String>,
    ) -> Result<DeveloperWithSkills> {
        let developer = sqlx::query_as::<_, Developer>(&format!(
            r#"
            INSERT INTO developers (
                id, first_name, last_name, email, about, profile_photo, intro_video, resume
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            DEVELOPER_COLUMNS
        ))
        .bind(new.id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.about)
        .bind(assets.get(&AssetKind::ProfilePhoto).cloned())
        .bind(assets.get(&AssetKind::IntroVideo).cloned())
        .bind(assets.get(&AssetKind::Resume).cloned())
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_skills(&mut tx, developer.id, &new.skill_ids).await?;
        let skills = Self::skills_of(&mut tx, developer.id).await?;
        tx.commit().await?;
        Ok(DeveloperWithSkills { developer, skills })
    }

    /// Applies PUT or PATCH changes. Omitted fields keep their stored value and
    /// `skill_ids`, when present, replaces the whole skill set.
    pub async fn update(
        &self,
        id: i64,
        changes: DeveloperChanges,
        uploads: Vec<AssetUpload>,
    ) -> Result<DeveloperWithSkills> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Developer>(&format!(
            "SELECT {} FROM developers WHERE id = $1 FOR UPDATE",
            DEVELOPER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found(id))?;

        if let Some(email) = changes.email.as_deref() {
            if email != current.email && Self::email_taken(&mut tx, email, Some(id)).await? {
                return Err(Error::Conflict(
                    "developer with this email already exists.".to_string(),
                ));
            }
        }
        if let Some(skill_ids) = changes.skill_ids.as_deref() {
            Self::ensure_skills_exist(&mut tx, skill_ids).await?;
        }

        let uploaded = self.store_uploads(&uploads).await?;
        let outcome = Self::update_record(tx, current, changes, &uploaded).await;
        let record = self.discard_on_error(&uploaded, outcome).await?;

        tracing::info!(developer_id = id, "Developer updated");
        Ok(record)
    }

    async fn update_record(
        mut tx: Transaction<'_, Postgres>,
        current: Developer,
        changes: DeveloperChanges,
        uploaded: &HashMap<AssetKind, String>,
    ) -> Result<DeveloperWithSkills> {
        let asset = |kind: AssetKind, stored: Option<String>| match uploaded.get(&kind) {
            Some(path) => Some(path.clone()),
            None if changes.cleared_assets.contains(&kind) => None,
            None => stored,
        };
        let profile_photo = asset(AssetKind::ProfilePhoto, current.profile_photo);
        let intro_video = asset(AssetKind::IntroVideo, current.intro_video);
        let resume = asset(AssetKind::Resume, current.resume);

        let developer = sqlx::query_as::<_, Developer>(&format!(
            r#"
            UPDATE developers
            SET
                first_name = $2,
                last_name = $3,
                email = $4,
                about = $5,
                profile_photo = $6,
                intro_video = $7,
                resume = $8
            WHERE id = $1
            RETURNING {}
            "#,
            DEVELOPER_COLUMNS
        ))
        .bind(current.id)
        .bind(changes.first_name.unwrap_or(current.first_name))
        .bind(changes.last_name.unwrap_or(current.last_name))
        .bind(changes.email.unwrap_or(current.email))
        .bind(changes.about.unwrap_or(current.about))
        .bind(profile_photo)
        .bind(intro_video)
        .bind(resume)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(skill_ids) = changes.skill_ids.as_deref() {
            Self::replace_skills(&mut tx, developer.id, skill_ids).await?;
        }
        let skills = Self::skills_of(&mut tx, developer.id).await?;
        tx.commit().await?;
        Ok(DeveloperWithSkills { developer, skills })
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let unlinked = sqlx::query("DELETE FROM developer_skills WHERE developer_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM developers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(not_found(id));
        }

        tx.commit().await?;
        tracing::info!(developer_id = id, unlinked_skills = unlinked, "Developer deleted");
        Ok(())
    }

    /// Insert-or-overwrite of the profile fields owned by the external directory.
    /// Returns `true` when the row was created.
    pub async fn upsert_profile(
        &self,
        id: i64,
        email: Option<&str>,
        first_name: &str,
        last_name: &str,
        about: &str,
    ) -> Result<bool> {
        let created = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO developers (id, email, first_name, last_name, about)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                about = EXCLUDED.about
            RETURNING (xmax = 0) AS created
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .bind(about)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Links the developer to each skill; links that already exist are left alone.
    pub async fn add_skills(
        conn: &mut PgConnection,
        developer_id: i64,
        skill_ids: &[i64],
    ) -> Result<u64> {
        let ids: Vec<i64> = skill_ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if ids.is_empty() {
            return Ok(0);
        }
        let added = sqlx::query(
            r#"
            INSERT INTO developer_skills (developer_id, skill_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(developer_id)
        .bind(&ids)
        .execute(&mut *conn)
        .await?
        .rows_affected();
        Ok(added)
    }

    pub async fn remove_skills(
        conn: &mut PgConnection,
        developer_id: i64,
        skill_ids: &[i64],
    ) -> Result<u64> {
        if skill_ids.is_empty() {
            return Ok(0);
        }
        let removed = sqlx::query(
            "DELETE FROM developer_skills WHERE developer_id = $1 AND skill_id = ANY($2)",
        )
        .bind(developer_id)
        .bind(skill_ids)
        .execute(&mut *conn)
        .await?
        .rows_affected();
        Ok(removed)
    }

    /// Makes the developer's skill set equal to `skill_ids` (duplicates collapse).
    pub async fn replace_skills(
        conn: &mut PgConnection,
        developer_id: i64,
        skill_ids: &[i64],
    ) -> Result<()> {
        let linked: BTreeSet<i64> = sqlx::query_scalar::<_, i64>(
            "SELECT skill_id FROM developer_skills WHERE developer_id = $1",
        )
        .bind(developer_id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();
        let wanted: BTreeSet<i64> = skill_ids.iter().copied().collect();

        let stale: Vec<i64> = linked.difference(&wanted).copied().collect();
        let missing: Vec<i64> = wanted.difference(&linked).copied().collect();
        Self::remove_skills(conn, developer_id, &stale).await?;
        Self::add_skills(conn, developer_id, &missing).await?;
        Ok(())
    }

    /// Expanded skill lists keyed by developer id, each sorted by skill id.
    pub async fn skills_for(
        conn: &mut PgConnection,
        developer_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Skill>>> {
        let mut grouped: HashMap<i64, Vec<Skill>> = HashMap::new();
        if developer_ids.is_empty() {
            return Ok(grouped);
        }

        let rows = sqlx::query_as::<_, DeveloperSkill>(
            r#"
            SELECT ds.developer_id, s.id AS skill_id, s.name
            FROM developer_skills ds
            JOIN skills s ON s.id = ds.skill_id
            WHERE ds.developer_id = ANY($1)
            ORDER BY ds.developer_id, s.id
            "#,
        )
        .bind(developer_ids)
        .fetch_all(&mut *conn)
        .await?;

        for row in rows {
            grouped.entry(row.developer_id).or_default().push(Skill {
                id: row.skill_id,
                name: row.name,
            });
        }
        Ok(grouped)
    }

    async fn skills_of(conn: &mut PgConnection, developer_id: i64) -> Result<Vec<Skill>> {
        let mut grouped = Self::skills_for(conn, &[developer_id]).await?;
        Ok(grouped.remove(&developer_id).unwrap_or_default())
    }

    async fn ensure_skills_exist(conn: &mut PgConnection, skill_ids: &[i64]) -> Result<()> {
        let missing = SkillService::missing_ids(conn, skill_ids).await?;
        if missing.is_empty() {
            return Ok(());
        }
        let message = missing
            .iter()
            .map(|id| format!("Invalid pk \"{}\" - object does not exist.", id))
            .collect::<Vec<_>>()
            .join(" ");
        Err(field_error("skill_ids", "does_not_exist", message).into())
    }

    async fn id_taken(conn: &mut PgConnection, id: i64) -> Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM developers WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(taken)
    }

    async fn email_taken(conn: &mut PgConnection, email: &str, except: Option<i64>) -> Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM developers WHERE email = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&mut *conn)
        .await?;
        Ok(taken)
    }

    async fn store_uploads(&self, uploads: &[AssetUpload]) -> Result<HashMap<AssetKind, String>> {
        Ok(self.media.save_all(uploads).await?.into_iter().collect())
    }

    // Files written for a request whose database work failed are not referenced by any row.
    async fn discard_on_error<T>(
        &self,
        stored: &HashMap<AssetKind, String>,
        outcome: Result<T>,
    ) -> Result<T> {
        if outcome.is_err() && !stored.is_empty() {
            let paths: Vec<&str> = stored.values().map(String::as_str).collect();
            self.media.remove_all(paths).await;
        }
        outcome
    }
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("Developer {} not found", id))
}
