use crate::dto::skill_dto::{NewSkill, SkillChanges};
use crate::error::{Error, Result};
use crate::models::skill::Skill;
use sqlx::{PgConnection, PgPool};

#[derive(Clone)]
pub struct SkillService {
    pool: PgPool,
}

impl SkillService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Skill>> {
        let skills = sqlx::query_as::<_, Skill>("SELECT id, name FROM skills ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(skills)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Skill> {
        sqlx::query_as::<_, Skill>("SELECT id, name FROM skills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, new: NewSkill) -> Result<Skill> {
        let skill = sqlx::query_as::<_, Skill>(
            "INSERT INTO skills (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&new.name)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(skill_id = skill.id, name = %skill.name, "Skill created");
        Ok(skill)
    }

    pub async fn update(&self, id: i64, changes: SkillChanges) -> Result<Skill> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            UPDATE skills
            SET name = COALESCE($2, name)
            WHERE id = $1
            RETURNING id, name
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        tracing::info!(skill_id = skill.id, "Skill updated");
        Ok(skill)
    }

    /// Unlinks the skill from every developer, then deletes it; developers are kept.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let unlinked = sqlx::query("DELETE FROM developer_skills WHERE skill_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(not_found(id));
        }

        tx.commit().await?;
        tracing::info!(skill_id = id, unlinked_developers = unlinked, "Skill deleted");
        Ok(())
    }

    /// Returns the ids from `ids` that have no skill row, in input order.
    pub async fn missing_ids(conn: &mut PgConnection, ids: &[i64]) -> Result<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM skills WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&mut *conn)
            .await?;

        let mut missing = Vec::new();
        for id in ids {
            if !found.contains(id) && !missing.contains(id) {
                missing.push(*id);
            }
        }
        Ok(missing)
    }
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("Skill {} not found", id))
}
