pub mod bootstrap;
pub mod config;
pub mod database;
pub mod docs;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod sync;
pub mod utils;

use crate::services::{developer_service::DeveloperService, skill_service::SkillService};
use crate::storage::MediaStorage;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub media: MediaStorage,
    pub developer_service: DeveloperService,
    pub skill_service: SkillService,
}

impl AppState {
    pub fn new(pool: PgPool, media: MediaStorage) -> Self {
        let developer_service = DeveloperService::new(pool.clone(), media.clone());
        let skill_service = SkillService::new(pool.clone());

        Self {
            pool,
            media,
            developer_service,
            skill_service,
        }
    }
}
