use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::signups::Model as Signup;
pub use crate::entities::workshops::Model as Workshop;
pub use repositories::signup::NewSignup;

/// Service object carrying the database connection pool. Constructed once
/// at startup and handed to every consumer explicitly.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn workshop_repo(&self) -> repositories::workshop::WorkshopRepository {
        repositories::workshop::WorkshopRepository::new(self.conn.clone())
    }

    fn signup_repo(&self) -> repositories::signup::SignupRepository {
        repositories::signup::SignupRepository::new(self.conn.clone())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    // ========== Workshops ==========

    pub async fn insert_workshop(
        &self,
        title: &str,
        description: &str,
        date: &str,
        location: &str,
        max_capacity: i32,
    ) -> Result<i32> {
        self.workshop_repo()
            .insert(title, description, date, location, max_capacity)
            .await
    }

    pub async fn latest_workshop(&self) -> Result<Option<Workshop>> {
        self.workshop_repo().latest().await
    }

    pub async fn get_workshop(&self, id: i32) -> Result<Option<Workshop>> {
        self.workshop_repo().get(id).await
    }

    // ========== Signups ==========

    pub async fn insert_signup(&self, signup: &NewSignup) -> Result<Signup> {
        self.signup_repo().insert(signup).await
    }

    pub async fn count_signups(&self, workshop_id: i32) -> Result<i64> {
        self.signup_repo().count_for_workshop(workshop_id).await
    }

    pub async fn list_signups_desc(&self, workshop_id: i32) -> Result<Vec<Signup>> {
        self.signup_repo().list_desc(workshop_id).await
    }

    pub async fn list_signups_asc(&self, workshop_id: i32) -> Result<Vec<Signup>> {
        self.signup_repo().list_asc(workshop_id).await
    }

    // ========== Admin users ==========

    pub async fn admin_count(&self) -> Result<u64> {
        self.admin_repo().count().await
    }

    pub async fn get_password_hash(&self, username: &str) -> Result<Option<String>> {
        self.admin_repo().get_password_hash(username).await
    }

    pub async fn insert_admin(&self, username: &str, password_hash: &str) -> Result<i32> {
        self.admin_repo().insert(username, password_hash).await
    }

    pub async fn update_password_hash(&self, username: &str, new_hash: &str) -> Result<()> {
        self.admin_repo()
            .update_password_hash(username, new_hash)
            .await
    }
}
