use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::info;

use crate::entities::{admin_users, prelude::*};

/// Repository for the admin credential table. Password hashing lives in
/// the auth service; this layer only moves opaque hash strings.
pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<u64> {
        AdminUsers::find()
            .count(&self.conn)
            .await
            .context("Failed to count admin users")
    }

    pub async fn get_password_hash(&self, username: &str) -> Result<Option<String>> {
        let admin = AdminUsers::find()
            .filter(admin_users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query admin user")?;

        Ok(admin.map(|a| a.password_hash))
    }

    /// Insert an admin row and return its generated id.
    pub async fn insert(&self, username: &str, password_hash: &str) -> Result<i32> {
        let created_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let active = admin_users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(created_at),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert admin user")?;

        info!("Created admin user (username: {})", model.username);
        Ok(model.id)
    }

    pub async fn update_password_hash(&self, username: &str, new_hash: &str) -> Result<()> {
        let admin = AdminUsers::find()
            .filter(admin_users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query admin user for password update")?
            .ok_or_else(|| anyhow::anyhow!("Admin user not found: {username}"))?;

        let mut active: admin_users::ActiveModel = admin.into();
        active.password_hash = Set(new_hash.to_string());
        active
            .update(&self.conn)
            .await
            .context("Failed to update password hash")?;

        Ok(())
    }
}
