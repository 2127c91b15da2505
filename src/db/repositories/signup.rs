use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{prelude::*, signups};

/// Fields supplied by the public signup form; `created_at` is stamped by
/// the repository at insertion.
#[derive(Debug, Clone)]
pub struct NewSignup {
    pub workshop_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Repository for signup rows. Signups are append-only: there is no
/// update or delete operation.
pub struct SignupRepository {
    conn: DatabaseConnection,
}

impl SignupRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a signup and return the stored row.
    pub async fn insert(&self, signup: &NewSignup) -> Result<signups::Model> {
        let created_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let active = signups::ActiveModel {
            workshop_id: Set(Some(signup.workshop_id)),
            first_name: Set(signup.first_name.clone()),
            last_name: Set(signup.last_name.clone()),
            email: Set(signup.email.clone()),
            phone: Set(signup.phone.clone()),
            created_at: Set(created_at),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert signup")
    }

    pub async fn count_for_workshop(&self, workshop_id: i32) -> Result<i64> {
        let count = Signups::find()
            .filter(signups::Column::WorkshopId.eq(workshop_id))
            .count(&self.conn)
            .await
            .context("Failed to count signups")?;

        Ok(count as i64)
    }

    /// Signups for a workshop, newest first (dashboard order).
    pub async fn list_desc(&self, workshop_id: i32) -> Result<Vec<signups::Model>> {
        Signups::find()
            .filter(signups::Column::WorkshopId.eq(workshop_id))
            .order_by_desc(signups::Column::CreatedAt)
            .order_by_desc(signups::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list signups")
    }

    /// Signups for a workshop, oldest first (export order).
    pub async fn list_asc(&self, workshop_id: i32) -> Result<Vec<signups::Model>> {
        Signups::find()
            .filter(signups::Column::WorkshopId.eq(workshop_id))
            .order_by_asc(signups::Column::CreatedAt)
            .order_by_asc(signups::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list signups")
    }
}
