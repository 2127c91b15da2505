use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

use crate::entities::{prelude::*, workshops};

/// Repository for workshop rows.
pub struct WorkshopRepository {
    conn: DatabaseConnection,
}

impl WorkshopRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a workshop and return its generated id.
    pub async fn insert(
        &self,
        title: &str,
        description: &str,
        date: &str,
        location: &str,
        max_capacity: i32,
    ) -> Result<i32> {
        let active = workshops::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            date: Set(date.to_string()),
            location: Set(location.to_string()),
            max_capacity: Set(max_capacity),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert workshop")?;

        info!("Created workshop {} ({})", model.id, model.title);
        Ok(model.id)
    }

    /// The workshop with the maximum date-ordering key.
    ///
    /// The `date` column holds a formatted display string, so this ordering
    /// is lexicographic rather than chronological.
    pub async fn latest(&self) -> Result<Option<workshops::Model>> {
        Workshops::find()
            .order_by_desc(workshops::Column::Date)
            .one(&self.conn)
            .await
            .context("Failed to query latest workshop")
    }

    pub async fn get(&self, id: i32) -> Result<Option<workshops::Model>> {
        Workshops::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query workshop by id")
    }
}
