use crate::entities::{images, prelude::*};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;

use super::INSERT_BATCH_SIZE;

/// An image document: file name plus base64-encoded contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub filename: String,
    pub data: String,
}

impl From<images::Model> for ImageRecord {
    fn from(model: images::Model) -> Self {
        Self {
            filename: model.filename,
            data: model.data,
        }
    }
}

/// Counts from a full-collection replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReplaceOutcome {
    pub deleted: u64,
    pub inserted: usize,
}

pub struct ImageRepository {
    conn: DatabaseConnection,
}

impl ImageRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Deletes every image and inserts `records` in one transaction.
    pub async fn replace_all(&self, records: Vec<ImageRecord>) -> Result<ReplaceOutcome> {
        let inserted = records.len();
        let txn = self.conn.begin().await?;

        let deleted = Images::delete_many().exec(&txn).await?.rows_affected;

        let mut pending = records.into_iter().peekable();
        while pending.peek().is_some() {
            let batch: Vec<images::ActiveModel> = pending
                .by_ref()
                .take(INSERT_BATCH_SIZE)
                .map(|record| images::ActiveModel {
                    filename: Set(record.filename),
                    data: Set(record.data),
                    ..Default::default()
                })
                .collect();

            Images::insert_many(batch)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        Ok(ReplaceOutcome { deleted, inserted })
    }

    pub async fn clear(&self) -> Result<u64> {
        let result = Images::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn find_by_filename(&self, filename: &str) -> Result<Option<ImageRecord>> {
        let image = Images::find()
            .filter(images::Column::Filename.eq(filename))
            .order_by_asc(images::Column::Id)
            .one(&self.conn)
            .await?;

        Ok(image.map(ImageRecord::from))
    }

    pub async fn list(&self) -> Result<Vec<ImageRecord>> {
        let images = Images::find()
            .order_by_asc(images::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(images.into_iter().map(ImageRecord::from).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Images::find().count(&self.conn).await?)
    }
}
