use crate::entities::{csv_records, prelude::*};
use crate::parser::csv::CsvRow;
use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;

use super::INSERT_BATCH_SIZE;
use super::image::ReplaceOutcome;

/// One imported CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvRecord {
    pub id: i64,
    pub fields: CsvRow,
}

impl TryFrom<csv_records::Model> for CsvRecord {
    type Error = anyhow::Error;

    fn try_from(model: csv_records::Model) -> Result<Self> {
        let fields = serde_json::from_str(&model.data)
            .with_context(|| format!("Corrupt CSV record {}", model.id))?;
        Ok(Self {
            id: model.id,
            fields,
        })
    }
}

pub struct CsvRecordRepository {
    conn: DatabaseConnection,
}

impl CsvRecordRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Deletes every CSV record and inserts `rows` in one transaction.
    pub async fn replace_all(&self, rows: &[CsvRow]) -> Result<ReplaceOutcome> {
        let payloads = rows
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to serialize CSV rows")?;

        let txn = self.conn.begin().await?;

        let deleted = CsvRecords::delete_many().exec(&txn).await?.rows_affected;

        for batch in payloads.chunks(INSERT_BATCH_SIZE) {
            let models = batch.iter().map(|data| csv_records::ActiveModel {
                data: Set(data.clone()),
                ..Default::default()
            });

            CsvRecords::insert_many(models)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        Ok(ReplaceOutcome {
            deleted,
            inserted: payloads.len(),
        })
    }

    pub async fn clear(&self) -> Result<u64> {
        let result = CsvRecords::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn list(&self) -> Result<Vec<CsvRecord>> {
        CsvRecords::find()
            .order_by_asc(csv_records::Column::Id)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(CsvRecord::try_from)
            .collect()
    }

    /// Rows whose `field` is exactly `value`. Null cells never match.
    pub async fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<CsvRecord>> {
        let matches_field = Expr::cust_with_values(
            "EXISTS (SELECT 1 FROM json_each(csv_records.data) \
             WHERE json_each.key = ? AND json_each.value = ?)",
            [field, value],
        );

        CsvRecords::find()
            .filter(matches_field)
            .order_by_asc(csv_records::Column::Id)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(CsvRecord::try_from)
            .collect()
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(CsvRecords::find().count(&self.conn).await?)
    }
}
