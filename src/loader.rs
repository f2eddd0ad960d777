//! Bulk upsert of JSON fixture files into the store.
//!
//! A data directory holds one `<table>.json` file per table, each a JSON
//! array of objects keyed by column name.

use std::path::{Path, PathBuf};

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityName, EntityTrait, IdenStatic,
    IntoActiveModel, Iterable, PrimaryKeyToColumn, TransactionTrait, sea_query::OnConflict,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    entities::{
        actor, address, category, city, customer, film, film_actor, film_category, inventory,
        payment, rental,
    },
    error::{AppError, AppResult},
};

const INSERT_CHUNK: usize = 500;

/// Tables in foreign-key dependency order.
pub const LOAD_ORDER: [&str; 11] = [
    "city",
    "address",
    "customer",
    "category",
    "film",
    "film_category",
    "actor",
    "film_actor",
    "inventory",
    "rental",
    "payment",
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub tables: Vec<(String, usize)>,
}

impl LoadSummary {
    pub fn rows(&self, table: &str) -> Option<usize> {
        self.tables.iter().find(|(name, _)| name == table).map(|(_, rows)| *rows)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }
}

pub fn data_file(dir: &Path, table: &str) -> PathBuf {
    dir.join(format!("{table}.json"))
}

/// Upserts every table from `dir` inside one transaction. All files are
/// checked for existence before the store is touched.
pub async fn load_dir(db: &DatabaseConnection, dir: &Path) -> AppResult<LoadSummary> {
    for table in LOAD_ORDER {
        let path = data_file(dir, table);
        if !tokio::fs::try_exists(&path).await? {
            return Err(AppError::MissingDataFile(path));
        }
    }

    let txn = db.begin().await?;
    let mut summary = LoadSummary::default();

    summary.tables.push(load_table::<city::ActiveModel, _>(&txn, dir).await?);
    summary.tables.push(load_table::<address::ActiveModel, _>(&txn, dir).await?);
    summary.tables.push(load_table::<customer::ActiveModel, _>(&txn, dir).await?);
    summary.tables.push(load_table::<category::ActiveModel, _>(&txn, dir).await?);
    summary.tables.push(load_table::<film::ActiveModel, _>(&txn, dir).await?);
    summary.tables.push(load_table::<film_category::ActiveModel, _>(&txn, dir).await?);
    summary.tables.push(load_table::<actor::ActiveModel, _>(&txn, dir).await?);
    summary.tables.push(load_table::<film_actor::ActiveModel, _>(&txn, dir).await?);
    summary.tables.push(load_table::<inventory::ActiveModel, _>(&txn, dir).await?);
    summary.tables.push(load_table::<rental::ActiveModel, _>(&txn, dir).await?);
    summary.tables.push(load_table::<payment::ActiveModel, _>(&txn, dir).await?);

    txn.commit().await?;

    info!(dir = %dir.display(), rows = summary.total_rows(), "data directory loaded");
    Ok(summary)
}

async fn load_table<A, C>(conn: &C, dir: &Path) -> AppResult<(String, usize)>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: DeserializeOwned + IntoActiveModel<A>,
    C: ConnectionTrait,
{
    let table = A::Entity::default().table_name().to_owned();
    let path = data_file(dir, &table);

    let raw = tokio::fs::read(&path).await?;
    let models: Vec<<A::Entity as EntityTrait>::Model> = serde_json::from_slice(&raw)
        .map_err(|source| AppError::Json { path: path.clone(), source })?;
    let count = models.len();

    let on_conflict = upsert_clause::<A::Entity>();
    let mut models = models.into_iter();
    loop {
        let batch: Vec<A> =
            models.by_ref().take(INSERT_CHUNK).map(IntoActiveModel::into_active_model).collect();
        if batch.is_empty() {
            break;
        }
        A::Entity::insert_many(batch)
            .on_conflict(on_conflict.clone())
            .exec_without_returning(conn)
            .await?;
    }

    debug!(table = %table, rows = count, "table loaded");
    Ok((table, count))
}

/// `ON CONFLICT (pk) DO UPDATE` over the non-key columns, or `DO NOTHING`
/// when every column is part of the key.
fn upsert_clause<E: EntityTrait>() -> OnConflict {
    let keys: Vec<E::Column> = E::PrimaryKey::iter().map(|pk| pk.into_column()).collect();
    let key_names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
    let updates: Vec<E::Column> =
        E::Column::iter().filter(|c| !key_names.contains(&c.as_str())).collect();

    let mut clause = OnConflict::columns(keys);
    if updates.is_empty() {
        clause.do_nothing();
    } else {
        clause.update_columns(updates);
    }
    clause
}
