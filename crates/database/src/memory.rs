//! In-memory `KillerStore` (for development/testing).

use std::collections::BTreeMap;

use async_trait::async_trait;
use core_types::{Killer, KillerFields};
use parking_lot::RwLock;

use crate::{DbError, KillerStore};

#[derive(Debug)]
struct Table {
    rows: BTreeMap<i32, Killer>,
    next_id: i32,
}

/// A `KillerStore` backed by an ordered map. Ids start at 1 and are never
/// reused, like a serial column.
#[derive(Debug)]
pub struct InMemoryRepository {
    table: RwLock<Table>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Creates a store pre-populated with `rows`, each given a fresh id.
    #[must_use]
    pub fn with_rows(rows: impl IntoIterator<Item = KillerFields>) -> Self {
        let store = Self::new();
        {
            let mut table = store.table.write();
            for fields in rows {
                let id = table.next_id;
                table.next_id += 1;
                table.rows.insert(id, Killer::from_fields(id, fields));
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().rows.is_empty()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KillerStore for InMemoryRepository {
    async fn list_all(&self) -> Result<Vec<Killer>, DbError> {
        Ok(self.table.read().rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Killer, DbError> {
        self.table.read().rows.get(&id).cloned().ok_or(DbError::NotFound)
    }

    async fn create(&self, fields: &KillerFields) -> Result<i32, DbError> {
        let mut table = self.table.write();
        let id = table.next_id;
        table.next_id += 1;
        table.rows.insert(id, Killer::from_fields(id, fields.clone()));
        Ok(id)
    }

    async fn update(&self, id: i32, fields: &KillerFields) -> Result<(), DbError> {
        let mut table = self.table.write();
        let row = table.rows.get_mut(&id).ok_or(DbError::NotFound)?;
        *row = Killer::from_fields(id, fields.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), DbError> {
        self.table
            .write()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }
}
