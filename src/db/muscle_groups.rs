//! Muscle groups - static reference list used to filter exercises

use rusqlite::{OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Database;
use crate::error::{Result, StoreError};

/// Coarse exercise category (Chest, Back, Legs, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleGroup {
    pub id: i64,
    pub name: String,
}

impl MuscleGroup {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

impl Database {
    pub fn all_muscle_groups(&self) -> Result<Vec<MuscleGroup>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name FROM muscle_groups ORDER BY id")?;
        let groups = stmt
            .query_map([], MuscleGroup::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(groups)
    }

    pub fn muscle_group_by_id(&self, id: i64) -> Result<Option<MuscleGroup>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, name FROM muscle_groups WHERE id = ?1",
                params![id],
                MuscleGroup::from_row,
            )
            .optional()?)
    }

    pub fn insert_muscle_group(&self, name: &str) -> Result<i64> {
        self.conn()
            .execute("INSERT INTO muscle_groups (name) VALUES (?1)", params![name])?;
        let id = self.conn().last_insert_rowid();
        debug!("Inserted muscle group {} ({})", id, name);
        Ok(id)
    }

    pub fn update_muscle_group(&self, group: &MuscleGroup) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE muscle_groups SET name = ?1 WHERE id = ?2",
            params![group.name, group.id],
        )?;
        if changed == 0 {
            return Err(StoreError::MuscleGroupNotFound(group.id));
        }
        Ok(())
    }

    /// Delete a group together with all of its exercises
    ///
    /// Fails with `MuscleGroupInUse` while any of those exercises is assigned
    /// to a workout day; nothing is removed in that case.
    pub fn delete_muscle_group(&self, id: i64) -> Result<()> {
        match self
            .conn()
            .execute("DELETE FROM muscle_groups WHERE id = ?1", params![id])
        {
            Ok(_) => {
                debug!("Deleted muscle group {}", id);
                Ok(())
            }
            Err(e) if StoreError::is_foreign_key_violation(&e) => Err(StoreError::MuscleGroupInUse(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn muscle_group_count(&self) -> Result<i64> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM muscle_groups", [], |row| row.get(0))?)
    }
}
