//! Pet database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Pet;

pub(crate) const PET_COLUMNS: &str =
    "id, owner_id, name, species, breed, age, medical_history, created_at, updated_at";

/// Map a row selected with [`PET_COLUMNS`] starting at `offset`.
pub(crate) fn pet_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Pet> {
    Ok(Pet {
        id: row.get(offset)?,
        owner_id: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        species: row.get(offset + 3)?,
        breed: row.get(offset + 4)?,
        age: row.get(offset + 5)?,
        medical_history: row.get(offset + 6)?,
        created_at: row.get(offset + 7)?,
        updated_at: row.get(offset + 8)?,
    })
}

impl Database {
    /// Insert a new pet.
    pub fn insert_pet(&self, pet: &Pet) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO pets (
                id, owner_id, name, species, breed, age,
                medical_history, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                pet.id,
                pet.owner_id,
                pet.name,
                pet.species,
                pet.breed,
                pet.age,
                pet.medical_history,
                pet.created_at,
                pet.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing pet. Ownership is never rewritten.
    pub fn update_pet(&self, pet: &Pet) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE pets SET
                name = ?2,
                species = ?3,
                breed = ?4,
                age = ?5,
                medical_history = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                pet.id,
                pet.name,
                pet.species,
                pet.breed,
                pet.age,
                pet.medical_history,
                pet.updated_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a pet by ID, whoever owns it.
    pub fn get_pet(&self, id: &str) -> DbResult<Option<Pet>> {
        self.conn
            .query_row(
                &format!("SELECT {PET_COLUMNS} FROM pets WHERE id = ?"),
                [id],
                |row| pet_from_row(row, 0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// List an owner's pets.
    pub fn list_pets_for_owner(&self, owner_id: &str) -> DbResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE owner_id = ? ORDER BY created_at, name"
        ))?;

        let rows = stmt.query_map([owner_id], |row| pet_from_row(row, 0))?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a pet.
    pub fn delete_pet(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM pets WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let mut pet = Pet::new("owner-1".into(), "Max".into(), "Dog".into());
        pet.breed = Some("Golden Retriever".into());
        pet.age = Some(3);

        db.insert_pet(&pet).unwrap();

        let retrieved = db.get_pet(&pet.id).unwrap().unwrap();
        assert_eq!(retrieved, pet);
    }

    #[test]
    fn test_update_pet() {
        let db = setup_db();

        let mut pet = Pet::new("owner-1".into(), "Max".into(), "Dog".into());
        db.insert_pet(&pet).unwrap();

        pet.age = Some(0);
        pet.medical_history = Some(String::new());
        assert!(db.update_pet(&pet).unwrap());

        let retrieved = db.get_pet(&pet.id).unwrap().unwrap();
        assert_eq!(retrieved.age, Some(0));
        assert_eq!(retrieved.medical_history, Some(String::new()));
    }

    #[test]
    fn test_list_is_owner_scoped() {
        let db = setup_db();

        db.insert_pet(&Pet::new("owner-1".into(), "Max".into(), "Dog".into()))
            .unwrap();
        db.insert_pet(&Pet::new("owner-1".into(), "Luna".into(), "Cat".into()))
            .unwrap();
        db.insert_pet(&Pet::new("owner-2".into(), "Rex".into(), "Dog".into()))
            .unwrap();

        let mine = db.list_pets_for_owner("owner-1").unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|p| p.owner_id == "owner-1"));
    }

    #[test]
    fn test_delete_missing() {
        let db = setup_db();
        assert!(!db.delete_pet("nope").unwrap());
    }
}
