//! Pet registry: owner-scoped CRUD over pets.

use tracing::info;

use crate::db::Database;
use crate::error::{ClinicError, ClinicResult, ResourceKind};
use crate::guard::require_owned;
use crate::models::{NewPet, Pet, PetPatch};

pub struct PetRegistry<'a> {
    db: &'a Database,
}

impl<'a> PetRegistry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self, owner_id: &str) -> ClinicResult<Vec<Pet>> {
        Ok(self.db.list_pets_for_owner(owner_id)?)
    }

    pub fn get(&self, owner_id: &str, pet_id: &str) -> ClinicResult<Pet> {
        require_owned(ResourceKind::Pet, pet_id, self.db.get_pet(pet_id)?, owner_id)
    }

    pub fn create(&self, owner_id: &str, input: NewPet) -> ClinicResult<Pet> {
        let pet = input.into_pet(owner_id)?;
        self.db.insert_pet(&pet)?;
        info!(pet_id = %pet.id, species = %pet.species, "pet registered");
        Ok(pet)
    }

    pub fn update(&self, owner_id: &str, pet_id: &str, patch: PetPatch) -> ClinicResult<Pet> {
        let mut pet = self.get(owner_id, pet_id)?;
        patch.apply_to(&mut pet)?;
        pet.touch();
        if !self.db.update_pet(&pet)? {
            return Err(ClinicError::not_found(ResourceKind::Pet, pet_id));
        }
        Ok(pet)
    }

    /// Remove a pet. Its appointments and clinical records are kept.
    pub fn delete(&self, owner_id: &str, pet_id: &str) -> ClinicResult<()> {
        self.get(owner_id, pet_id)?;
        if !self.db.delete_pet(pet_id)? {
            return Err(ClinicError::not_found(ResourceKind::Pet, pet_id));
        }
        info!(pet_id, "pet deleted");
        Ok(())
    }
}
