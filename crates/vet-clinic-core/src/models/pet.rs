//! Pet models.

use serde::{Deserialize, Serialize};

use super::patch::{apply, double_option, require_text, required_text};
use super::time::now_rfc3339;
use crate::error::{ClinicError, ClinicResult};

/// A pet registered by its owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Unique pet ID (UUID)
    pub id: String,
    /// Owning principal
    pub owner_id: String,
    /// Pet name
    pub name: String,
    /// Species (e.g., "Dog", "Cat")
    pub species: String,
    /// Breed
    pub breed: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Free-text medical history supplied by the owner
    pub medical_history: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Pet {
    /// Create a new pet with required fields.
    pub fn new(owner_id: String, name: String, species: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            name,
            species,
            breed: None,
            age: None,
            medical_history: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_rfc3339();
    }
}

/// Request body for registering a pet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub age: Option<i64>,
    pub medical_history: Option<String>,
}

impl NewPet {
    /// Validate and build the pet for `owner_id`.
    pub fn into_pet(self, owner_id: &str) -> ClinicResult<Pet> {
        let name = require_text("name", self.name)?;
        let species = require_text("species", self.species)?;
        let age = self.age.map(validate_age).transpose()?;

        let mut pet = Pet::new(owner_id.to_string(), name, species);
        pet.breed = self.breed;
        pet.age = age;
        pet.medical_history = self.medical_history;
        Ok(pet)
    }
}

/// Partial update for a pet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub species: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub breed: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub age: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub medical_history: Option<Option<String>>,
}

impl PetPatch {
    /// Validate every field, then apply the ones present.
    pub fn apply_to(self, pet: &mut Pet) -> ClinicResult<()> {
        let name = required_text("name", self.name)?;
        let species = required_text("species", self.species)?;
        let age = match self.age {
            Some(Some(age)) => Some(Some(validate_age(age)?)),
            Some(None) => Some(None),
            None => None,
        };

        apply(&mut pet.name, name);
        apply(&mut pet.species, species);
        apply(&mut pet.breed, self.breed);
        apply(&mut pet.age, age);
        apply(&mut pet.medical_history, self.medical_history);
        Ok(())
    }
}

fn validate_age(age: i64) -> ClinicResult<u32> {
    u32::try_from(age)
        .map_err(|_| ClinicError::Validation(format!("age must be a non-negative integer, got {age}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pet() {
        let pet = Pet::new("owner-1".into(), "Rex".into(), "Dog".into());
        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.species, "Dog");
        assert_eq!(pet.id.len(), 36); // UUID format
    }

    #[test]
    fn test_missing_species_is_rejected() {
        let input = NewPet {
            name: Some("Rex".into()),
            ..Default::default()
        };
        let err = input.into_pet("owner-1").unwrap_err();
        assert!(matches!(err, ClinicError::Validation(msg) if msg.contains("species")));
    }

    #[test]
    fn test_negative_age_is_rejected() {
        let input = NewPet {
            name: Some("Rex".into()),
            species: Some("Dog".into()),
            age: Some(-1),
            ..Default::default()
        };
        assert!(input.into_pet("owner-1").is_err());
    }

    #[test]
    fn test_patch_zero_age_and_clear_breed() {
        let mut pet = Pet::new("owner-1".into(), "Rex".into(), "Dog".into());
        pet.age = Some(4);
        pet.breed = Some("Beagle".into());

        let patch: PetPatch = serde_json::from_str(r#"{"age": 0, "breed": null}"#).unwrap();
        patch.apply_to(&mut pet).unwrap();

        assert_eq!(pet.age, Some(0));
        assert_eq!(pet.breed, None);
        assert_eq!(pet.name, "Rex");
    }

    #[test]
    fn test_invalid_patch_leaves_pet_untouched() {
        let mut pet = Pet::new("owner-1".into(), "Rex".into(), "Dog".into());
        let before = pet.clone();

        let patch: PetPatch =
            serde_json::from_str(r#"{"breed": "Beagle", "name": ""}"#).unwrap();
        assert!(patch.apply_to(&mut pet).is_err());
        assert_eq!(pet, before);
    }
}
