use serde::Deserialize;
use validator::Validate;

use crate::utils::double_option;

#[derive(Deserialize, Validate)]
pub struct CreatePetModel {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters long"))]
    pub name: String,
    #[validate(length(max = 50, message = "Species must be at most 50 characters long"))]
    pub species: Option<String>,
    #[validate(length(max = 120, message = "Breed must be at most 120 characters long"))]
    pub breed: Option<String>,
    #[validate(range(min = 0, message = "Age cannot be negative"))]
    pub age: Option<i32>,
    pub care_instructions: Option<String>,
    pub notes: Option<String>,
    #[validate(url(message = "Invalid photo URL"), length(max = 255))]
    pub photo_url: Option<String>,
}

/// Partial update. For the optional columns `null` clears the value and a
/// missing key leaves it as is.
#[derive(Default, Deserialize, Validate)]
pub struct UpdatePetModel {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters long"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 50, message = "Species must be at most 50 characters long"))]
    pub species: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 120, message = "Breed must be at most 120 characters long"))]
    pub breed: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(range(min = 0, message = "Age cannot be negative"))]
    pub age: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub care_instructions: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(url(message = "Invalid photo URL"), length(max = 255))]
    pub photo_url: Option<Option<String>>,
}

impl UpdatePetModel {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.species.is_none()
            && self.breed.is_none()
            && self.age.is_none()
            && self.care_instructions.is_none()
            && self.notes.is_none()
            && self.photo_url.is_none()
    }
}
