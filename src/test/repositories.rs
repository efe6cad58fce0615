//! Repository traits over `MemoryState`, following the filters and orderings
//! of the Postgres queries. Unique indexes and exclusion constraints are
//! reported with the same errors the database would raise.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::error::{self, DbErrorMeta},
    modules::{
        assignment::{
            model::NewAssignment,
            repository::AssignmentRepository,
            schema::{AssignmentEntity, AssignmentStatus},
        },
        care_request::{
            model::NewCareRequest,
            repository::CareRequestRepository,
            schema::{CareRequestEntity, CareRequestStatus},
        },
        dashboard::{model::StatusCount, repository::DashboardRepository},
        friend::{
            repository::FriendshipRepository,
            schema::{FriendshipEntity, FriendshipStatus},
        },
        offer::{
            repository::OfferRepository,
            schema::{OfferEntity, OfferStatus},
        },
        pet::{
            model::{CreatePetModel, UpdatePetModel},
            repository::PetRepository,
            schema::PetEntity,
        },
        user::{
            model::{UpdateCapabilities, UserSearch},
            repository::UserRepository,
            schema::UserEntity,
        },
    },
    test::{MemoryState, MemoryStore},
    utils::Window,
};

fn unique_violation(constraint: &str) -> error::SystemError {
    error::SystemError::Conflict(Some(DbErrorMeta {
        code: Some("23505".into()),
        constraint: Some(constraint.into()),
        message: format!("duplicate key value violates unique constraint \"{constraint}\""),
    }))
}

fn overlaps_active(state: &MemoryState, candidate: &AssignmentEntity) -> bool {
    if candidate.status != AssignmentStatus::Active {
        return false;
    }
    state.assignments.values().any(|other| {
        other.id != candidate.id
            && other.status == AssignmentStatus::Active
            && (other.sitter_id == candidate.sitter_id
                || (candidate.pet_id.is_some() && other.pet_id == candidate.pet_id))
            && other.start_at < candidate.end_at
            && candidate.start_at < other.end_at
    })
}

/// Stores the assignment unless it breaks an active-window exclusion.
fn put_assignment(
    state: &mut MemoryState,
    assignment: AssignmentEntity,
) -> Result<AssignmentEntity, error::SystemError> {
    if overlaps_active(state, &assignment) {
        return Err(error::SystemError::SchedulingConflict(
            "Overlapping active assignment exists".into(),
        ));
    }
    state.assignments.insert(assignment.id, assignment.clone());
    Ok(assignment)
}

fn has_overlap<F>(
    state: &MemoryState,
    window: &Window,
    statuses: &[AssignmentStatus],
    exclude_id: Option<&Uuid>,
    matches: F,
) -> bool
where
    F: Fn(&AssignmentEntity) -> bool,
{
    state.assignments.values().any(|a| {
        matches(a)
            && statuses.contains(&a.status)
            && exclude_id != Some(&a.id)
            && a.start_at < window.end_at()
            && a.end_at > window.start_at()
    })
}

fn newest_first<T, K: Ord>(rows: &mut [T], key: impl Fn(&T) -> K) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(tx.working.users.get(id).cloned())
    }

    async fn find_by_ids(
        &self,
        ids: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let mut users: Vec<UserEntity> =
            tx.working.users.values().filter(|u| ids.contains(&u.id)).cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn update_capabilities(
        &self,
        id: &Uuid,
        capabilities: &UpdateCapabilities,
        tx: &mut Self::Tx,
    ) -> Result<UserEntity, error::SystemError> {
        let user = tx
            .working
            .users
            .get_mut(id)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        if let Some(is_owner) = capabilities.is_owner {
            user.is_owner = is_owner;
        }
        if let Some(is_sitter) = capabilities.is_sitter {
            user.is_sitter = is_sitter;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn search_users(
        &self,
        search: &UserSearch,
        exclude_id: &Uuid,
        limit: i64,
        tx: &mut Self::Tx,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let mut users: Vec<UserEntity> = tx
            .working
            .users
            .values()
            .filter(|u| u.id != *exclude_id)
            .filter(|u| match search {
                UserSearch::Email(email) => u.email.to_lowercase().contains(email.as_str()),
                UserSearch::NameTokens(tokens) => {
                    let name = u.name.to_lowercase();
                    tokens.iter().all(|t| name.contains(t.as_str()))
                }
            })
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);
        users.truncate(limit as usize);
        Ok(users)
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for MemoryStore {
    async fn find_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let edge = tx.working.friendships.values().find(|f| {
            (f.requester_id == *user_id_a && f.addressee_id == *user_id_b)
                || (f.requester_id == *user_id_b && f.addressee_id == *user_id_a)
        });
        Ok(edge.cloned())
    }

    async fn find_accepted_for(
        &self,
        user_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let mut rows: Vec<FriendshipEntity> = tx
            .working
            .friendships
            .values()
            .filter(|f| f.is_accepted())
            .filter(|f| f.requester_id == *user_id || f.addressee_id == *user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|f| f.id);
        Ok(rows)
    }

    async fn find_pending_from(
        &self,
        requester_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let mut rows: Vec<FriendshipEntity> = tx
            .working
            .friendships
            .values()
            .filter(|f| !f.is_accepted() && f.requester_id == *requester_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |f| (f.created_at, f.id));
        Ok(rows)
    }

    async fn find_pending_to(
        &self,
        addressee_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let mut rows: Vec<FriendshipEntity> = tx
            .working
            .friendships
            .values()
            .filter(|f| !f.is_accepted() && f.addressee_id == *addressee_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |f| (f.created_at, f.id));
        Ok(rows)
    }

    async fn find_touching(
        &self,
        user_id: &Uuid,
        others: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = tx
            .working
            .friendships
            .values()
            .filter(|f| {
                (f.requester_id == *user_id && others.contains(&f.addressee_id))
                    || (f.addressee_id == *user_id && others.contains(&f.requester_id))
            })
            .cloned()
            .collect();
        Ok(rows)
    }

    async fn create_request(
        &self,
        requester_id: &Uuid,
        addressee_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let taken = tx.working.friendships.values().any(|f| {
            (f.requester_id == *requester_id && f.addressee_id == *addressee_id)
                || (f.requester_id == *addressee_id && f.addressee_id == *requester_id)
        });
        if taken {
            return Err(unique_violation("friendships_pair"));
        }

        let now = Utc::now();
        let friendship = FriendshipEntity {
            id: Uuid::now_v7(),
            requester_id: *requester_id,
            addressee_id: *addressee_id,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tx.working.friendships.insert(friendship.id, friendship.clone());
        Ok(friendship)
    }

    async fn mark_accepted(
        &self,
        friendship_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let friendship = tx
            .working
            .friendships
            .get_mut(friendship_id)
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;
        friendship.status = FriendshipStatus::Accepted;
        friendship.updated_at = Utc::now();
        Ok(friendship.clone())
    }

    async fn delete_friendship(
        &self,
        friendship_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<(), error::SystemError> {
        tx.working.friendships.remove(friendship_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl PetRepository for MemoryStore {
    async fn insert_pet(
        &self,
        owner_id: &Uuid,
        pet: &CreatePetModel,
        tx: &mut Self::Tx,
    ) -> Result<PetEntity, error::SystemError> {
        let now = Utc::now();
        let pet = PetEntity {
            id: Uuid::now_v7(),
            owner_id: *owner_id,
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            age: pet.age,
            care_instructions: pet.care_instructions.clone(),
            notes: pet.notes.clone(),
            photo_url: pet.photo_url.clone(),
            created_at: now,
            updated_at: now,
        };
        tx.working.pets.insert(pet.id, pet.clone());
        Ok(pet)
    }

    async fn find_pet(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<PetEntity>, error::SystemError> {
        Ok(tx.working.pets.get(id).cloned())
    }

    async fn find_pets_by_ids(
        &self,
        ids: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<Vec<PetEntity>, error::SystemError> {
        Ok(tx.working.pets.values().filter(|p| ids.contains(&p.id)).cloned().collect())
    }

    async fn list_pets_by_owner(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<PetEntity>, error::SystemError> {
        let mut pets: Vec<PetEntity> =
            tx.working.pets.values().filter(|p| p.owner_id == *owner_id).cloned().collect();
        pets.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(pets)
    }

    async fn update_pet(
        &self,
        id: &Uuid,
        pet: &UpdatePetModel,
        tx: &mut Self::Tx,
    ) -> Result<PetEntity, error::SystemError> {
        let row = tx
            .working
            .pets
            .get_mut(id)
            .ok_or_else(|| error::SystemError::not_found("Pet not found"))?;
        if let Some(name) = &pet.name {
            row.name = name.clone();
        }
        if let Some(species) = &pet.species {
            row.species = species.clone();
        }
        if let Some(breed) = &pet.breed {
            row.breed = breed.clone();
        }
        if let Some(age) = pet.age {
            row.age = age;
        }
        if let Some(care_instructions) = &pet.care_instructions {
            row.care_instructions = care_instructions.clone();
        }
        if let Some(notes) = &pet.notes {
            row.notes = notes.clone();
        }
        if let Some(photo_url) = &pet.photo_url {
            row.photo_url = photo_url.clone();
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_pet(&self, id: &Uuid, tx: &mut Self::Tx) -> Result<(), error::SystemError> {
        let state = &mut tx.working;
        state.pets.remove(id);
        // ON DELETE SET NULL
        for request in state.requests.values_mut().filter(|r| r.pet_id == Some(*id)) {
            request.pet_id = None;
        }
        for assignment in state.assignments.values_mut().filter(|a| a.pet_id == Some(*id)) {
            assignment.pet_id = None;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CareRequestRepository for MemoryStore {
    async fn insert_request(
        &self,
        owner_id: &Uuid,
        request: &NewCareRequest,
        tx: &mut Self::Tx,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let now = Utc::now();
        let row = CareRequestEntity {
            id: Uuid::now_v7(),
            owner_id: *owner_id,
            pet_id: request.pet_id,
            start_at: request.window.start_at(),
            end_at: request.window.end_at(),
            location_text: request.location_text.clone(),
            notes: request.notes.clone(),
            status: CareRequestStatus::Open,
            created_at: now,
            updated_at: now,
        };
        tx.working.requests.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_request(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<CareRequestEntity>, error::SystemError> {
        Ok(tx.working.requests.get(id).cloned())
    }

    async fn find_request_for_update(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<CareRequestEntity>, error::SystemError> {
        Ok(tx.working.requests.get(id).cloned())
    }

    async fn list_requests_by_owner(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CareRequestEntity>, error::SystemError> {
        let mut rows: Vec<CareRequestEntity> =
            tx.working.requests.values().filter(|r| r.owner_id == *owner_id).cloned().collect();
        newest_first(&mut rows, |r| (r.start_at, r.id));
        Ok(rows)
    }

    async fn list_open_by_owners(
        &self,
        owner_ids: &[Uuid],
        offset: i64,
        limit: i64,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CareRequestEntity>, error::SystemError> {
        let mut rows: Vec<CareRequestEntity> = tx
            .working
            .requests
            .values()
            .filter(|r| r.is_open() && owner_ids.contains(&r.owner_id))
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.start_at, r.id));
        Ok(rows.into_iter().skip(offset as usize).take(limit as usize).collect())
    }

    async fn update_request(
        &self,
        id: &Uuid,
        request: &NewCareRequest,
        tx: &mut Self::Tx,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let row = tx
            .working
            .requests
            .get_mut(id)
            .ok_or_else(|| error::SystemError::not_found("Care request not found"))?;
        row.pet_id = request.pet_id;
        row.start_at = request.window.start_at();
        row.end_at = request.window.end_at();
        row.location_text = request.location_text.clone();
        row.notes = request.notes.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn set_request_status(
        &self,
        id: &Uuid,
        status: CareRequestStatus,
        tx: &mut Self::Tx,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let row = tx
            .working
            .requests
            .get_mut(id)
            .ok_or_else(|| error::SystemError::not_found("Care request not found"))?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn has_live_assignments(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<bool, error::SystemError> {
        Ok(tx.working.assignments.values().any(|a| {
            a.care_request_id == *id
                && matches!(a.status, AssignmentStatus::Pending | AssignmentStatus::Active)
        }))
    }
}

#[async_trait::async_trait]
impl AssignmentRepository for MemoryStore {
    async fn insert_assignment(
        &self,
        assignment: &NewAssignment,
        tx: &mut Self::Tx,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let now = Utc::now();
        let row = AssignmentEntity {
            id: Uuid::now_v7(),
            care_request_id: assignment.care_request_id,
            sitter_id: assignment.sitter_id,
            pet_id: assignment.pet_id,
            start_at: assignment.window.start_at(),
            end_at: assignment.window.end_at(),
            sitter_note: assignment.sitter_note.clone(),
            status: assignment.status,
            created_at: now,
            updated_at: now,
        };
        put_assignment(&mut tx.working, row)
    }

    async fn find_assignment_for_update(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<AssignmentEntity>, error::SystemError> {
        Ok(tx.working.assignments.get(id).cloned())
    }

    async fn find_for_request_and_sitter(
        &self,
        care_request_id: &Uuid,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<AssignmentEntity>, error::SystemError> {
        let row = tx
            .working
            .assignments
            .values()
            .find(|a| a.care_request_id == *care_request_id && a.sitter_id == *sitter_id);
        Ok(row.cloned())
    }

    async fn has_sitter_overlap(
        &self,
        sitter_id: &Uuid,
        window: &Window,
        statuses: &[AssignmentStatus],
        exclude_id: Option<&Uuid>,
        tx: &mut Self::Tx,
    ) -> Result<bool, error::SystemError> {
        Ok(has_overlap(&tx.working, window, statuses, exclude_id, |a| a.sitter_id == *sitter_id))
    }

    async fn has_pet_overlap(
        &self,
        pet_id: &Uuid,
        window: &Window,
        statuses: &[AssignmentStatus],
        exclude_id: Option<&Uuid>,
        tx: &mut Self::Tx,
    ) -> Result<bool, error::SystemError> {
        Ok(has_overlap(&tx.working, window, statuses, exclude_id, |a| a.pet_id == Some(*pet_id)))
    }

    async fn activate_assignment(
        &self,
        id: &Uuid,
        window: &Window,
        tx: &mut Self::Tx,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let mut row = tx
            .working
            .assignments
            .get(id)
            .cloned()
            .ok_or_else(|| error::SystemError::not_found("Assignment not found"))?;
        row.start_at = window.start_at();
        row.end_at = window.end_at();
        row.status = AssignmentStatus::Active;
        row.updated_at = Utc::now();
        put_assignment(&mut tx.working, row)
    }

    async fn set_assignment_status(
        &self,
        id: &Uuid,
        status: AssignmentStatus,
        tx: &mut Self::Tx,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let mut row = tx
            .working
            .assignments
            .get(id)
            .cloned()
            .ok_or_else(|| error::SystemError::not_found("Assignment not found"))?;
        row.status = status;
        row.updated_at = Utc::now();
        put_assignment(&mut tx.working, row)
    }

    async fn list_for_owner(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<AssignmentEntity>, error::SystemError> {
        let state = &tx.working;
        let mut rows: Vec<AssignmentEntity> = state
            .assignments
            .values()
            .filter(|a| {
                state.requests.get(&a.care_request_id).is_some_and(|r| r.owner_id == *owner_id)
            })
            .cloned()
            .collect();
        newest_first(&mut rows, |a| (a.start_at, a.id));
        Ok(rows)
    }

    async fn list_for_sitter(
        &self,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<AssignmentEntity>, error::SystemError> {
        let mut rows: Vec<AssignmentEntity> =
            tx.working.assignments.values().filter(|a| a.sitter_id == *sitter_id).cloned().collect();
        newest_first(&mut rows, |a| (a.start_at, a.id));
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl OfferRepository for MemoryStore {
    async fn insert_offer(
        &self,
        care_request_id: &Uuid,
        sitter_id: &Uuid,
        message: Option<&str>,
        tx: &mut Self::Tx,
    ) -> Result<OfferEntity, error::SystemError> {
        let open = tx.working.offers.values().any(|o| {
            o.care_request_id == *care_request_id
                && o.sitter_id == *sitter_id
                && o.status == OfferStatus::Offered
        });
        if open {
            return Err(unique_violation("care_offers_open_pair"));
        }

        let now = Utc::now();
        let offer = OfferEntity {
            id: Uuid::now_v7(),
            care_request_id: *care_request_id,
            sitter_id: *sitter_id,
            message: message.map(str::to_string),
            status: OfferStatus::Offered,
            created_at: now,
            updated_at: now,
        };
        tx.working.offers.insert(offer.id, offer.clone());
        Ok(offer)
    }

    async fn find_offer_for_update(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<OfferEntity>, error::SystemError> {
        Ok(tx.working.offers.get(id).cloned())
    }

    async fn find_open_offer(
        &self,
        care_request_id: &Uuid,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<OfferEntity>, error::SystemError> {
        let offer = tx.working.offers.values().find(|o| {
            o.care_request_id == *care_request_id
                && o.sitter_id == *sitter_id
                && o.status == OfferStatus::Offered
        });
        Ok(offer.cloned())
    }

    async fn set_offer_status(
        &self,
        id: &Uuid,
        status: OfferStatus,
        tx: &mut Self::Tx,
    ) -> Result<OfferEntity, error::SystemError> {
        let offer = tx
            .working
            .offers
            .get_mut(id)
            .ok_or_else(|| error::SystemError::not_found("Offer not found"))?;
        offer.status = status;
        offer.updated_at = Utc::now();
        Ok(offer.clone())
    }

    async fn list_offers_for_sitter(
        &self,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<OfferEntity>, error::SystemError> {
        let mut rows: Vec<OfferEntity> =
            tx.working.offers.values().filter(|o| o.sitter_id == *sitter_id).cloned().collect();
        newest_first(&mut rows, |o| (o.created_at, o.id));
        Ok(rows)
    }

    async fn list_offers_for_request(
        &self,
        care_request_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<OfferEntity>, error::SystemError> {
        let mut rows: Vec<OfferEntity> = tx
            .working
            .offers
            .values()
            .filter(|o| o.care_request_id == *care_request_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |o| (o.created_at, o.id));
        Ok(rows)
    }
}

const REQUEST_STATUSES: [CareRequestStatus; 5] = [
    CareRequestStatus::Open,
    CareRequestStatus::Matched,
    CareRequestStatus::Confirmed,
    CareRequestStatus::Cancelled,
    CareRequestStatus::Completed,
];

fn count<T>(rows: impl Iterator<Item = T>) -> i64 {
    rows.count() as i64
}

#[async_trait::async_trait]
impl DashboardRepository for MemoryStore {
    async fn count_pets(&self, owner_id: &Uuid, tx: &mut Self::Tx) -> Result<i64, error::SystemError> {
        Ok(count(tx.working.pets.values().filter(|p| p.owner_id == *owner_id)))
    }

    async fn count_requests_with_status(
        &self,
        owner_id: &Uuid,
        status: CareRequestStatus,
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError> {
        Ok(count(
            tx.working.requests.values().filter(|r| r.owner_id == *owner_id && r.status == status),
        ))
    }

    async fn count_active_sitter_assignments(
        &self,
        sitter_id: &Uuid,
        ending_at_or_after: DateTime<Utc>,
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError> {
        Ok(count(tx.working.assignments.values().filter(|a| {
            a.sitter_id == *sitter_id
                && a.status == AssignmentStatus::Active
                && a.end_at >= ending_at_or_after
        })))
    }

    async fn count_open_requests_of(
        &self,
        owner_ids: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError> {
        Ok(count(
            tx.working.requests.values().filter(|r| r.is_open() && owner_ids.contains(&r.owner_id)),
        ))
    }

    async fn count_pending_applications(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError> {
        let state = &tx.working;
        Ok(count(state.assignments.values().filter(|a| {
            a.status == AssignmentStatus::Pending
                && state.requests.get(&a.care_request_id).is_some_and(|r| r.owner_id == *owner_id)
        })))
    }

    async fn latest_requests(
        &self,
        owner_id: &Uuid,
        limit: i64,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CareRequestEntity>, error::SystemError> {
        let mut rows = self.list_requests_by_owner(owner_id, tx).await?;
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn count_requests_by_status(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<StatusCount>, error::SystemError> {
        let mut rows = Vec::new();
        for status in REQUEST_STATUSES {
            let n = self.count_requests_with_status(owner_id, status, tx).await?;
            if n > 0 {
                rows.push(StatusCount { status, count: n });
            }
        }
        Ok(rows)
    }

    async fn request_starts_since(
        &self,
        owner_id: &Uuid,
        since: DateTime<Utc>,
        tx: &mut Self::Tx,
    ) -> Result<Vec<DateTime<Utc>>, error::SystemError> {
        Ok(tx
            .working
            .requests
            .values()
            .filter(|r| r.owner_id == *owner_id && r.start_at >= since)
            .map(|r| r.start_at)
            .collect())
    }

    async fn sitter_assignments_since(
        &self,
        sitter_id: &Uuid,
        statuses: &[AssignmentStatus],
        since: DateTime<Utc>,
        tx: &mut Self::Tx,
    ) -> Result<Vec<AssignmentEntity>, error::SystemError> {
        Ok(tx
            .working
            .assignments
            .values()
            .filter(|a| {
                a.sitter_id == *sitter_id && statuses.contains(&a.status) && a.start_at >= since
            })
            .cloned()
            .collect())
    }
}
