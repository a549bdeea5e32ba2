use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::utils::error::AppError;

use super::dto::{CreateOwnerRequest, UpdateOwnerRequest};
use super::entity::{address_owner, owner};

/// Hours used when an owner record carries no usable schedule blob.
pub const DEFAULT_OWNER_SCHEDULE: [u32; 3] = [8, 12, 20];

pub struct OwnerService;

impl OwnerService {
    pub async fn list_owners(db: &DatabaseConnection) -> Result<Vec<owner::Model>, AppError> {
        let owners = owner::Entity::find()
            .order_by_asc(owner::Column::Id)
            .all(db)
            .await?;
        Ok(owners)
    }

    pub async fn get_owner(db: &DatabaseConnection, id: i64) -> Result<owner::Model, AppError> {
        owner::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Owner {} does not exist", id)))
    }

    pub async fn create_owner(
        db: &DatabaseConnection,
        req: CreateOwnerRequest,
    ) -> Result<owner::Model, AppError> {
        let schedule = req
            .schedule
            .unwrap_or_else(|| DEFAULT_OWNER_SCHEDULE.to_vec());
        let schedule_blob = serde_json::to_string(&schedule)
            .map_err(|e| AppError::internal_error(format!("Failed to encode schedule: {}", e)))?;

        let model = owner::ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            phone: Set(req.phone),
            discord_webhook: Set(req.discord_webhook),
            schedule: Set(schedule_blob),
            ..Default::default()
        };

        let created = model.insert(db).await?;
        info!(owner_id = created.id, name = %created.name, "Owner created");
        Ok(created)
    }

    /// Update contact fields; absent fields are left untouched.
    pub async fn update_owner(
        db: &DatabaseConnection,
        id: i64,
        req: UpdateOwnerRequest,
    ) -> Result<owner::Model, AppError> {
        let existing = Self::get_owner(db, id).await?;
        let mut model: owner::ActiveModel = existing.into();

        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(email) = req.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = req.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(webhook) = req.discord_webhook {
            model.discord_webhook = Set(Some(webhook));
        }
        if let Some(schedule) = req.schedule {
            let blob = serde_json::to_string(&schedule).map_err(|e| {
                AppError::internal_error(format!("Failed to encode schedule: {}", e))
            })?;
            model.schedule = Set(blob);
        }

        let updated = model.update(db).await?;
        info!(owner_id = updated.id, "Owner updated");
        Ok(updated)
    }

    /// All addresses assigned to an owner.
    pub async fn owner_addresses(
        db: &DatabaseConnection,
        owner_id: i64,
    ) -> Result<Vec<String>, AppError> {
        let rows = address_owner::Entity::find()
            .filter(address_owner::Column::OwnerId.eq(owner_id))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|r| r.address).collect())
    }

    /// Owner ids an address is assigned to.
    pub async fn owners_for_address(
        db: &DatabaseConnection,
        address: &str,
    ) -> Result<Vec<i64>, AppError> {
        let rows = address_owner::Entity::find()
            .filter(address_owner::Column::Address.eq(address))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|r| r.owner_id).collect())
    }

    /// Assign an address to an owner. Assigning twice is a no-op.
    pub async fn assign_address(
        db: &DatabaseConnection,
        owner_id: i64,
        address: &str,
    ) -> Result<(), AppError> {
        Self::get_owner(db, owner_id).await?;

        let existing = address_owner::Entity::find_by_id((address.to_string(), owner_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let model = address_owner::ActiveModel {
            address: Set(address.to_string()),
            owner_id: Set(owner_id),
        };
        model.insert(db).await?;
        info!(owner_id, address = %address, "Address assigned to owner");
        Ok(())
    }

    pub async fn unassign_address(
        db: &DatabaseConnection,
        owner_id: i64,
        address: &str,
    ) -> Result<(), AppError> {
        let result = address_owner::Entity::delete_by_id((address.to_string(), owner_id))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Address is not assigned to this owner"));
        }
        info!(owner_id, address = %address, "Address unassigned from owner");
        Ok(())
    }

    /// Decode an owner's schedule blob; malformed blobs fall back to the
    /// default hours rather than breaking the check loop.
    pub fn decode_schedule(blob: &str) -> Vec<u32> {
        serde_json::from_str::<Vec<u32>>(blob)
            .ok()
            .filter(|hours| !hours.is_empty() && hours.iter().all(|h| *h < 24))
            .unwrap_or_else(|| DEFAULT_OWNER_SCHEDULE.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_valid_schedule_blob() {
        assert_eq!(OwnerService::decode_schedule("[6, 18]"), vec![6, 18]);
    }

    #[test]
    fn should_fall_back_on_malformed_schedule_blob() {
        assert_eq!(
            OwnerService::decode_schedule("not json"),
            DEFAULT_OWNER_SCHEDULE.to_vec()
        );
    }

    #[test]
    fn should_fall_back_on_out_of_range_hours() {
        assert_eq!(
            OwnerService::decode_schedule("[8, 25]"),
            DEFAULT_OWNER_SCHEDULE.to_vec()
        );
    }

    #[test]
    fn should_fall_back_on_empty_schedule() {
        assert_eq!(
            OwnerService::decode_schedule("[]"),
            DEFAULT_OWNER_SCHEDULE.to_vec()
        );
    }
}
