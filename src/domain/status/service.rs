use std::collections::HashMap;

use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

use crate::scrape::bis::BisSummary;
use crate::utils::error::AppError;

use super::entity::building_status;

pub struct StatusService;

impl StatusService {
    pub async fn all_statuses(
        db: &DatabaseConnection,
    ) -> Result<Vec<building_status::Model>, AppError> {
        let statuses = building_status::Entity::find()
            .order_by_asc(building_status::Column::Address)
            .all(db)
            .await?;
        Ok(statuses)
    }

    pub async fn get_status(
        db: &DatabaseConnection,
        address: &str,
    ) -> Result<Option<building_status::Model>, AppError> {
        let status = building_status::Entity::find_by_id(address.to_string())
            .one(db)
            .await?;
        Ok(status)
    }

    /// Stored `(dob_violations, ecb_violations)` per address, used to
    /// diff a fresh scrape against the previous check.
    pub async fn violation_snapshot(
        db: &DatabaseConnection,
    ) -> Result<HashMap<String, (i32, i32)>, AppError> {
        let statuses = building_status::Entity::find().all(db).await?;
        Ok(statuses
            .into_iter()
            .map(|s| (s.address, (s.dob_violations, s.ecb_violations)))
            .collect())
    }

    /// Overwrite the snapshot row for an address with freshly scraped
    /// counters. The stored BIN survives the overwrite.
    pub async fn upsert_snapshot(
        db: &DatabaseConnection,
        address: &str,
        summary: &BisSummary,
        checked_at: NaiveDateTime,
    ) -> Result<(), AppError> {
        let existing = Self::get_status(db, address).await?;

        match existing {
            Some(model) => {
                let mut active: building_status::ActiveModel = model.into();
                active.complaints = Set(summary.complaints);
                active.dob_violations = Set(summary.dob_violations);
                active.ecb_violations = Set(summary.ecb_violations);
                active.last_checked = Set(Some(checked_at));
                active.update(db).await?;
            }
            None => {
                let active = building_status::ActiveModel {
                    address: Set(address.to_string()),
                    bin: Set(None),
                    last_checked: Set(Some(checked_at)),
                    complaints: Set(summary.complaints),
                    dob_violations: Set(summary.dob_violations),
                    ecb_violations: Set(summary.ecb_violations),
                };
                active.insert(db).await?;
            }
        }
        Ok(())
    }

    pub async fn get_bin(
        db: &DatabaseConnection,
        address: &str,
    ) -> Result<Option<String>, AppError> {
        Ok(Self::get_status(db, address).await?.and_then(|s| s.bin))
    }

    /// Store a scraped BIN for an address; creates the snapshot row if
    /// the address has never been checked.
    pub async fn set_bin(
        db: &DatabaseConnection,
        address: &str,
        bin: &str,
    ) -> Result<(), AppError> {
        let existing = Self::get_status(db, address).await?;

        match existing {
            Some(model) => {
                let mut active: building_status::ActiveModel = model.into();
                active.bin = Set(Some(bin.to_string()));
                active.update(db).await?;
            }
            None => {
                let active = building_status::ActiveModel {
                    address: Set(address.to_string()),
                    bin: Set(Some(bin.to_string())),
                    last_checked: Set(None),
                    complaints: Set(0),
                    dob_violations: Set(0),
                    ecb_violations: Set(0),
                };
                active.insert(db).await?;
            }
        }
        info!(address = %address, bin = %bin, "Stored BIN for address");
        Ok(())
    }
}
