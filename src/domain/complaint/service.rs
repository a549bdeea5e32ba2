use std::collections::HashSet;

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set};
use tracing::debug;

use crate::scrape::open_data::Complaint311Record;
use crate::utils::error::AppError;

use super::entity::complaint_311;

pub struct ComplaintService;

impl ComplaintService {
    /// Every incident id seen so far; a fetched record with an unknown
    /// id is a new complaint.
    pub async fn known_incident_ids(
        db: &DatabaseConnection,
    ) -> Result<HashSet<String>, AppError> {
        let ids: Vec<String> = complaint_311::Entity::find()
            .select_only()
            .column(complaint_311::Column::IncidentId)
            .into_tuple()
            .all(db)
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// Insert a fetched complaint; an already-stored incident id is a
    /// no-op. Returns whether a row was inserted.
    pub async fn insert_complaint(
        db: &DatabaseConnection,
        address: &str,
        record: &Complaint311Record,
    ) -> Result<bool, AppError> {
        let Some(incident_id) = record.incident_id.as_deref().filter(|id| !id.is_empty()) else {
            debug!(address = %address, "Skipping 311 record without incident id");
            return Ok(false);
        };

        let existing = complaint_311::Entity::find()
            .filter(complaint_311::Column::IncidentId.eq(incident_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let model = complaint_311::ActiveModel {
            incident_id: Set(incident_id.to_string()),
            address: Set(Some(address.to_string())),
            borough: Set(record.borough.clone()),
            incident_zip: Set(record.incident_zip.clone()),
            created_date: Set(record.created_date.clone()),
            complaint_type: Set(record.complaint_type.clone()),
            descriptor: Set(record.descriptor.clone()),
            agency: Set(record.agency.clone()),
            status: Set(record.status.clone()),
            closed_date: Set(record.closed_date.clone()),
            resolution_description: Set(record.resolution_description.clone()),
            location_type: Set(record.location_type.clone()),
            latitude: Set(record.latitude.clone()),
            longitude: Set(record.longitude.clone()),
            ..Default::default()
        };
        model.insert(db).await?;
        Ok(true)
    }

    /// Stored complaints for an address, most recent first.
    pub async fn for_address(
        db: &DatabaseConnection,
        address: &str,
    ) -> Result<Vec<complaint_311::Model>, AppError> {
        let complaints = complaint_311::Entity::find()
            .filter(complaint_311::Column::Address.eq(address))
            .order_by_desc(complaint_311::Column::CreatedDate)
            .all(db)
            .await?;
        Ok(complaints)
    }
}
