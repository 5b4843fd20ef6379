//! Open trip and trip destination repository.

use std::sync::Arc;

use crate::entities::{OpenTrip, TripDestination, open_trip, trip_destination};
use crate::listing::{self, PageRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use traversee_common::{AppError, AppResult};

/// Open trip repository for database operations.
#[derive(Clone)]
pub struct OpenTripRepository {
    db: Arc<DatabaseConnection>,
}

impl OpenTripRepository {
    /// Create a new open trip repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a trip by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<open_trip::Model>> {
        OpenTrip::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All trips, latest registration deadline first.
    pub async fn list(&self, page: PageRequest) -> AppResult<Vec<open_trip::Model>> {
        let query = OpenTrip::find().order_by_desc(open_trip::Column::RegisDeadline);

        listing::fetch(query, page, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a trip.
    pub async fn create(&self, model: open_trip::ActiveModel) -> AppResult<open_trip::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a trip and its destinations.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        OpenTrip::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Destinations of a trip in insertion order.
    pub async fn list_destinations(
        &self,
        trip_id: i32,
    ) -> AppResult<Vec<trip_destination::Model>> {
        TripDestination::find()
            .filter(trip_destination::Column::TripId.eq(trip_id))
            .order_by_asc(trip_destination::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a destination by ID.
    pub async fn find_destination(&self, id: i32) -> AppResult<Option<trip_destination::Model>> {
        TripDestination::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a destination.
    pub async fn create_destination(
        &self,
        model: trip_destination::ActiveModel,
    ) -> AppResult<trip_destination::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a destination by ID.
    pub async fn delete_destination(&self, id: i32) -> AppResult<()> {
        TripDestination::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_trip(id: i32) -> open_trip::Model {
        let day = |d| {
            NaiveDate::from_ymd_opt(2024, 7, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        open_trip::Model {
            id,
            title: "Bromo sunrise".to_string(),
            description: "Three days around Bromo".to_string(),
            price: "Rp 1.500.000".to_string(),
            organizer: "Jelajah".to_string(),
            trip_start: day(10),
            trip_end: day(13),
            regis_deadline: day(1),
            phone_number: "08123456789".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_trip(4)]])
                .into_connection(),
        );

        let repo = OpenTripRepository::new(db);
        let trip = repo.find_by_id(4).await.unwrap().unwrap();
        assert_eq!(trip.organizer, "Jelajah");
    }

    #[tokio::test]
    async fn test_list_destinations() {
        let destinations = vec![
            trip_destination::Model {
                id: 1,
                name: "Penanjakan".to_string(),
                location_name: Some("Probolinggo".to_string()),
                image_url: None,
                category: Some("Mountain".to_string()),
                trip_id: 4,
            },
            trip_destination::Model {
                id: 2,
                name: "Savana".to_string(),
                location_name: Some("Probolinggo".to_string()),
                image_url: None,
                category: Some("Mountain".to_string()),
                trip_id: 4,
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([destinations])
                .into_connection(),
        );

        let repo = OpenTripRepository::new(db);
        let result = repo.list_destinations(4).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].name, "Savana");
    }
}
