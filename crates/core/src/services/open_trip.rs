//! Open trip service.

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use traversee_common::{AppError, AppResult};
use traversee_db::entities::{open_trip, trip_destination};
use traversee_db::listing::OPEN_TRIP_PAGE_SIZE;
use traversee_db::repositories::OpenTripRepository;
use traversee_db::PageRequest;

/// Serialized open trip with fields derived from its destinations.
#[derive(Debug, Clone, Serialize)]
pub struct OpenTripView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: String,
    pub organizer: String,
    pub trip_start: NaiveDateTime,
    pub trip_end: NaiveDateTime,
    pub regis_deadline: NaiveDateTime,
    pub phone_number: String,
    pub duration: String,
    pub images_url: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DestinationView {
    pub id: i32,
    pub name: String,
    pub location_name: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub trip_id: i32,
}

impl From<trip_destination::Model> for DestinationView {
    fn from(model: trip_destination::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            location_name: model.location_name,
            image_url: model.image_url,
            category: model.category,
            trip_id: model.trip_id,
        }
    }
}

/// Request body for a new open trip. Dates use `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateOpenTripInput {
    #[validate(length(max = 100))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 20))]
    pub price: Option<String>,
    #[validate(length(max = 50))]
    pub organizer: Option<String>,
    pub trip_start: Option<String>,
    pub trip_end: Option<String>,
    pub regis_deadline: Option<String>,
    #[validate(length(max = 15))]
    pub phone_number: Option<String>,
}

/// Request body for a new trip destination.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateDestinationInput {
    #[validate(length(max = 50))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub location_name: Option<String>,
    pub image_url: Option<String>,
    #[validate(length(max = 20))]
    pub category: Option<String>,
}

fn required(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn parse_day(field: &str, raw: &str) -> AppResult<NaiveDateTime> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| AppError::BadRequest(format!("{field} must be a date in YYYY-MM-DD format")))
}

/// Distinct values in first-seen order, skipping missing ones.
fn distinct<'a>(values: impl Iterator<Item = Option<&'a String>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values.flatten() {
        if !out.contains(value) {
            out.push(value.clone());
        }
    }
    out
}

/// Open trip service.
#[derive(Clone)]
pub struct OpenTripService {
    trip_repo: OpenTripRepository,
}

impl OpenTripService {
    /// Create a new open trip service.
    #[must_use]
    pub const fn new(trip_repo: OpenTripRepository) -> Self {
        Self { trip_repo }
    }

    async fn get_trip(&self, id: i32) -> AppResult<open_trip::Model> {
        self.trip_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Open trip with id {id} doesn't exist")))
    }

    /// Trips by registration deadline, latest first.
    pub async fn list(&self, page: Option<&str>) -> AppResult<Vec<OpenTripView>> {
        let page = PageRequest::parse(page, OPEN_TRIP_PAGE_SIZE);
        let trips = self.trip_repo.list(page).await?;

        let mut views = Vec::with_capacity(trips.len());
        for trip in trips {
            views.push(self.trip_view(trip).await?);
        }
        Ok(views)
    }

    /// A single trip.
    pub async fn get(&self, id: i32) -> AppResult<OpenTripView> {
        let trip = self.get_trip(id).await?;
        self.trip_view(trip).await
    }

    /// Publish a trip.
    pub async fn create(&self, input: CreateOpenTripInput) -> AppResult<OpenTripView> {
        let (
            Some(title),
            Some(description),
            Some(price),
            Some(organizer),
            Some(trip_start),
            Some(trip_end),
            Some(regis_deadline),
            Some(phone_number),
        ) = (
            required(input.title.as_ref()),
            required(input.description.as_ref()),
            required(input.price.as_ref()),
            required(input.organizer.as_ref()),
            required(input.trip_start.as_ref()),
            required(input.trip_end.as_ref()),
            required(input.regis_deadline.as_ref()),
            required(input.phone_number.as_ref()),
        )
        else {
            return Err(AppError::BadRequest("Please input all required data".to_string()));
        };
        input.validate()?;

        let model = open_trip::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            price: Set(price.to_string()),
            organizer: Set(organizer.to_string()),
            trip_start: Set(parse_day("trip_start", trip_start)?),
            trip_end: Set(parse_day("trip_end", trip_end)?),
            regis_deadline: Set(parse_day("regis_deadline", regis_deadline)?),
            phone_number: Set(phone_number.to_string()),
            ..Default::default()
        };
        let trip = self.trip_repo.create(model).await?;

        tracing::info!(trip_id = trip.id, "Created open trip");
        self.trip_view(trip).await
    }

    /// Delete a trip and its destinations.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let trip = self.get_trip(id).await?;
        self.trip_repo.delete(trip.id).await?;
        tracing::info!(trip_id = id, "Deleted open trip");
        Ok(())
    }

    /// Destinations of a trip.
    pub async fn destinations(&self, trip_id: i32) -> AppResult<Vec<DestinationView>> {
        let trip = self.get_trip(trip_id).await?;
        let destinations = self.trip_repo.list_destinations(trip.id).await?;
        Ok(destinations.into_iter().map(Into::into).collect())
    }

    /// Add a destination to a trip.
    pub async fn add_destination(
        &self,
        trip_id: i32,
        input: CreateDestinationInput,
    ) -> AppResult<DestinationView> {
        let trip = self.get_trip(trip_id).await?;

        let (Some(name), Some(location_name)) = (
            required(input.name.as_ref()),
            required(input.location_name.as_ref()),
        ) else {
            return Err(AppError::BadRequest("Name and location are required".to_string()));
        };
        input.validate()?;

        let destination = self
            .trip_repo
            .create_destination(trip_destination::ActiveModel {
                name: Set(name.to_string()),
                location_name: Set(Some(location_name.to_string())),
                image_url: Set(input.image_url.clone()),
                category: Set(input.category.clone()),
                trip_id: Set(trip.id),
                ..Default::default()
            })
            .await?;

        Ok(destination.into())
    }

    /// Remove a destination from a trip.
    pub async fn delete_destination(&self, trip_id: i32, destination_id: i32) -> AppResult<()> {
        let trip = self.get_trip(trip_id).await?;

        let destination = self
            .trip_repo
            .find_destination(destination_id)
            .await?
            .filter(|d| d.trip_id == trip.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Destination with id {destination_id} doesn't exist"))
            })?;

        self.trip_repo.delete_destination(destination.id).await
    }

    async fn trip_view(&self, trip: open_trip::Model) -> AppResult<OpenTripView> {
        let destinations = self.trip_repo.list_destinations(trip.id).await?;

        Ok(OpenTripView {
            duration: format!("{} days", trip.duration_days()),
            images_url: distinct(destinations.iter().map(|d| d.image_url.as_ref())),
            categories: distinct(destinations.iter().map(|d| d.category.as_ref())),
            id: trip.id,
            title: trip.title,
            description: trip.description,
            price: trip.price,
            organizer: trip.organizer,
            trip_start: trip.trip_start,
            trip_end: trip.trip_end,
            regis_deadline: trip.regis_deadline,
            phone_number: trip.phone_number,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> OpenTripService {
        OpenTripService::new(OpenTripRepository::new(Arc::new(db)))
    }

    fn day(raw: &str) -> NaiveDateTime {
        parse_day("test", raw).unwrap()
    }

    fn trip(id: i32) -> open_trip::Model {
        open_trip::Model {
            id,
            title: "Lombok island hopping".to_string(),
            description: "Three gilis in four days".to_string(),
            price: "Rp 2.000.000".to_string(),
            organizer: "Nusa Trip".to_string(),
            trip_start: day("2024-07-01"),
            trip_end: day("2024-07-04"),
            regis_deadline: day("2024-06-20"),
            phone_number: "081234567890".to_string(),
        }
    }

    fn destination(id: i32, image: Option<&str>, category: Option<&str>) -> trip_destination::Model {
        trip_destination::Model {
            id,
            name: format!("Spot {id}"),
            location_name: Some("Lombok".to_string()),
            image_url: image.map(ToString::to_string),
            category: category.map(ToString::to_string),
            trip_id: 1,
        }
    }

    #[tokio::test]
    async fn test_trip_view_derived_fields() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[trip(1)]])
            .append_query_results([[
                destination(1, Some("https://img/a.png"), Some("Beach")),
                destination(2, Some("https://img/b.png"), Some("Beach")),
                destination(3, None, Some("Hill")),
                destination(4, Some("https://img/a.png"), None),
            ]])
            .into_connection();

        let view = service(db).get(1).await.unwrap();

        assert_eq!(view.duration, "3 days");
        assert_eq!(view.images_url, vec!["https://img/a.png", "https://img/b.png"]);
        assert_eq!(view.categories, vec!["Beach", "Hill"]);
    }

    #[tokio::test]
    async fn test_create_requires_every_field() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let input = CreateOpenTripInput {
            title: Some("Lombok".to_string()),
            ..Default::default()
        };
        let result = service(db).create(input).await;
        match result {
            Err(AppError::BadRequest(message)) => {
                assert_eq!(message, "Please input all required data");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_bad_date() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let input = CreateOpenTripInput {
            title: Some("Lombok".to_string()),
            description: Some("Gilis".to_string()),
            price: Some("Rp 1".to_string()),
            organizer: Some("Nusa".to_string()),
            trip_start: Some("01-07-2024".to_string()),
            trip_end: Some("2024-07-04".to_string()),
            regis_deadline: Some("2024-06-20".to_string()),
            phone_number: Some("0812".to_string()),
        };
        let result = service(db).create(input).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_add_destination_requires_name_and_location() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[trip(1)]])
            .into_connection();

        let input = CreateDestinationInput {
            name: Some("Gili Air".to_string()),
            ..Default::default()
        };
        let result = service(db).add_destination(1, input).await;
        match result {
            Err(AppError::BadRequest(message)) => {
                assert_eq!(message, "Name and location are required");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_missing_destination() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[trip(1)]])
            .append_query_results([Vec::<trip_destination::Model>::new()])
            .into_connection();

        let result = service(db).delete_destination(1, 8).await;
        match result {
            Err(AppError::NotFound(message)) => {
                assert_eq!(message, "Destination with id 8 doesn't exist");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_missing_trip() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<open_trip::Model>::new()])
            .into_connection();

        let result = service(db).get(2).await;
        match result {
            Err(AppError::NotFound(message)) => {
                assert_eq!(message, "Open trip with id 2 doesn't exist");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
