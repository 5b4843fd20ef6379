//! Tourism service.

use sea_orm::Set;
use serde::Serialize;

use traversee_common::{AppError, AppResult};
use traversee_db::entities::{
    tourism, tourism_category, tourism_favorite, tourism_location, tourism_user_click,
};
use traversee_db::listing::TOURISM_PAGE_SIZE;
use traversee_db::repositories::{
    TourismClickRepository, TourismFavoriteRepository, TourismRepository,
};
use traversee_db::PageRequest;

use super::filter::{TourismFilter, TourismQuery};

/// Serialized tourism spot.
#[derive(Debug, Clone, Serialize)]
pub struct TourismView {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub category_name: String,
    pub location_name: String,
}

/// A tourism spot together with the requester's favorite flag.
#[derive(Debug, Clone, Serialize)]
pub struct TourismItem {
    pub tourism: TourismView,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TourismDetailView {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TourismCategoryView {
    pub id: i32,
    pub name: String,
    pub image_url: String,
}

impl From<tourism_category::Model> for TourismCategoryView {
    fn from(model: tourism_category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            image_url: model.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TourismLocationView {
    pub id: i32,
    pub name: String,
}

impl From<tourism_location::Model> for TourismLocationView {
    fn from(model: tourism_location::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Tourism service for listings, favorites and detail views.
#[derive(Clone)]
pub struct TourismService {
    tourism_repo: TourismRepository,
    favorite_repo: TourismFavoriteRepository,
    click_repo: TourismClickRepository,
}

impl TourismService {
    /// Create a new tourism service.
    #[must_use]
    pub const fn new(
        tourism_repo: TourismRepository,
        favorite_repo: TourismFavoriteRepository,
        click_repo: TourismClickRepository,
    ) -> Self {
        Self {
            tourism_repo,
            favorite_repo,
            click_repo,
        }
    }

    async fn get_tourism(&self, id: &str) -> AppResult<tourism::Model> {
        self.tourism_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tourism with id {id} doesn't exist")))
    }

    /// Tourism spots matching the query, by name.
    pub async fn list(&self, requester: &str, query: &TourismQuery) -> AppResult<Vec<TourismItem>> {
        let filter = TourismFilter::from_query(query);
        let favorites = if filter.needs_favorites() {
            self.favorite_repo.tourism_ids_by_user(requester).await?
        } else {
            Vec::new()
        };

        let page = PageRequest::parse(query.page.as_deref(), TOURISM_PAGE_SIZE);
        let spots = self
            .tourism_repo
            .list(filter.condition(&favorites), page)
            .await?;

        let mut items = Vec::with_capacity(spots.len());
        for spot in spots {
            items.push(self.serialize(requester, spot).await?);
        }
        Ok(items)
    }

    /// A single tourism spot.
    pub async fn get(&self, requester: &str, id: &str) -> AppResult<TourismItem> {
        let spot = self.get_tourism(id).await?;
        self.serialize(requester, spot).await
    }

    /// Add a spot to the favorites of `user_id`.
    pub async fn add_favorite(&self, user_id: &str, id: &str) -> AppResult<TourismItem> {
        let spot = self.get_tourism(id).await?;
        let already_favorite =
            || AppError::Conflict(format!("Tourism {id} is already in favorites"));

        if self.favorite_repo.is_favorite(&spot.id, user_id).await? {
            return Err(already_favorite());
        }

        self.favorite_repo
            .create(tourism_favorite::ActiveModel {
                tourism_id: Set(spot.id.clone()),
                user_id: Set(user_id.to_string()),
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => already_favorite(),
                other => other,
            })?;

        self.serialize(user_id, spot).await
    }

    /// Remove a spot from the favorites of `user_id`.
    pub async fn remove_favorite(&self, user_id: &str, id: &str) -> AppResult<TourismItem> {
        let spot = self.get_tourism(id).await?;

        if !self.favorite_repo.is_favorite(&spot.id, user_id).await? {
            return Err(AppError::Conflict(format!("Tourism {id} isn't a favorite yet")));
        }

        self.favorite_repo.delete(&spot.id, user_id).await?;
        self.serialize(user_id, spot).await
    }

    /// Description of a spot. Each call counts as a view by `user_id`.
    pub async fn details(&self, user_id: &str, id: &str) -> AppResult<Option<TourismDetailView>> {
        let spot = self.get_tourism(id).await?;
        self.record_click(user_id, &spot.id).await?;

        let detail = self.tourism_repo.find_detail(&spot.id).await?;
        Ok(detail.map(|d| TourismDetailView {
            description: d.description,
        }))
    }

    /// Increment the view counter of `user_id` on a spot, returning the new total.
    pub async fn record_click(&self, user_id: &str, tourism_id: &str) -> AppResult<i32> {
        if let Some(existing) = self.click_repo.find(tourism_id, user_id).await? {
            return self.increment(existing).await;
        }

        let created = self
            .click_repo
            .create(tourism_user_click::ActiveModel {
                tourism_id: Set(tourism_id.to_string()),
                user_id: Set(user_id.to_string()),
                total_click: Set(1),
            })
            .await;

        match created {
            Ok(click) => Ok(click.total_click),
            // Another request inserted the first click meanwhile.
            Err(AppError::Conflict(_)) => {
                let existing = self
                    .click_repo
                    .find(tourism_id, user_id)
                    .await?
                    .ok_or_else(|| AppError::Internal("Click counter vanished".to_string()))?;
                self.increment(existing).await
            }
            Err(e) => Err(e),
        }
    }

    async fn increment(&self, click: tourism_user_click::Model) -> AppResult<i32> {
        let total = click.total_click.saturating_add(1);
        let mut active: tourism_user_click::ActiveModel = click.into();
        active.total_click = Set(total);
        Ok(self.click_repo.update(active).await?.total_click)
    }

    /// Spot with category and location names and the requester's favorite flag.
    pub async fn serialize(&self, requester: &str, spot: tourism::Model) -> AppResult<TourismItem> {
        let category = self
            .tourism_repo
            .find_category(spot.category_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Tourism {} references missing category {}",
                    spot.id, spot.category_id
                ))
            })?;
        let location = self
            .tourism_repo
            .find_location(spot.location_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Tourism {} references missing location {}",
                    spot.id, spot.location_id
                ))
            })?;
        let is_favorite = self.favorite_repo.is_favorite(&spot.id, requester).await?;

        Ok(TourismItem {
            tourism: TourismView {
                id: spot.id,
                name: spot.name,
                image_url: spot.image_url,
                category_name: category.name,
                location_name: location.name,
            },
            is_favorite,
        })
    }

    /// All tourism categories.
    pub async fn categories(&self) -> AppResult<Vec<TourismCategoryView>> {
        let categories = self.tourism_repo.list_categories().await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// All tourism locations.
    pub async fn locations(&self) -> AppResult<Vec<TourismLocationView>> {
        let locations = self.tourism_repo.list_locations().await?;
        Ok(locations.into_iter().map(Into::into).collect())
    }
}
