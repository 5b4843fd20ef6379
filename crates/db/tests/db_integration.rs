//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored --test-threads=1`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `traversee_test`)
//!   `TEST_DB_PASSWORD` (default: `traversee_test`)
//!   `TEST_DB_NAME` (default: `traversee_test`)

#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use traversee_common::AppError;
use traversee_db::entities::{
    Comment, ForumLike, campaign, campaign_category, campaign_location, campaign_participant,
    comment, forum, forum_like,
};
use traversee_db::repositories::{CampaignParticipantRepository, ForumRepository};
use traversee_db::test_utils::{TestDatabase, TestDbConfig};

async fn seed_campaign(conn: &DatabaseConnection) -> campaign::Model {
    let location = campaign_location::ActiveModel {
        name: Set("Bandung".to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap();

    let category = campaign_category::ActiveModel {
        name: Set(format!("Environment {}", uuid::Uuid::new_v4())),
        image_url: Set("https://img/env.png".to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap();

    campaign::ActiveModel {
        name: Set("River cleanup".to_string()),
        image_url: Set("https://img/river.png".to_string()),
        location_id: Set(location.id),
        category_id: Set(category.id),
        start_date: Set(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        end_date: Set(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let result = TestDatabase::with_config(TestDbConfig::default()).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_registration_is_conflict() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let campaign = seed_campaign(db.connection()).await;

    let repo = CampaignParticipantRepository::new(db.shared());
    let registration = || campaign_participant::ActiveModel {
        user_id: Set("user1".to_string()),
        campaign_id: Set(campaign.id),
        submission_url: Set(None),
        created_at: Set(Utc::now().into()),
    };

    repo.create(registration()).await.unwrap();
    let second = repo.create(registration()).await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(repo.count_by_campaign(campaign.id).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_forum_delete_cascades() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let conn = db.connection();

    let forum = forum::ActiveModel {
        title: Set("Carpool".to_string()),
        text: Set("Anyone driving from Jakarta?".to_string()),
        author_id: Set("user1".to_string()),
        image_url: Set(None),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap();

    comment::ActiveModel {
        text: Set("Me".to_string()),
        author_id: Set("user2".to_string()),
        forum_id: Set(forum.id),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap();

    forum_like::ActiveModel {
        forum_id: Set(forum.id),
        user_id: Set("user2".to_string()),
    }
    .insert(conn)
    .await
    .unwrap();

    let repo = ForumRepository::new(db.shared());
    repo.delete(forum.id).await.unwrap();

    assert!(Comment::find().all(conn).await.unwrap().is_empty());
    assert!(ForumLike::find().all(conn).await.unwrap().is_empty());
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}
