//! Forum service.

use chrono::Utc;
use sea_orm::Set;
use serde::Serialize;
use validator::Validate;

use traversee_common::{AppError, AppResult, ImageUpload, SharedStorage, forum_image_key};
use traversee_db::entities::{comment, forum, forum_campaign, forum_like};
use traversee_db::listing::{COMMENT_PAGE_SIZE, FORUM_PAGE_SIZE};
use traversee_db::repositories::{
    CampaignRepository, CommentRepository, ForumLikeRepository, ForumRepository,
};
use traversee_db::PageRequest;

use super::enrichment::{format_timestamp, user_profile};
use super::identity::IdentityService;

/// Serialized forum post.
#[derive(Debug, Clone, Serialize)]
pub struct ForumView {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub author_id: String,
    pub image_url: Option<String>,
    pub total_likes: u64,
    pub total_comments: u64,
    pub user_display_name: Option<String>,
    pub user_profile_image: Option<String>,
    pub created_date: String,
}

/// Compact campaign shown next to a linked forum.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignSummary {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub image_url: String,
}

/// A forum together with the requester's like and the linked campaign.
#[derive(Debug, Clone, Serialize)]
pub struct ForumItem {
    pub forum: ForumView,
    pub is_liked: bool,
    pub campaign: Option<CampaignSummary>,
}

/// Serialized comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: i32,
    pub text: String,
    pub author_id: String,
    pub forum_id: i32,
    pub user_display_name: Option<String>,
    pub user_profile_image: Option<String>,
    pub created_date: String,
}

/// Input for a new forum.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateForumInput {
    #[validate(length(max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub text: Option<String>,
    pub campaign_id: Option<i32>,
    pub image: Option<ImageUpload>,
}

/// Input for a new comment.
#[derive(Debug, Clone, Validate)]
struct CreateCommentInput {
    #[validate(length(max = 300))]
    text: String,
}

/// Forum service for posts, likes and comments.
#[derive(Clone)]
pub struct ForumService {
    forum_repo: ForumRepository,
    like_repo: ForumLikeRepository,
    comment_repo: CommentRepository,
    campaign_repo: CampaignRepository,
    identity: IdentityService,
    storage: SharedStorage,
}

impl ForumService {
    /// Create a new forum service.
    #[must_use]
    pub const fn new(
        forum_repo: ForumRepository,
        like_repo: ForumLikeRepository,
        comment_repo: CommentRepository,
        campaign_repo: CampaignRepository,
        identity: IdentityService,
        storage: SharedStorage,
    ) -> Self {
        Self {
            forum_repo,
            like_repo,
            comment_repo,
            campaign_repo,
            identity,
            storage,
        }
    }

    async fn get_forum(&self, id: i32) -> AppResult<forum::Model> {
        self.forum_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Forum with id {id} doesn't exist")))
    }

    /// All forums, newest first.
    pub async fn list(&self, requester: &str, page: Option<&str>) -> AppResult<Vec<ForumItem>> {
        let page = PageRequest::parse(page, FORUM_PAGE_SIZE);
        let forums = self.forum_repo.list(page).await?;
        self.serialize_all(requester, forums).await
    }

    /// Forums written by `author_id`, newest first.
    pub async fn list_by_author(
        &self,
        requester: &str,
        author_id: &str,
        page: Option<&str>,
    ) -> AppResult<Vec<ForumItem>> {
        if self.identity.get_user(author_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "User with id {author_id} doesn't exist"
            )));
        }

        let page = PageRequest::parse(page, FORUM_PAGE_SIZE);
        let forums = self.forum_repo.list_by_author(author_id, page).await?;
        self.serialize_all(requester, forums).await
    }

    async fn serialize_all(
        &self,
        requester: &str,
        forums: Vec<forum::Model>,
    ) -> AppResult<Vec<ForumItem>> {
        let mut items = Vec::with_capacity(forums.len());
        for forum in forums {
            items.push(self.serialize(requester, forum).await?);
        }
        Ok(items)
    }

    /// A single forum.
    pub async fn get(&self, requester: &str, id: i32) -> AppResult<ForumItem> {
        let forum = self.get_forum(id).await?;
        self.serialize(requester, forum).await
    }

    /// Publish a forum, storing its image and linking the campaign if any.
    ///
    /// An unknown `campaign_id` is ignored.
    pub async fn create(&self, author_id: &str, input: CreateForumInput) -> AppResult<ForumItem> {
        let (Some(title), Some(text)) = (
            input.title.as_deref().filter(|t| !t.is_empty()),
            input.text.as_deref().filter(|t| !t.is_empty()),
        ) else {
            return Err(AppError::BadRequest("Title and text are required".to_string()));
        };
        input.validate()?;

        let image_url = match &input.image {
            Some(image) => {
                let key = forum_image_key(image.subtype()?);
                let stored = self
                    .storage
                    .upload(&key, &image.data, &image.content_type)
                    .await?;
                Some(stored.url)
            }
            None => None,
        };

        let model = forum::ActiveModel {
            title: Set(title.to_string()),
            text: Set(text.to_string()),
            author_id: Set(author_id.to_string()),
            image_url: Set(image_url),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let forum = self.forum_repo.create(model).await?;

        if let Some(campaign_id) = input.campaign_id {
            if self.campaign_repo.find_by_id(campaign_id).await?.is_some() {
                self.forum_repo
                    .link_campaign(forum_campaign::ActiveModel {
                        forum_id: Set(forum.id),
                        campaign_id: Set(campaign_id),
                    })
                    .await?;
            } else {
                tracing::debug!(campaign_id, "Skipping link to unknown campaign");
            }
        }

        tracing::info!(forum_id = forum.id, author_id = %author_id, "Created forum");
        self.serialize(author_id, forum).await
    }

    /// Delete a forum written by `user_id`. Comments and likes go with it.
    pub async fn delete(&self, user_id: &str, id: i32) -> AppResult<()> {
        let forum = self.get_forum(id).await?;
        if forum.author_id != user_id {
            return Err(AppError::Forbidden(format!(
                "You're not author of the forum with id {id}"
            )));
        }

        self.forum_repo.delete(forum.id).await?;
        tracing::info!(forum_id = id, "Deleted forum");
        Ok(())
    }

    /// Like a forum.
    pub async fn like(&self, user_id: &str, id: i32) -> AppResult<ForumView> {
        let forum = self.get_forum(id).await?;
        let already_liked = || AppError::Conflict(format!("Forum {id} is already liked"));

        if self.like_repo.is_liked(forum.id, user_id).await? {
            return Err(already_liked());
        }

        self.like_repo
            .create(forum_like::ActiveModel {
                forum_id: Set(forum.id),
                user_id: Set(user_id.to_string()),
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => already_liked(),
                other => other,
            })?;

        self.forum_view(forum).await
    }

    /// Remove the like of `user_id` from a forum.
    pub async fn unlike(&self, user_id: &str, id: i32) -> AppResult<ForumView> {
        let forum = self.get_forum(id).await?;

        if !self.like_repo.is_liked(forum.id, user_id).await? {
            return Err(AppError::Conflict(format!("Forum {id} is not liked yet")));
        }

        self.like_repo.delete(forum.id, user_id).await?;
        self.forum_view(forum).await
    }

    /// Comment on a forum.
    pub async fn add_comment(
        &self,
        user_id: &str,
        forum_id: i32,
        text: Option<&str>,
    ) -> AppResult<CommentView> {
        let forum = self.get_forum(forum_id).await?;

        let input = text
            .filter(|t| !t.is_empty())
            .map(|t| CreateCommentInput {
                text: t.to_string(),
            })
            .ok_or_else(|| AppError::BadRequest("Text are required".to_string()))?;
        input.validate()?;

        let comment = self
            .comment_repo
            .create(comment::ActiveModel {
                text: Set(input.text),
                author_id: Set(user_id.to_string()),
                forum_id: Set(forum.id),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await?;

        Ok(self.comment_view(comment).await)
    }

    /// Comments of a forum, newest first.
    pub async fn comments(&self, forum_id: i32, page: Option<&str>) -> AppResult<Vec<CommentView>> {
        let forum = self.get_forum(forum_id).await?;

        let page = PageRequest::parse(page, COMMENT_PAGE_SIZE);
        let comments = self.comment_repo.list_by_forum(forum.id, page).await?;

        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            views.push(self.comment_view(comment).await);
        }
        Ok(views)
    }

    /// Delete a comment written by `user_id`.
    pub async fn delete_comment(&self, user_id: &str, forum_id: i32, comment_id: i32) -> AppResult<()> {
        let forum = self.get_forum(forum_id).await?;

        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.forum_id == forum.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Comment with id {comment_id} doesn't exist"))
            })?;

        if comment.author_id != user_id {
            return Err(AppError::Forbidden(format!(
                "You're not author of the comment with id {comment_id}"
            )));
        }

        self.comment_repo.delete(comment.id).await
    }

    /// Forum with the requester's like flag and linked campaign.
    pub async fn serialize(&self, requester: &str, forum: forum::Model) -> AppResult<ForumItem> {
        let forum_id = forum.id;
        let view = self.forum_view(forum).await?;
        let is_liked = self.like_repo.is_liked(forum_id, requester).await?;
        let campaign = self.campaign_summary(forum_id).await?;

        Ok(ForumItem {
            forum: view,
            is_liked,
            campaign,
        })
    }

    async fn forum_view(&self, forum: forum::Model) -> AppResult<ForumView> {
        let total_likes = self.like_repo.count_by_forum(forum.id).await?;
        let total_comments = self.comment_repo.count_by_forum(forum.id).await?;
        let author = user_profile(&self.identity, &forum.author_id).await;

        Ok(ForumView {
            created_date: format_timestamp(&forum.created_at),
            id: forum.id,
            title: forum.title,
            text: forum.text,
            author_id: forum.author_id,
            image_url: forum.image_url,
            total_likes,
            total_comments,
            user_display_name: author.display_name,
            user_profile_image: author.profile_image,
        })
    }

    async fn campaign_summary(&self, forum_id: i32) -> AppResult<Option<CampaignSummary>> {
        let Some(link) = self.forum_repo.find_campaign_link(forum_id).await? else {
            return Ok(None);
        };
        let Some(campaign) = self.campaign_repo.find_by_id(link.campaign_id).await? else {
            return Ok(None);
        };
        let category = self
            .campaign_repo
            .find_category(campaign.category_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Campaign {} references missing category {}",
                    campaign.id, campaign.category_id
                ))
            })?;

        Ok(Some(CampaignSummary {
            id: campaign.id,
            name: campaign.name,
            category: category.name,
            image_url: campaign.image_url,
        }))
    }

    async fn comment_view(&self, comment: comment::Model) -> CommentView {
        let author = user_profile(&self.identity, &comment.author_id).await;
        CommentView {
            created_date: format_timestamp(&comment.created_at),
            id: comment.id,
            text: comment.text,
            author_id: comment.author_id,
            forum_id: comment.forum_id,
            user_display_name: author.display_name,
            user_profile_image: author.profile_image,
        }
    }
}
