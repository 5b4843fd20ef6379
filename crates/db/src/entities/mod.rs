//! Database entities.

#![allow(missing_docs)]

pub mod campaign;
pub mod campaign_category;
pub mod campaign_detail;
pub mod campaign_location;
pub mod campaign_participant;
pub mod campaign_winner;
pub mod comment;
pub mod forum;
pub mod forum_campaign;
pub mod forum_like;
pub mod open_trip;
pub mod tourism;
pub mod tourism_category;
pub mod tourism_detail;
pub mod tourism_favorite;
pub mod tourism_location;
pub mod tourism_user_click;
pub mod trip_destination;

pub use campaign::Entity as Campaign;
pub use campaign_category::Entity as CampaignCategory;
pub use campaign_detail::Entity as CampaignDetail;
pub use campaign_location::Entity as CampaignLocation;
pub use campaign_participant::Entity as CampaignParticipant;
pub use campaign_winner::Entity as CampaignWinner;
pub use comment::Entity as Comment;
pub use forum::Entity as Forum;
pub use forum_campaign::Entity as ForumCampaign;
pub use forum_like::Entity as ForumLike;
pub use open_trip::Entity as OpenTrip;
pub use tourism::Entity as Tourism;
pub use tourism_category::Entity as TourismCategory;
pub use tourism_detail::Entity as TourismDetail;
pub use tourism_favorite::Entity as TourismFavorite;
pub use tourism_location::Entity as TourismLocation;
pub use tourism_user_click::Entity as TourismUserClick;
pub use trip_destination::Entity as TripDestination;
