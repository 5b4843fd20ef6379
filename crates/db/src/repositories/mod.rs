//! Database repositories.

pub mod campaign;
pub mod campaign_participant;
pub mod comment;
pub mod forum;
pub mod forum_like;
pub mod open_trip;
pub mod tourism;
pub mod tourism_favorite;
pub mod tourism_user_click;

pub use campaign::CampaignRepository;
pub use campaign_participant::CampaignParticipantRepository;
pub use comment::CommentRepository;
pub use forum::ForumRepository;
pub use forum_like::ForumLikeRepository;
pub use open_trip::OpenTripRepository;
pub use tourism::TourismRepository;
pub use tourism_favorite::TourismFavoriteRepository;
pub use tourism_user_click::TourismClickRepository;
