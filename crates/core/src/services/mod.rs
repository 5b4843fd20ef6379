//! Business logic services.

#![allow(missing_docs)]

pub mod campaign;
pub mod enrichment;
pub mod filter;
pub mod forum;
pub mod identity;
pub mod open_trip;
pub mod profile;
pub mod remote;
pub mod tourism;

pub use campaign::{
    CampaignCategoryView, CampaignDetailView, CampaignItem, CampaignLocationView,
    CampaignParticipants, CampaignService, CampaignView, ParticipantView, WinnerView,
};
pub use enrichment::{UserProfile, format_date, user_profile};
pub use filter::{CampaignFilter, CampaignQuery, TourismFilter, TourismQuery};
pub use forum::{
    CampaignSummary, CommentView, CreateForumInput, ForumItem, ForumService, ForumView,
};
pub use identity::{
    HttpIdentityProvider, IdentityProvider, IdentityService, IdentityUser, StaticIdentityProvider,
};
pub use open_trip::{
    CreateDestinationInput, CreateOpenTripInput, DestinationView, OpenTripService, OpenTripView,
};
pub use profile::ProfileService;
pub use remote::RemoteServices;
pub use tourism::{
    TourismCategoryView, TourismDetailView, TourismItem, TourismLocationView, TourismService,
    TourismView,
};
