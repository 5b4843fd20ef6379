//! Response enrichment shared by the resource serializers.

use chrono::{DateTime, FixedOffset, NaiveDate};

use super::identity::IdentityService;

/// Display fields of a user as shown next to their content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub profile_image: Option<String>,
}

/// Resolve the display name and photo of `uid`.
///
/// Unknown users and provider failures both yield empty fields.
pub async fn user_profile(identity: &IdentityService, uid: &str) -> UserProfile {
    match identity.get_user(uid).await {
        Ok(Some(user)) => UserProfile {
            display_name: user.display_name,
            profile_image: user.photo_url,
        },
        Ok(None) => {
            tracing::warn!(uid = %uid, "User not found in identity provider");
            UserProfile::default()
        }
        Err(e) => {
            tracing::warn!(uid = %uid, error = %e, "Failed to resolve user profile");
            UserProfile::default()
        }
    }
}

/// Long date form, e.g. `01 June 2024`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// Long date form of a timestamp, in its own offset.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    format_date(timestamp.date_naive())
}
