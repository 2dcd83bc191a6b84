//! REST routes of the PenseOffline backend.

pub const REGISTER_PATH: &str = "/users/register";
pub const LOGIN_PATH: &str = "/users/login";
pub const CURRENT_USER_PATH: &str = "/users/me";
pub const XP_HISTORY_PATH: &str = "/users/me/xp_history";
pub const PROFILE_UPDATE_PATH: &str = "/profiles/me";
pub const RANKING_PATH: &str = "/profiles/ranking";
pub const COMMUNITIES_PATH: &str = "/communities/";
pub const EVENTS_PATH: &str = "/events/";
pub const ADD_SCREEN_FREE_TIME_PATH: &str = "/rewards/add-time";
pub const COMPLETE_CHALLENGE_PATH: &str = "/rewards/complete-challenge";
pub const NOTIFICATIONS_PATH: &str = "/notifications";
pub const UNREAD_NOTIFICATIONS_COUNT_PATH: &str = "/notifications/unread/count";

#[must_use]
pub fn user_path(user_id: &str) -> String {
    format!("/users/{}", encode_path_component(user_id))
}

#[must_use]
pub fn community_path(community_id: &str) -> String {
    format!("/communities/{}", encode_path_component(community_id))
}

#[must_use]
pub fn join_community_path(community_id: &str) -> String {
    format!("{}/join", community_path(community_id))
}

#[must_use]
pub fn leave_community_path(community_id: &str) -> String {
    format!("{}/leave", community_path(community_id))
}

#[must_use]
pub fn event_path(event_id: &str) -> String {
    format!("/events/{}", encode_path_component(event_id))
}

#[must_use]
pub fn attend_event_path(event_id: &str) -> String {
    format!("{}/attend", event_path(event_id))
}

#[must_use]
pub fn notification_read_path(notification_id: &str) -> String {
    format!("/notifications/{}/read", encode_path_component(notification_id))
}

/// Joins a normalized base URL and an absolute path.
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn encode_path_component(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.trim().bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers_are_deterministic() {
        assert_eq!(user_path("42"), "/users/42");
        assert_eq!(community_path("7"), "/communities/7");
        assert_eq!(join_community_path("7"), "/communities/7/join");
        assert_eq!(leave_community_path("7"), "/communities/7/leave");
        assert_eq!(event_path("3"), "/events/3");
        assert_eq!(attend_event_path("3"), "/events/3/attend");
        assert_eq!(notification_read_path("9"), "/notifications/9/read");
    }

    #[test]
    fn ids_are_percent_encoded() {
        assert_eq!(user_path(" a/b "), "/users/a%2Fb");
        assert_eq!(event_path("café"), "/events/caf%C3%A9");
    }

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(
            join_url("http://127.0.0.1:8000/", "/users/me"),
            "http://127.0.0.1:8000/users/me"
        );
        assert_eq!(
            join_url("https://penseoffline.app", "events/"),
            "https://penseoffline.app/events/"
        );
    }
}
