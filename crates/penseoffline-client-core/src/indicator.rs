//! What the navbar indicator shows, as plain data. The web shell turns this
//! into DOM; nothing here touches a browser API.

use serde::Serialize;

use crate::profile::{DEFAULT_LEVEL, Session};

pub const BADGE_OVERFLOW_LABEL: &str = "9+";
const BADGE_MAX_EXACT: u64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuLink {
    pub label: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
}

pub const MENU_LINKS: [MenuLink; 4] = [
    MenuLink {
        label: "Dashboard",
        href: "/dashboard.html",
        icon: "glyphicon-dashboard",
    },
    MenuLink {
        label: "Meu Perfil",
        href: "/perfil.html",
        icon: "glyphicon-user",
    },
    MenuLink {
        label: "Desafios",
        href: "/desafios.html",
        icon: "glyphicon-tasks",
    },
    MenuLink {
        label: "Ranking",
        href: "/ranking.html",
        icon: "glyphicon-star",
    },
];

pub const LOGOUT_LABEL: &str = "Sair";
pub const LOGOUT_REDIRECT: &str = "/";
pub const DASHBOARD_HREF: &str = "/dashboard.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorView {
    pub display_name: String,
    pub full_name: String,
    pub handle: String,
    pub level_label: String,
}

impl IndicatorView {
    /// `None` unless the session holds both a token and a profile.
    #[must_use]
    pub fn from_session(session: &Session) -> Option<Self> {
        if !session.is_authenticated() {
            return None;
        }
        let user = session.user.as_ref()?;
        let username = user.username().unwrap_or_default();
        let level = user.level().filter(|level| *level > 0).unwrap_or(DEFAULT_LEVEL);

        Some(Self {
            display_name: user.display_name().unwrap_or_default().to_string(),
            full_name: user.name().unwrap_or(username).to_string(),
            handle: format!("@{username}"),
            level_label: level_label(level),
        })
    }
}

#[must_use]
pub fn level_label(level: u64) -> String {
    format!("Nv. {level}")
}

/// Unread-notification badge text; no badge for zero.
#[must_use]
pub fn badge_label(unread: u64) -> Option<String> {
    match unread {
        0 => None,
        count if count > BADGE_MAX_EXACT => Some(BADGE_OVERFLOW_LABEL.to_string()),
        count => Some(count.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use serde_json::json;

    fn session(user: serde_json::Value) -> Session {
        Session {
            token: Some("abc".to_string()),
            user: Profile::from_value(user),
        }
    }

    #[test]
    fn view_uses_name_and_level() {
        let view = IndicatorView::from_session(&session(json!({
            "username": "ana",
            "name": "Ana Souza",
            "nivel": 3
        })))
        .expect("view");

        assert_eq!(view.display_name, "Ana Souza");
        assert_eq!(view.full_name, "Ana Souza");
        assert_eq!(view.handle, "@ana");
        assert_eq!(view.level_label, "Nv. 3");
    }

    #[test]
    fn view_falls_back_to_username_and_level_one() {
        let view = IndicatorView::from_session(&session(json!({ "username": "ana" })))
            .expect("view");

        assert_eq!(view.display_name, "ana");
        assert_eq!(view.level_label, "Nv. 1");
    }

    #[test]
    fn no_view_without_full_session() {
        assert!(IndicatorView::from_session(&Session::default()).is_none());

        let mut token_only = session(json!({ "username": "ana" }));
        token_only.user = None;
        assert!(IndicatorView::from_session(&token_only).is_none());
    }

    #[test]
    fn badge_caps_at_nine_plus() {
        assert_eq!(badge_label(0), None);
        assert_eq!(badge_label(1), Some("1".to_string()));
        assert_eq!(badge_label(9), Some("9".to_string()));
        assert_eq!(badge_label(10), Some(BADGE_OVERFLOW_LABEL.to_string()));
        assert_eq!(badge_label(250), Some(BADGE_OVERFLOW_LABEL.to_string()));
    }
}
