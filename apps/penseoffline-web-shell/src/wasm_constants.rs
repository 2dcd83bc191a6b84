use penseoffline_client_core::config::ResolutionStrategy;

pub(crate) const API_URL_OVERRIDE_GLOBAL: &str = "PENSEOFFLINE_API_URL";
pub(crate) const API_HANDLE_GLOBAL: &str = "PenseOfflineAPI";
pub(crate) const UPDATE_INDICATOR_GLOBAL: &str = "updateUserIndicator";
pub(crate) const DIAGNOSTICS_CONSOLE_PREFIX: &str = "[penseoffline]";
pub(crate) const API_RESOLUTION_STRATEGY: ResolutionStrategy = ResolutionStrategy::SameOrigin;

pub(crate) const NAVBAR_SELECTOR: &str = ".navbar";
pub(crate) const NAVBAR_RIGHT_SELECTOR: &str = ".navbar-nav.navbar-right";
pub(crate) const LOGIN_LINK_SELECTOR: &str = "a[href*=\"login\"]";
pub(crate) const HIDDEN_LOGIN_ATTRIBUTE: &str = "data-penseoffline-login-hidden";
pub(crate) const HIDDEN_LOGIN_SELECTOR: &str = "[data-penseoffline-login-hidden]";
pub(crate) const USER_INDICATOR_SELECTOR: &str = ".user-indicator";
pub(crate) const USER_INDICATOR_ANCHOR_SELECTOR: &str = ".user-indicator > a";
pub(crate) const USER_NAME_SELECTOR: &str = ".user-name";
pub(crate) const USER_LEVEL_SELECTOR: &str = ".user-level-badge";
pub(crate) const NOTIFICATION_BADGE_SELECTOR: &str = ".notification-badge";

pub(crate) const USER_INDICATOR_CLASS: &str = "dropdown user-indicator";
pub(crate) const NOTIFICATION_BADGE_CLASS: &str = "notification-badge badge badge-danger";
pub(crate) const STYLES_ELEMENT_ID: &str = "user-indicator-styles";
pub(crate) const STATUS_BADGE_ID: &str = "login-status-indicator";
pub(crate) const USER_AVATAR: &str = "\u{1F464}";

pub(crate) const NOTIFICATION_BADGE_STYLE: &str = "position: absolute; top: 8px; right: 8px; \
background: #dc3545; color: white; border-radius: 10px; padding: 2px 6px; font-size: 10px;";

pub(crate) const STATUS_BADGE_STYLE: &str = "position: fixed; top: 10px; right: 10px; \
background: white; padding: 10px 20px; border-radius: 20px; \
box-shadow: 0 2px 10px rgba(0,0,0,0.2); z-index: 9999;";

pub(crate) const USER_INDICATOR_STYLES: &str = r"
.user-indicator .user-avatar {
  font-size: 18px;
  margin-right: 5px;
}
.user-indicator .user-name {
  font-weight: 500;
  margin-right: 8px;
}
.user-indicator .user-level-badge {
  background: linear-gradient(135deg, #ffd89b 0%, #19547b 100%);
  color: white;
  padding: 2px 8px;
  border-radius: 10px;
  font-size: 11px;
  font-weight: bold;
  margin-right: 5px;
}
.user-indicator .dropdown-header {
  padding: 10px 20px;
}
.user-indicator .dropdown-menu {
  min-width: 200px;
}
.user-indicator .dropdown-menu li a {
  padding: 8px 20px;
}
.user-indicator .dropdown-menu .glyphicon {
  margin-right: 8px;
  width: 14px;
}
";
