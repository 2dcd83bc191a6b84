use super::*;

/// Brings the page in line with the current session. Safe to call any
/// number of times: existing widgets are updated in place.
pub(super) fn render_indicator(client: &Rc<WebClient>) -> Result<(), String> {
    let document = page_document()?;
    let view = IndicatorView::from_session(&client.get_session());

    if let Some(navbar_right) = query(&document, NAVBAR_RIGHT_SELECTOR)? {
        match view.as_ref() {
            Some(view) => {
                hide_login_links(&navbar_right)?;
                upsert_user_widget(&document, &navbar_right, view, client)?;
                ensure_indicator_styles(&document)?;
                spawn_local(load_notification_badge(Rc::clone(client)));
            }
            None => {
                if let Some(widget) = query_in(&navbar_right, USER_INDICATOR_SELECTOR)? {
                    widget.remove();
                }
                restore_login_links(&navbar_right)?;
            }
        }
    }

    if query(&document, NAVBAR_SELECTOR)?.is_none() {
        render_status_badge(&document, view.as_ref())?;
    }

    Ok(())
}

pub(super) fn render_indicator_nonfatal(client: &Rc<WebClient>) {
    if let Err(error) = render_indicator(client) {
        report_error("render", &error);
    }
}

fn page_document() -> Result<Document, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())
}

fn query(document: &Document, selector: &str) -> Result<Option<Element>, String> {
    document
        .query_selector(selector)
        .map_err(|_| format!("invalid selector {selector}"))
}

fn query_in(parent: &Element, selector: &str) -> Result<Option<Element>, String> {
    parent
        .query_selector(selector)
        .map_err(|_| format!("invalid selector {selector}"))
}

fn create(
    document: &Document,
    tag: &str,
    class_name: Option<&str>,
    text: Option<&str>,
) -> Result<Element, String> {
    let element = document
        .create_element(tag)
        .map_err(|_| format!("failed to create <{tag}>"))?;
    if let Some(class_name) = class_name {
        element.set_class_name(class_name);
    }
    if text.is_some() {
        element.set_text_content(text);
    }
    Ok(element)
}

fn set_attributes(element: &Element, attributes: &[(&str, &str)]) -> Result<(), String> {
    for (name, value) in attributes {
        element
            .set_attribute(name, value)
            .map_err(|_| format!("failed to set attribute {name}"))?;
    }
    Ok(())
}

fn append(parent: &Element, child: &Element) -> Result<(), String> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|_| "failed to append element".to_string())
}

fn append_text(document: &Document, parent: &Element, text: &str) -> Result<(), String> {
    let node = document.create_text_node(text);
    parent
        .append_child(&node)
        .map(|_| ())
        .map_err(|_| "failed to append text".to_string())
}

/// Login entries are hidden, not removed, so a later sign-out restores them.
fn hide_login_links(navbar_right: &Element) -> Result<(), String> {
    let links = navbar_right
        .query_selector_all(LOGIN_LINK_SELECTOR)
        .map_err(|_| "failed to query login links".to_string())?;
    for index in 0..links.length() {
        let Some(link) = links.item(index) else {
            continue;
        };
        if let Some(item) = link.parent_element() {
            set_attributes(&item, &[(HIDDEN_LOGIN_ATTRIBUTE, ""), ("hidden", "")])?;
        }
    }
    Ok(())
}

fn restore_login_links(navbar_right: &Element) -> Result<(), String> {
    let items = navbar_right
        .query_selector_all(HIDDEN_LOGIN_SELECTOR)
        .map_err(|_| "failed to query hidden login links".to_string())?;
    for index in 0..items.length() {
        let Some(item) = items.item(index).and_then(|node| node.dyn_into::<Element>().ok()) else {
            continue;
        };
        item.remove_attribute("hidden")
            .and_then(|()| item.remove_attribute(HIDDEN_LOGIN_ATTRIBUTE))
            .map_err(|_| "failed to restore login link".to_string())?;
    }
    Ok(())
}

fn upsert_user_widget(
    document: &Document,
    navbar_right: &Element,
    view: &IndicatorView,
    client: &Rc<WebClient>,
) -> Result<(), String> {
    if let Some(existing) = query_in(navbar_right, USER_INDICATOR_SELECTOR)? {
        if let Some(name) = query_in(&existing, USER_NAME_SELECTOR)? {
            name.set_text_content(Some(view.display_name.as_str()));
        }
        if let Some(level) = query_in(&existing, USER_LEVEL_SELECTOR)? {
            level.set_text_content(Some(view.level_label.as_str()));
        }
        return Ok(());
    }

    let item = create(document, "li", Some(USER_INDICATOR_CLASS), None)?;

    let toggle = create(document, "a", Some("dropdown-toggle"), None)?;
    set_attributes(
        &toggle,
        &[
            ("href", "#"),
            ("data-toggle", "dropdown"),
            ("role", "button"),
            ("aria-haspopup", "true"),
            ("aria-expanded", "false"),
        ],
    )?;
    append(
        &toggle,
        &create(document, "span", Some("user-avatar"), Some(USER_AVATAR))?,
    )?;
    append(
        &toggle,
        &create(document, "span", Some("user-name"), Some(view.display_name.as_str()))?,
    )?;
    append(
        &toggle,
        &create(
            document,
            "span",
            Some("user-level-badge"),
            Some(view.level_label.as_str()),
        )?,
    )?;
    append(&toggle, &create(document, "span", Some("caret"), None)?)?;
    append(&item, &toggle)?;

    let menu = create(document, "ul", Some("dropdown-menu"), None)?;

    let header = create(document, "li", Some("dropdown-header"), None)?;
    append(
        &header,
        &create(document, "strong", None, Some(view.full_name.as_str()))?,
    )?;
    append(&header, &create(document, "br", None, None)?)?;
    append(&header, &create(document, "small", None, Some(view.handle.as_str()))?)?;
    append(&menu, &header)?;

    append(&menu, &divider(document)?)?;
    for link in MENU_LINKS {
        let (entry, _) = menu_entry(document, link.href, link.icon, link.label)?;
        append(&menu, &entry)?;
    }
    append(&menu, &divider(document)?)?;

    let (logout_entry, logout_anchor) =
        menu_entry(document, "#", "glyphicon-log-out", LOGOUT_LABEL)?;
    attach_logout_handler(&logout_anchor, client)?;
    append(&menu, &logout_entry)?;

    append(&item, &menu)?;
    append(navbar_right, &item)
}

fn divider(document: &Document) -> Result<Element, String> {
    let divider = create(document, "li", Some("divider"), None)?;
    set_attributes(&divider, &[("role", "separator")])?;
    Ok(divider)
}

fn menu_entry(
    document: &Document,
    href: &str,
    icon: &str,
    label: &str,
) -> Result<(Element, Element), String> {
    let entry = create(document, "li", None, None)?;
    let anchor = create(document, "a", None, None)?;
    set_attributes(&anchor, &[("href", href)])?;
    append(
        &anchor,
        &create(document, "span", Some(format!("glyphicon {icon}").as_str()), None)?,
    )?;
    append_text(document, &anchor, &format!(" {label}"))?;
    append(&entry, &anchor)?;
    Ok((entry, anchor))
}

fn attach_logout_handler(anchor: &Element, client: &Rc<WebClient>) -> Result<(), String> {
    let client = Rc::clone(client);
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        if let Err(error) = client.logout() {
            report_error("logout", &error.to_string());
        }
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(LOGOUT_REDIRECT);
        }
    });
    anchor
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(|_| "failed to attach logout handler".to_string())?;
    LOGOUT_CLICK_HANDLER.with(|slot| {
        *slot.borrow_mut() = Some(closure);
    });
    Ok(())
}

fn ensure_indicator_styles(document: &Document) -> Result<(), String> {
    if document.get_element_by_id(STYLES_ELEMENT_ID).is_some() {
        return Ok(());
    }
    let style = create(document, "style", None, Some(USER_INDICATOR_STYLES))?;
    style.set_id(STYLES_ELEMENT_ID);
    let head = document
        .head()
        .ok_or_else(|| "document head is unavailable".to_string())?;
    head.append_child(&style)
        .map(|_| ())
        .map_err(|_| "failed to append indicator styles".to_string())
}

/// Fixed-position badge for pages that have no navbar at all.
fn render_status_badge(document: &Document, view: Option<&IndicatorView>) -> Result<(), String> {
    let existing = document.get_element_by_id(STATUS_BADGE_ID);
    let Some(view) = view else {
        if let Some(existing) = existing {
            existing.remove();
        }
        return Ok(());
    };

    if let Some(existing) = existing {
        if let Some(name) = query_in(&existing, ".status-user-name")? {
            name.set_text_content(Some(view.display_name.as_str()));
        }
        return Ok(());
    }

    let indicator = create(document, "div", None, None)?;
    indicator.set_id(STATUS_BADGE_ID);

    let panel = create(document, "div", None, None)?;
    set_attributes(&panel, &[("style", STATUS_BADGE_STYLE)])?;

    let status = create(document, "span", None, Some("\u{25CF} Logado"))?;
    set_attributes(&status, &[("style", "color: #28a745; font-weight: bold;")])?;
    append(&panel, &status)?;

    let name = create(
        document,
        "span",
        Some("status-user-name"),
        Some(view.display_name.as_str()),
    )?;
    set_attributes(&name, &[("style", "margin-left: 10px;")])?;
    append(&panel, &name)?;

    let dashboard = create(document, "a", None, Some("Dashboard"))?;
    set_attributes(
        &dashboard,
        &[
            ("href", DASHBOARD_HREF),
            (
                "style",
                "margin-left: 15px; color: #667eea; text-decoration: none;",
            ),
        ],
    )?;
    append(&panel, &dashboard)?;
    append(&indicator, &panel)?;

    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;
    body.append_child(&indicator)
        .map(|_| ())
        .map_err(|_| "failed to append status badge".to_string())
}

/// The badge is cosmetic, so every failure here is swallowed.
async fn load_notification_badge(client: Rc<WebClient>) {
    let count = match client.get_unread_notifications_count().await {
        Ok(count) => count,
        Err(error) => {
            tracing::debug!(%error, "notification badge unavailable");
            record_badge_error(&error.to_string());
            return;
        }
    };
    if let Err(error) = apply_notification_badge(count) {
        tracing::debug!(%error, "failed to apply notification badge");
        record_badge_error(&error);
    }
}

fn apply_notification_badge(count: u64) -> Result<(), String> {
    let document = page_document()?;
    let Some(anchor) = query(&document, USER_INDICATOR_ANCHOR_SELECTOR)? else {
        return Ok(());
    };
    let existing = query_in(&anchor, NOTIFICATION_BADGE_SELECTOR)?;

    let Some(label) = badge_label(count) else {
        if let Some(badge) = existing {
            badge.remove();
        }
        return Ok(());
    };

    let badge = match existing {
        Some(badge) => badge,
        None => {
            let badge = create(&document, "span", Some(NOTIFICATION_BADGE_CLASS), None)?;
            set_attributes(&badge, &[("style", NOTIFICATION_BADGE_STYLE)])?;
            anchor
                .clone()
                .dyn_into::<HtmlElement>()
                .map_err(|_| "indicator anchor is not HtmlElement".to_string())?
                .style()
                .set_property("position", "relative")
                .map_err(|_| "failed to style indicator anchor".to_string())?;
            append(&anchor, &badge)?;
            badge
        }
    };
    badge.set_text_content(Some(label.as_str()));
    Ok(())
}
