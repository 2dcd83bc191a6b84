use super::*;

/// Page-script handle over the shared client, published as
/// `window.PenseOfflineAPI`. Async methods return promises that reject with
/// an `Error` carrying `kind` and, for HTTP failures, `status`.
#[wasm_bindgen]
pub struct PenseOfflineApi {
    client: Rc<WebClient>,
}

impl PenseOfflineApi {
    pub(super) fn new(client: Rc<WebClient>) -> Self {
        Self { client }
    }
}

#[wasm_bindgen]
impl PenseOfflineApi {
    #[wasm_bindgen(js_name = baseUrl)]
    pub fn base_url(&self) -> String {
        self.client.base_url().to_string()
    }

    #[wasm_bindgen(js_name = isAuthenticated)]
    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    /// Cached profile snapshot, or `null`.
    #[wasm_bindgen(js_name = cachedUser)]
    pub fn cached_user(&self) -> Result<JsValue, JsValue> {
        to_js(&self.client.cached_profile())
    }

    #[wasm_bindgen(js_name = getAuthHeader)]
    pub fn auth_header(&self) -> Result<JsValue, JsValue> {
        let (name, value) = self
            .client
            .session()
            .auth_header()
            .map_err(|error| api_error_to_js(&error))?;
        let header = js_sys::Object::new();
        Reflect::set(&header, &JsValue::from_str(name), &JsValue::from_str(&value))?;
        Ok(header.into())
    }

    pub fn logout(&self) -> Result<(), JsValue> {
        self.client.logout().map_err(|error| api_error_to_js(&error))
    }

    #[wasm_bindgen(js_name = updateUserIndicator)]
    pub fn update_user_indicator(&self) {
        render_indicator_nonfatal(&self.client);
    }

    pub fn register(&self, data: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let request = from_js::<RegisterRequest>(&data);
        future_to_promise(async move {
            let request = request?;
            respond(client.register(&request).await)
        })
    }

    pub fn login(&self, username: String, password: String) -> Promise {
        let client = Rc::clone(&self.client);
        future_to_promise(async move { respond(client.login(&username, &password).await) })
    }

    #[wasm_bindgen(js_name = getCurrentUser)]
    pub fn get_current_user(&self) -> Promise {
        let client = Rc::clone(&self.client);
        future_to_promise(async move { respond(client.get_current_user().await) })
    }

    #[wasm_bindgen(js_name = getUser)]
    pub fn get_user(&self, user_id: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let user_id = id_arg(&user_id);
        future_to_promise(async move {
            let user_id = user_id?;
            respond(client.get_user(&user_id).await)
        })
    }

    #[wasm_bindgen(js_name = updateProfile)]
    pub fn update_profile(&self, changes: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let changes = from_js::<ProfileUpdate>(&changes);
        future_to_promise(async move {
            let changes = changes?;
            respond(client.update_profile(&changes).await)
        })
    }

    #[wasm_bindgen(js_name = getCommunities)]
    pub fn get_communities(&self) -> Promise {
        let client = Rc::clone(&self.client);
        future_to_promise(async move { respond(client.get_communities().await) })
    }

    #[wasm_bindgen(js_name = getCommunity)]
    pub fn get_community(&self, community_id: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let community_id = id_arg(&community_id);
        future_to_promise(async move {
            let community_id = community_id?;
            respond(client.get_community(&community_id).await)
        })
    }

    #[wasm_bindgen(js_name = createCommunity)]
    pub fn create_community(&self, data: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let data = from_js::<serde_json::Value>(&data);
        future_to_promise(async move {
            let data = data?;
            respond(client.create_community(data).await)
        })
    }

    #[wasm_bindgen(js_name = joinCommunity)]
    pub fn join_community(&self, community_id: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let community_id = id_arg(&community_id);
        future_to_promise(async move {
            let community_id = community_id?;
            respond(client.join_community(&community_id).await)
        })
    }

    #[wasm_bindgen(js_name = leaveCommunity)]
    pub fn leave_community(&self, community_id: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let community_id = id_arg(&community_id);
        future_to_promise(async move {
            let community_id = community_id?;
            respond(client.leave_community(&community_id).await)
        })
    }

    #[wasm_bindgen(js_name = getEvents)]
    pub fn get_events(&self) -> Promise {
        let client = Rc::clone(&self.client);
        future_to_promise(async move { respond(client.get_events().await) })
    }

    #[wasm_bindgen(js_name = getEvent)]
    pub fn get_event(&self, event_id: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let event_id = id_arg(&event_id);
        future_to_promise(async move {
            let event_id = event_id?;
            respond(client.get_event(&event_id).await)
        })
    }

    #[wasm_bindgen(js_name = createEvent)]
    pub fn create_event(&self, data: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let data = from_js::<serde_json::Value>(&data);
        future_to_promise(async move {
            let data = data?;
            respond(client.create_event(data).await)
        })
    }

    #[wasm_bindgen(js_name = attendEvent)]
    pub fn attend_event(&self, event_id: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let event_id = id_arg(&event_id);
        future_to_promise(async move {
            let event_id = event_id?;
            respond(client.attend_event(&event_id).await)
        })
    }

    #[wasm_bindgen(js_name = addScreenFreeTime)]
    pub fn add_screen_free_time(&self, minutes: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let minutes = amount_arg(&minutes, "minutes");
        future_to_promise(async move {
            let minutes = minutes?;
            respond(client.add_screen_free_time(minutes).await)
        })
    }

    #[wasm_bindgen(js_name = completeChallenge)]
    pub fn complete_challenge(&self, challenge_name: String, points: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let points = amount_arg(&points, "points");
        future_to_promise(async move {
            let points = points?;
            respond(client.complete_challenge(&challenge_name, points).await)
        })
    }

    #[wasm_bindgen(js_name = getXPHistory)]
    pub fn get_xp_history(&self) -> Promise {
        let client = Rc::clone(&self.client);
        future_to_promise(async move { respond(client.get_xp_history().await) })
    }

    #[wasm_bindgen(js_name = getGlobalStats)]
    pub fn get_global_stats(&self) -> Promise {
        let client = Rc::clone(&self.client);
        future_to_promise(async move { respond(client.get_global_stats().await) })
    }

    #[wasm_bindgen(js_name = getNotifications)]
    pub fn get_notifications(&self) -> Promise {
        let client = Rc::clone(&self.client);
        future_to_promise(async move { respond(client.get_notifications().await) })
    }

    #[wasm_bindgen(js_name = markNotificationAsRead)]
    pub fn mark_notification_as_read(&self, notification_id: JsValue) -> Promise {
        let client = Rc::clone(&self.client);
        let notification_id = id_arg(&notification_id);
        future_to_promise(async move {
            let notification_id = notification_id?;
            respond(client.mark_notification_as_read(&notification_id).await)
        })
    }

    #[wasm_bindgen(js_name = getUnreadNotificationsCount)]
    pub fn get_unread_notifications_count(&self) -> Promise {
        let client = Rc::clone(&self.client);
        future_to_promise(async move { respond(client.get_unread_notifications_count().await) })
    }
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> Result<JsValue, JsValue> {
    match result {
        Ok(value) => to_js(&value),
        Err(error) => Err(api_error_to_js(&error)),
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let raw = serde_json::to_string(value)
        .map_err(|error| js_error(&format!("failed to encode response: {error}")))?;
    js_sys::JSON::parse(&raw)
}

fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T, JsValue> {
    let raw = js_sys::JSON::stringify(value)?
        .as_string()
        .ok_or_else(|| js_error("argument must be JSON-serializable"))?;
    serde_json::from_str(&raw).map_err(|error| js_error(&format!("invalid argument: {error}")))
}

fn id_arg(value: &JsValue) -> Result<String, JsValue> {
    let id = match value.as_f64() {
        Some(number) => format_id_number(number),
        None => value.as_string().and_then(non_empty_id),
    };
    id.ok_or_else(|| js_error("id must be an integer or a non-empty string"))
}

fn amount_arg(value: &JsValue, name: &str) -> Result<i64, JsValue> {
    value
        .as_f64()
        .and_then(integral_amount)
        .ok_or_else(|| js_error(&format!("{name} must be an integer number")))
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

fn api_error_to_js(error: &ApiError) -> JsValue {
    let js_error = js_sys::Error::new(&error.to_string());
    let _ = Reflect::set(
        &js_error,
        &JsValue::from_str("kind"),
        &JsValue::from_str(error.kind().as_str()),
    );
    if let Some(status) = error.status() {
        let _ = Reflect::set(&js_error, &JsValue::from_str("status"), &JsValue::from(status));
    }
    js_error.into()
}
