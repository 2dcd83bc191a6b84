use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::{ApiBase, ConfigError, PageLocation, absolute_base_url};
use crate::endpoints;
use crate::error::{ApiError, request_failed};
use crate::profile::{Profile, Session};
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};

const REGISTER_FAILED: &str = "Erro ao registrar";
const LOGIN_FAILED: &str = "Usuário ou senha incorretos";
const CURRENT_USER_FAILED: &str = "Erro ao obter usuário";
const USER_NOT_FOUND: &str = "Usuário não encontrado";
const PROFILE_UPDATE_FAILED: &str = "Erro ao atualizar perfil";
const COMMUNITIES_FAILED: &str = "Erro ao buscar comunidades";
const COMMUNITY_NOT_FOUND: &str = "Comunidade não encontrada";
const CREATE_COMMUNITY_FAILED: &str = "Erro ao criar comunidade";
const JOIN_COMMUNITY_FAILED: &str = "Erro ao entrar na comunidade";
const LEAVE_COMMUNITY_FAILED: &str = "Erro ao sair da comunidade";
const EVENTS_FAILED: &str = "Erro ao buscar eventos";
const EVENT_NOT_FOUND: &str = "Evento não encontrado";
const CREATE_EVENT_FAILED: &str = "Erro ao criar evento";
const ATTEND_EVENT_FAILED: &str = "Erro ao participar do evento";
const ADD_TIME_FAILED: &str = "Erro ao adicionar tempo";
const COMPLETE_CHALLENGE_FAILED: &str = "Erro ao completar desafio";
const XP_HISTORY_FAILED: &str = "Erro ao buscar histórico";
const RANKING_FAILED: &str = "Erro ao buscar ranking";
const NOTIFICATIONS_FAILED: &str = "Erro ao buscar notificações";
const MARK_NOTIFICATION_FAILED: &str = "Erro ao marcar notificação";
const UNREAD_COUNT_FAILED: &str = "Erro ao contar notificações";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body returned by register and login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    pub user: Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthRequirement {
    None,
    Bearer,
}

/// Typed wrapper over the PenseOffline REST API. One instance per page,
/// constructed by the embedding app and handed to whatever needs it.
#[derive(Debug)]
pub struct ApiClient<T, S> {
    base_url: String,
    transport: T,
    session: SessionStore<S>,
}

impl<T: HttpTransport, S: KeyValueStorage> ApiClient<T, S> {
    /// For hosts with no page: the base must already be an absolute URL.
    pub fn new(api_base: &ApiBase, transport: T, storage: S) -> Result<Self, ConfigError> {
        Self::for_page(api_base, None, transport, storage)
    }

    /// Relative bases (`/api`, `//api.host`) are anchored to `page`.
    pub fn for_page(
        api_base: &ApiBase,
        page: Option<&PageLocation>,
        transport: T,
        storage: S,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: absolute_base_url(&api_base.base_url, page)?,
            transport,
            session: SessionStore::load(storage),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn get_session(&self) -> Session {
        self.session.get_session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// The cached profile snapshot; no request is made.
    pub fn cached_profile(&self) -> Option<Profile> {
        self.session.user()
    }

    pub async fn register(&self, data: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let result = self
            .authenticate(endpoints::REGISTER_PATH, to_json(data)?, REGISTER_FAILED)
            .await;
        if let Err(error) = &result {
            tracing::warn!(%error, username = %data.username, "register failed");
        }
        result
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = to_json(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        let result = self
            .authenticate(endpoints::LOGIN_PATH, body, LOGIN_FAILED)
            .await;
        if let Err(error) = &result {
            tracing::warn!(%error, %username, "login failed");
        }
        result
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.clear_session()
    }

    pub async fn get_current_user(&self) -> Result<Profile, ApiError> {
        let value = self
            .get(endpoints::CURRENT_USER_PATH, CURRENT_USER_FAILED)
            .await?;
        let profile = into_profile(value)?;
        self.session.update_profile(profile.clone())?;
        Ok(profile)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Profile, ApiError> {
        let value = self
            .get(&endpoints::user_path(user_id), USER_NOT_FOUND)
            .await?;
        into_profile(value)
    }

    pub async fn update_profile(&self, changes: &ProfileUpdate) -> Result<Profile, ApiError> {
        let value = self
            .send(
                HttpMethod::Put,
                endpoints::PROFILE_UPDATE_PATH,
                AuthRequirement::Bearer,
                Some(to_json(changes)?),
                PROFILE_UPDATE_FAILED,
            )
            .await?;
        let profile = into_profile(value)?;
        self.session.update_profile(profile.clone())?;
        Ok(profile)
    }

    pub async fn get_communities(&self) -> Result<Value, ApiError> {
        self.get(endpoints::COMMUNITIES_PATH, COMMUNITIES_FAILED)
            .await
    }

    pub async fn get_community(&self, community_id: &str) -> Result<Value, ApiError> {
        self.get(&endpoints::community_path(community_id), COMMUNITY_NOT_FOUND)
            .await
    }

    pub async fn create_community(&self, data: Value) -> Result<Value, ApiError> {
        self.post(endpoints::COMMUNITIES_PATH, Some(data), CREATE_COMMUNITY_FAILED)
            .await
    }

    pub async fn join_community(&self, community_id: &str) -> Result<Value, ApiError> {
        self.post(
            &endpoints::join_community_path(community_id),
            None,
            JOIN_COMMUNITY_FAILED,
        )
        .await
    }

    pub async fn leave_community(&self, community_id: &str) -> Result<Value, ApiError> {
        self.post(
            &endpoints::leave_community_path(community_id),
            None,
            LEAVE_COMMUNITY_FAILED,
        )
        .await
    }

    pub async fn get_events(&self) -> Result<Value, ApiError> {
        self.get(endpoints::EVENTS_PATH, EVENTS_FAILED).await
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Value, ApiError> {
        self.get(&endpoints::event_path(event_id), EVENT_NOT_FOUND)
            .await
    }

    pub async fn create_event(&self, data: Value) -> Result<Value, ApiError> {
        self.post(endpoints::EVENTS_PATH, Some(data), CREATE_EVENT_FAILED)
            .await
    }

    /// Attends an event, then refreshes the cached profile since XP and
    /// level may have changed. A refresh failure is returned as-is.
    pub async fn attend_event(&self, event_id: &str) -> Result<Value, ApiError> {
        let result = self
            .post(
                &endpoints::attend_event_path(event_id),
                None,
                ATTEND_EVENT_FAILED,
            )
            .await?;
        self.get_current_user().await?;
        Ok(result)
    }

    /// `minutes` is forwarded as-is; the backend rejects non-positive values.
    pub async fn add_screen_free_time(&self, minutes: i64) -> Result<Value, ApiError> {
        let result = self
            .post(
                endpoints::ADD_SCREEN_FREE_TIME_PATH,
                Some(json!({ "minutos": minutes })),
                ADD_TIME_FAILED,
            )
            .await?;
        self.get_current_user().await?;
        Ok(result)
    }

    pub async fn complete_challenge(
        &self,
        challenge_name: &str,
        points: i64,
    ) -> Result<Value, ApiError> {
        let result = self
            .post(
                endpoints::COMPLETE_CHALLENGE_PATH,
                Some(json!({ "nome_desafio": challenge_name, "pontos": points })),
                COMPLETE_CHALLENGE_FAILED,
            )
            .await?;
        self.get_current_user().await?;
        Ok(result)
    }

    pub async fn get_xp_history(&self) -> Result<Value, ApiError> {
        self.get(endpoints::XP_HISTORY_PATH, XP_HISTORY_FAILED)
            .await
    }

    pub async fn get_global_stats(&self) -> Result<Value, ApiError> {
        self.get(endpoints::RANKING_PATH, RANKING_FAILED).await
    }

    pub async fn get_notifications(&self) -> Result<Value, ApiError> {
        self.get(endpoints::NOTIFICATIONS_PATH, NOTIFICATIONS_FAILED)
            .await
    }

    pub async fn mark_notification_as_read(&self, notification_id: &str) -> Result<Value, ApiError> {
        self.post(
            &endpoints::notification_read_path(notification_id),
            None,
            MARK_NOTIFICATION_FAILED,
        )
        .await
    }

    pub async fn get_unread_notifications_count(&self) -> Result<u64, ApiError> {
        let value = self
            .get(endpoints::UNREAD_NOTIFICATIONS_COUNT_PATH, UNREAD_COUNT_FAILED)
            .await?;
        Ok(value.get("count").and_then(Value::as_u64).unwrap_or(0))
    }

    async fn authenticate(
        &self,
        path: &str,
        body: Value,
        fallback: &str,
    ) -> Result<AuthResponse, ApiError> {
        let value = self
            .send(
                HttpMethod::Post,
                path,
                AuthRequirement::None,
                Some(body),
                fallback,
            )
            .await?;
        let response: AuthResponse =
            serde_json::from_value(value).map_err(|error| ApiError::decode(error.to_string()))?;
        self.session
            .set_session(&response.access_token, response.user.clone())?;
        Ok(response)
    }

    async fn get(&self, path: &str, fallback: &str) -> Result<Value, ApiError> {
        self.send(HttpMethod::Get, path, AuthRequirement::Bearer, None, fallback)
            .await
    }

    async fn post(&self, path: &str, body: Option<Value>, fallback: &str) -> Result<Value, ApiError> {
        self.send(HttpMethod::Post, path, AuthRequirement::Bearer, body, fallback)
            .await
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        auth: AuthRequirement,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        let mut request = HttpRequest::new(method, endpoints::join_url(&self.base_url, path));
        if auth == AuthRequirement::Bearer {
            let (name, value) = self.session.auth_header()?;
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.json_body(body);
        }

        tracing::debug!(method = method.as_str(), path, "sending api request");
        let response = self.transport.send(request).await?;

        let parsed = serde_json::from_str::<Value>(&response.body);
        if !response.is_success() {
            return Err(request_failed(
                response.status,
                parsed.as_ref().ok(),
                fallback,
            ));
        }
        parsed.map_err(|error| ApiError::decode(error.to_string()))
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|error| ApiError::decode(format!("failed to serialize request body: {error}")))
}

fn into_profile(value: Value) -> Result<Profile, ApiError> {
    Profile::from_value(value).ok_or_else(|| ApiError::decode("profile must be a JSON object"))
}
