//! Client core for the PenseOffline web app: API base resolution, session
//! persistence, the typed REST client, and the navbar indicator model.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod indicator;
pub mod profile;
pub mod session;
pub mod storage;
pub mod transport;

pub use client::{ApiClient, AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest};
pub use config::{ApiBase, PageLocation, ResolutionStrategy, resolve_api_base};
pub use error::{ApiError, ApiErrorKind};
pub use profile::{Profile, Session};
pub use session::SessionStore;
pub use storage::{KeyValueStorage, MemoryStorage};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
