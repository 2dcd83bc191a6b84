#[cfg(any(target_arch = "wasm32", test))]
mod args;
#[cfg(any(target_arch = "wasm32", test))]
mod diagnostics;
#[cfg(any(target_arch = "wasm32", test))]
mod storage_sync;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use async_trait::async_trait;
    use gloo_net::http::Request;
    use js_sys::{Promise, Reflect};
    use penseoffline_client_core::config::{ApiBase, PageLocation, resolve_api_base};
    use penseoffline_client_core::indicator::{
        DASHBOARD_HREF, IndicatorView, LOGOUT_LABEL, LOGOUT_REDIRECT, MENU_LINKS, badge_label,
    };
    use penseoffline_client_core::{
        ApiClient, ApiError, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
        KeyValueStorage, ProfileUpdate, RegisterRequest,
    };
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{future_to_promise, spawn_local};
    use web_sys::{Document, Element, HtmlElement};

    use crate::args::{format_id_number, integral_amount, non_empty_id};
    use crate::diagnostics::ShellDiagnostics;
    use crate::storage_sync::should_reload_session;
    use crate::wasm_constants::*;

    mod api;
    mod dom;
    mod lifecycle;
    mod network;
    mod storage;

    use api::PenseOfflineApi;
    use dom::*;
    use lifecycle::{record_badge_error, report_error};
    use network::FetchTransport;
    use storage::LocalStorage;

    type WebClient = ApiClient<FetchTransport, LocalStorage>;

    thread_local! {
        static DIAGNOSTICS: RefCell<ShellDiagnostics> = RefCell::new(ShellDiagnostics::default());
        static DOM_READY_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static STORAGE_EVENT_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::StorageEvent)>>> = const { RefCell::new(None) };
        static UPDATE_INDICATOR_HANDLER: RefCell<Option<Closure<dyn FnMut()>>> = const { RefCell::new(None) };
        static LOGOUT_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }
}
