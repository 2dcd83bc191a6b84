use super::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    match boot() {
        Ok(()) => DIAGNOSTICS.with(|state| state.borrow_mut().mark_ready()),
        Err(error) => {
            DIAGNOSTICS.with(|state| state.borrow_mut().record_boot_error(&error));
            tracing::error!(%error, "penseoffline web shell failed to start");
            log_to_console(&format!("startup failed: {error}"));
        }
    }
}

/// JSON snapshot of the shell state: phase, resolved API base, last error.
#[wasm_bindgen(js_name = penseOfflineDiagnostics)]
pub fn diagnostics_json() -> String {
    DIAGNOSTICS.with(|state| state.borrow().to_json())
}

/// Surfaces a runtime failure on the browser console and in the diagnostics.
pub(super) fn report_error(context: &str, message: &str) {
    DIAGNOSTICS.with(|state| state.borrow_mut().record_error(context, message));
    tracing::warn!(context, error = message, "penseoffline web shell error");
    log_to_console(&format!("{context} failed: {message}"));
}

pub(super) fn record_badge_error(message: &str) {
    DIAGNOSTICS.with(|state| state.borrow_mut().record_badge_error(message));
}

fn log_to_console(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(&format!(
        "{DIAGNOSTICS_CONSOLE_PREFIX} {message}"
    )));
}

fn boot() -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let page = page_location(&window);
    let api_base = resolve_page_api_base(&window, page.as_ref());
    DIAGNOSTICS.with(|state| {
        state
            .borrow_mut()
            .record_api_base(&api_base.base_url, &api_base.source);
    });
    tracing::debug!(
        base_url = %api_base.base_url,
        source = %api_base.source,
        "resolved api base"
    );

    let client = WebClient::for_page(&api_base, page.as_ref(), FetchTransport, LocalStorage)
        .map_err(|error| error.to_string())?;
    let client = Rc::new(client);

    expose_page_globals(&window, &client)?;
    install_storage_listener(&window, &client)?;
    schedule_initial_render(&window, &client)
}

fn page_location(window: &web_sys::Window) -> Option<PageLocation> {
    let location = window.location();
    match (location.protocol(), location.hostname(), location.origin()) {
        (Ok(protocol), Ok(hostname), Ok(origin)) => Some(PageLocation {
            protocol,
            hostname,
            origin,
        }),
        _ => None,
    }
}

/// Reads `window.PENSEOFFLINE_API_URL` once.
fn resolve_page_api_base(window: &web_sys::Window, page: Option<&PageLocation>) -> ApiBase {
    let override_url = Reflect::get(window, &JsValue::from_str(API_URL_OVERRIDE_GLOBAL))
        .ok()
        .and_then(|value| value.as_string());

    resolve_api_base(override_url.as_deref(), page, API_RESOLUTION_STRATEGY)
}

fn expose_page_globals(window: &web_sys::Window, client: &Rc<WebClient>) -> Result<(), String> {
    let handle = PenseOfflineApi::new(Rc::clone(client));
    Reflect::set(
        window,
        &JsValue::from_str(API_HANDLE_GLOBAL),
        &JsValue::from(handle),
    )
    .map_err(|_| "failed to expose api handle".to_string())?;

    let render_client = Rc::clone(client);
    let closure = Closure::<dyn FnMut()>::new(move || render_indicator_nonfatal(&render_client));
    Reflect::set(
        window,
        &JsValue::from_str(UPDATE_INDICATOR_GLOBAL),
        closure.as_ref(),
    )
    .map_err(|_| "failed to expose indicator update hook".to_string())?;
    UPDATE_INDICATOR_HANDLER.with(|slot| {
        *slot.borrow_mut() = Some(closure);
    });
    Ok(())
}

fn install_storage_listener(window: &web_sys::Window, client: &Rc<WebClient>) -> Result<(), String> {
    let listener_client = Rc::clone(client);
    let closure = Closure::<dyn FnMut(web_sys::StorageEvent)>::new(
        move |event: web_sys::StorageEvent| {
            if !should_reload_session(event.key().as_deref()) {
                return;
            }
            listener_client.session().reload();
            render_indicator_nonfatal(&listener_client);
        },
    );
    window
        .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
        .map_err(|_| "failed to attach storage listener".to_string())?;
    STORAGE_EVENT_HANDLER.with(|slot| {
        *slot.borrow_mut() = Some(closure);
    });
    Ok(())
}

fn schedule_initial_render(window: &web_sys::Window, client: &Rc<WebClient>) -> Result<(), String> {
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;

    if document.ready_state() != "loading" {
        render_indicator_nonfatal(client);
        return Ok(());
    }

    let ready_client = Rc::clone(client);
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        render_indicator_nonfatal(&ready_client);
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())
        .map_err(|_| "failed to attach DOMContentLoaded listener".to_string())?;
    DOM_READY_HANDLER.with(|slot| {
        *slot.borrow_mut() = Some(closure);
    });
    Ok(())
}
