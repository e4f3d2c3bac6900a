use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use shared::{Session, TokenClaims};
use tracing::{info, warn};
use wasm_bindgen::JsValue;
use web_sys::Storage;
use yew::Callback;
use crate::config::CONFIG;

fn storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn log_storage_error(action: &str, e: JsValue) {
    warn!("Failed to {} auth token: {:?}", action, e);
}

pub fn stored_token() -> Option<String> {
    storage()?.get_item(CONFIG.token_storage_key).ok().flatten()
}

pub fn store_token(token: &str) {
    if let Some(storage) = storage() {
        if let Err(e) = storage.set_item(CONFIG.token_storage_key, token) {
            log_storage_error("store", e);
        }
    }
}

pub fn clear_token() {
    if let Some(storage) = storage() {
        if let Err(e) = storage.remove_item(CONFIG.token_storage_key) {
            log_storage_error("remove", e);
        }
    }
}

/// Reads the claims from the token payload. The signature is the server's
/// business; the client only needs `exp` and the user flags.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn now_unix() -> i64 {
    (js_sys::Date::now() / 1000.0) as i64
}

/// Valid stored token, if any. Expired tokens are cleared on sight.
pub fn current_token() -> Option<String> {
    let token = stored_token()?;
    match decode_claims(&token) {
        Some(claims) if claims.is_expired(now_unix()) => {
            info!("Stored token expired");
            clear_token();
            None
        }
        _ => Some(token),
    }
}

pub fn is_logged_in() -> bool {
    current_token().is_some()
}

/// Session backed by `localStorage`. `on_logout` is told when the API
/// rejects the token so the app can route back to login.
#[derive(Clone)]
pub struct BrowserSession {
    on_logout: Callback<()>,
}

impl BrowserSession {
    pub fn new(on_logout: Callback<()>) -> Self {
        Self { on_logout }
    }
}

impl Session for BrowserSession {
    fn current_token(&self) -> Option<String> {
        current_token()
    }

    fn on_authentication_failure(&self) {
        warn!("Authentication failed, please log in again");
        clear_token();
        self.on_logout.emit(());
    }
}
