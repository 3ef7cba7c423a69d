//! GameCenter bridge through the native shell's plugin registry

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{LeaderboardBackend, PlatformError};

#[wasm_bindgen(inline_js = r#"
function plugin() {
    const cap = globalThis.Capacitor;
    return cap && cap.Plugins ? cap.Plugins.GameCenter : undefined;
}
export function gc_available() { return plugin() !== undefined; }
export function gc_authenticate() { return plugin().authenticate(); }
export function gc_submit_score(score, leaderboardId) {
    return plugin().submitScore({ score, leaderboardId });
}
export function gc_show_leaderboard(leaderboardId) {
    return plugin().showLeaderboard({ leaderboardId });
}
"#)]
extern "C" {
    fn gc_available() -> bool;
    #[wasm_bindgen(catch)]
    fn gc_authenticate() -> Result<js_sys::Promise, JsValue>;
    #[wasm_bindgen(catch)]
    fn gc_submit_score(score: f64, leaderboard_id: &str) -> Result<js_sys::Promise, JsValue>;
    #[wasm_bindgen(catch)]
    fn gc_show_leaderboard(leaderboard_id: &str) -> Result<js_sys::Promise, JsValue>;
}

/// GameCenter via the native plugin; unavailable in a plain browser
#[derive(Debug, Clone, Copy, Default)]
pub struct GameCenter;

impl GameCenter {
    pub fn is_available() -> bool {
        gc_available()
    }
}

fn js_error(err: JsValue) -> PlatformError {
    let msg = err
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(&err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"));
    PlatformError::Rejected(msg)
}

async fn call(promise: Result<js_sys::Promise, JsValue>) -> Result<JsValue, PlatformError> {
    let promise = promise.map_err(js_error)?;
    JsFuture::from(promise).await.map_err(js_error)
}

impl LeaderboardBackend for GameCenter {
    async fn authenticate(&self) -> Result<Option<String>, PlatformError> {
        if !gc_available() {
            return Ok(None);
        }
        let result = call(gc_authenticate()).await?;
        let authenticated = js_sys::Reflect::get(&result, &JsValue::from_str("authenticated"))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if !authenticated {
            return Ok(None);
        }
        let player_id = js_sys::Reflect::get(&result, &JsValue::from_str("playerId"))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        Ok(Some(player_id))
    }

    async fn submit_score(&self, score: i64, leaderboard_id: &str) -> Result<(), PlatformError> {
        if !gc_available() {
            return Err(PlatformError::NotAuthenticated);
        }
        call(gc_submit_score(score as f64, leaderboard_id)).await?;
        Ok(())
    }

    async fn show_leaderboard(&self, leaderboard_id: &str) -> Result<(), PlatformError> {
        if !gc_available() {
            return Err(PlatformError::NotAuthenticated);
        }
        call(gc_show_leaderboard(leaderboard_id)).await?;
        Ok(())
    }
}
