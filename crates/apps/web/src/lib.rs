use console_error_panic_hook::set_once;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use formats::UploadedFile;
use layers::ViewKind;
use session::{DashboardConfig, DashboardView, Store};

#[derive(Debug)]
struct WebState {
    store: Store,
    /// Activity-log entries before this sequence number were already echoed
    /// to the browser console.
    mirrored_seq: u64,
}

impl WebState {
    fn new(config: DashboardConfig) -> Self {
        Self {
            store: Store::new(config),
            mirrored_seq: 0,
        }
    }

    fn mirror_log(&mut self) {
        for entry in self.store.log().since(self.mirrored_seq) {
            web_sys::console::log_1(&JsValue::from_str(&entry.message));
            self.mirrored_seq = entry.seq + 1;
        }
    }
}

thread_local! {
    static STATE: RefCell<WebState> = RefCell::new(WebState::new(DashboardConfig::default()));
}

/// TLS access that reports teardown as a JS error instead of panicking.
fn with_state<F, R>(f: F) -> Result<R, JsValue>
where
    F: FnOnce(&mut WebState) -> R,
{
    STATE
        .try_with(|state| {
            let mut state = state.borrow_mut();
            let out = f(&mut state);
            state.mirror_log();
            out
        })
        .map_err(|_| JsValue::from_str("dashboard state is unavailable"))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    with_state(|_| ())
}

/// Replaces the whole dashboard with a fresh one built from a JSON config.
/// Missing keys take their defaults.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> Result<(), JsValue> {
    let config =
        DashboardConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_state(|state| *state = WebState::new(config))
}

/// Ingests one file. Returns the file details as JSON; the error is the
/// user-facing message for the rejection.
#[wasm_bindgen]
pub fn upload_file(name: &str, size_bytes: f64, content: &[u8]) -> Result<String, JsValue> {
    let file = UploadedFile {
        name,
        size_bytes: size_bytes.max(0.0) as u64,
        content,
    };
    with_state(|state| {
        let store = &mut state.store;
        match store.ingest(&file) {
            Ok(meta) => {
                let meta = to_json(meta);
                for warning in store.warnings() {
                    web_sys::console::warn_1(&JsValue::from_str(&warning.to_string()));
                }
                meta
            }
            Err(err) => Err(JsValue::from_str(&err.to_string())),
        }
    })?
}

#[wasm_bindgen]
pub fn set_active_view(view: &str) -> Result<(), JsValue> {
    let view = match view.trim().to_ascii_lowercase().as_str() {
        "map" | "gis" | "2d" => ViewKind::Map,
        "points" | "3d" => ViewKind::Points,
        other => return Err(JsValue::from_str(&format!("unknown view: {other}"))),
    };
    with_state(|state| state.store.set_active_view(view))
}

#[wasm_bindgen]
pub fn set_altitude_range(min: f64, max: f64) -> Result<(), JsValue> {
    with_state(|state| state.store.set_altitude_range(min, max))
}

/// Returns the clamped size actually applied.
#[wasm_bindgen]
pub fn set_point_size(size: f64) -> Result<f64, JsValue> {
    with_state(|state| state.store.set_point_size(size))
}

#[wasm_bindgen]
pub fn point_positions() -> Result<js_sys::Float32Array, JsValue> {
    with_state(|state| {
        let flat = state.store.points().view().flat_positions();
        js_sys::Float32Array::from(flat.as_slice())
    })
}

#[wasm_bindgen]
pub fn point_colors() -> Result<js_sys::Float32Array, JsValue> {
    with_state(|state| {
        let flat = state.store.points().view().flat_colors();
        js_sys::Float32Array::from(flat.as_slice())
    })
}

/// Returns whether the tag is selected afterwards.
#[wasm_bindgen]
pub fn toggle_tag(tag: &str) -> Result<bool, JsValue> {
    with_state(|state| state.store.toggle_tag(tag))
}

/// `tags_json` is a JSON array of strings.
#[wasm_bindgen]
pub fn set_selected_tags(tags_json: &str) -> Result<(), JsValue> {
    let tags: Vec<String> =
        serde_json::from_str(tags_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_state(|state| state.store.set_selected_tags(tags))
}

#[wasm_bindgen]
pub fn play() -> Result<bool, JsValue> {
    with_state(|state| state.store.play())
}

#[wasm_bindgen]
pub fn pause() -> Result<bool, JsValue> {
    with_state(|state| state.store.pause())
}

/// Returns `true` if playing afterwards.
#[wasm_bindgen]
pub fn toggle_playback() -> Result<bool, JsValue> {
    with_state(|state| state.store.toggle_playback() == scene::PlaybackState::Playing)
}

#[wasm_bindgen]
pub fn restart_playback() -> Result<(), JsValue> {
    with_state(|state| state.store.restart_playback())
}

/// Call from `requestAnimationFrame` or an interval with the elapsed seconds.
/// Returns `true` when the map needs a redraw.
#[wasm_bindgen]
pub fn tick(dt_s: f64) -> Result<bool, JsValue> {
    with_state(|state| state.store.tick(dt_s))
}

#[wasm_bindgen]
pub fn select_feature(index: u32) -> Result<bool, JsValue> {
    with_state(|state| state.store.select_feature(index as usize))
}

#[wasm_bindgen]
pub fn clear_active_feature() -> Result<(), JsValue> {
    with_state(|state| state.store.clear_active_feature())
}

/// Full dashboard view model as JSON.
#[wasm_bindgen]
pub fn snapshot() -> Result<String, JsValue> {
    with_state(|state| to_json(&DashboardView::from_store(&state.store)))?
}

/// GeoJSON of every feature passing the current filter.
#[wasm_bindgen]
pub fn filtered_geojson() -> Result<String, JsValue> {
    with_state(|state| to_json(&state.store.features().filtered_geojson()))?
}
