//! Browser host: the live document, the global `Plotly` object,
//! `localStorage` and `setTimeout`.

#[cfg(feature = "telemetry")]
mod console;
mod dom;
mod plotly;
mod scheduler;
mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::api::{EnhancementConfig, EnhancementLayer};
use crate::error::{EnhanceError, EnhanceResult};
use crate::host::HostContext;

#[cfg(feature = "telemetry")]
pub use console::ConsoleMakeWriter;
pub use dom::WebDom;
pub use plotly::PlotlyLibrary;
pub use scheduler::TimeoutScheduler;
pub use storage::LocalStorageStore;

/// Global consulted for a JSON config when none is passed explicitly.
pub const CONFIG_GLOBAL: &str = "CHART_ENHANCE_CONFIG";

thread_local! {
    static INSTALLED: RefCell<Option<Rc<EnhancementLayer<Element>>>> = const { RefCell::new(None) };
}

/// Host context over the current window.
pub fn web_host() -> EnhanceResult<HostContext<Element>> {
    let window = web_sys::window().ok_or_else(|| EnhanceError::Host("no window".to_owned()))?;
    Ok(HostContext::new(
        Rc::new(WebDom::from_window(&window)?),
        Rc::new(PlotlyLibrary),
        Rc::new(LocalStorageStore::from_window(&window)),
        Rc::new(TimeoutScheduler::new(window)),
    ))
}

/// Installs the enhancement layer on the current page.
///
/// `config_json` overrides the defaults; without it the `CHART_ENHANCE_CONFIG`
/// global is used when present. Calling this twice keeps the first install.
///
/// Panics are forwarded to `console.error`; with the `telemetry` feature the
/// default subscriber also logs to the console.
#[wasm_bindgen(js_name = installChartEnhancements)]
pub fn install_chart_enhancements(config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if INSTALLED.with(|slot| slot.borrow().is_some()) {
        return Ok(());
    }
    if crate::telemetry::init_default_tracing() {
        tracing::debug!("console tracing installed");
    }

    let config = match config_json.or_else(|| read_global(CONFIG_GLOBAL)) {
        Some(json) => EnhancementConfig::from_json_str(&json),
        None => Ok(EnhancementConfig::default()),
    }
    .map_err(to_js_error)?;

    let host = web_host().map_err(to_js_error)?;
    let layer = crate::api::install(host, config).map_err(to_js_error)?;
    INSTALLED.with(|slot| *slot.borrow_mut() = Some(layer));
    Ok(())
}

/// Flips colorblind mode from page script, e.g. a keyboard shortcut.
#[wasm_bindgen(js_name = toggleColorblindMode)]
pub fn toggle_colorblind_mode() -> bool {
    INSTALLED.with(|slot| {
        slot.borrow().as_ref().is_some_and(|layer| {
            layer.recolor().toggle();
            layer.recolor().is_active()
        })
    })
}

fn read_global(key: &str) -> Option<String> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}

fn to_js_error(err: EnhanceError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub(crate) fn js_error(context: &str, err: JsValue) -> EnhanceError {
    EnhanceError::Host(format!("{context}: {err:?}"))
}
