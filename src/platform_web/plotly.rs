use js_sys::{Array, Function, JSON, Object, Reflect};
use serde::Serialize;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use crate::core::{COLOR_FIELDS, Layout, Trace, traces_from_value, traces_to_value};
use crate::error::{EnhanceError, EnhanceResult};
use crate::host::{ChartLibrary, PlotOptions};

/// [`ChartLibrary`] over the page's global `Plotly` object.
///
/// Reads and full renders cross the JS boundary as JSON text. Color restyles
/// patch shallow copies of the live trace objects instead, so typed arrays and
/// other non-JSON trace content are submitted back as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlotlyLibrary;

fn plotly() -> EnhanceResult<JsValue> {
    Reflect::get(&js_sys::global(), &JsValue::from_str("Plotly"))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
        .ok_or_else(|| EnhanceError::Render("Plotly is not loaded".to_owned()))
}

fn call(method: &str, args: &Array) -> EnhanceResult<JsValue> {
    let plotly = plotly()?;
    let function: Function = Reflect::get(&plotly, &JsValue::from_str(method))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
        .ok_or_else(|| EnhanceError::Render(format!("Plotly.{method} is not a function")))?;
    function
        .apply(&plotly, args)
        .map_err(|err| EnhanceError::Render(format!("Plotly.{method} threw: {err:?}")))
}

fn read_json(element: &Element, property: &str) -> Option<serde_json::Value> {
    let value = Reflect::get(element, &JsValue::from_str(property)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    js_to_json(&value)
}

fn js_to_json(value: &JsValue) -> Option<serde_json::Value> {
    let text = JSON::stringify(value).ok()?.as_string()?;
    serde_json::from_str(&text).ok()
}

fn shallow_copy(value: &JsValue) -> Object {
    match value.dyn_ref::<Object>() {
        Some(source) => Object::assign(&Object::new(), source),
        None => Object::new(),
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> EnhanceResult<()> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|err| EnhanceError::Render(format!("failed to set {key}: {err:?}")))
}

/// Shallow copy of `source` with the color fields of `colors` written into
/// copies of its `marker`/`line` objects. Fields whose value is unchanged keep
/// the original JS value.
fn patch_colors(source: &JsValue, colors: &Trace) -> EnhanceResult<Object> {
    let next = shallow_copy(source);
    for container in ["marker", "line"] {
        let current = Reflect::get(source, &JsValue::from_str(container))
            .unwrap_or(JsValue::UNDEFINED);
        if !current.is_object() {
            continue;
        }
        let copy = shallow_copy(&current);
        let mut changed = false;
        for (outer, inner) in COLOR_FIELDS {
            if outer != container {
                continue;
            }
            let Some(value) = colors.fields().get(outer).and_then(|v| v.get(inner)) else {
                continue;
            };
            let existing = Reflect::get(&current, &JsValue::from_str(inner))
                .unwrap_or(JsValue::UNDEFINED);
            if js_to_json(&existing).as_ref() == Some(value) {
                continue;
            }
            set(&copy, inner, &to_js(value)?)?;
            changed = true;
        }
        if changed {
            set(&next, container, &copy)?;
        }
    }
    Ok(next)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> EnhanceResult<JsValue> {
    let text = serde_json::to_string(value)
        .map_err(|e| EnhanceError::Render(format!("failed to encode chart payload: {e}")))?;
    JSON::parse(&text).map_err(|err| EnhanceError::Render(format!("JSON.parse failed: {err:?}")))
}

impl ChartLibrary<Element> for PlotlyLibrary {
    fn data(&self, container: &Element) -> Option<Vec<Trace>> {
        read_json(container, "data").map(traces_from_value)
    }

    fn layout(&self, container: &Element) -> Option<Layout> {
        read_json(container, "layout").map(Layout::from_value)
    }

    fn render(
        &self,
        container: &Element,
        data: &[Trace],
        layout: &Layout,
        options: Option<&PlotOptions>,
    ) -> EnhanceResult<()> {
        let args = Array::new();
        args.push(container);
        args.push(&to_js(&traces_to_value(data))?);
        args.push(&to_js(layout)?);
        if let Some(options) = options {
            args.push(&to_js(options)?);
        }
        call("react", &args).map(|_| ())
    }

    fn restyle_colors(&self, container: &Element, data: &[Trace]) -> EnhanceResult<()> {
        let current = Reflect::get(container, &JsValue::from_str("data"))
            .ok()
            .and_then(|value| value.dyn_into::<Array>().ok())
            .ok_or_else(|| EnhanceError::Render("chart has no data array".to_owned()))?;
        if current.length() as usize != data.len() {
            return Err(EnhanceError::Render(format!(
                "chart has {} traces, got {}",
                current.length(),
                data.len()
            )));
        }
        let layout = Reflect::get(container, &JsValue::from_str("layout"))
            .map_err(|err| EnhanceError::Render(format!("failed to read layout: {err:?}")))?;

        let next = Array::new();
        for (source, colors) in current.iter().zip(data) {
            next.push(&patch_colors(&source, colors)?.into());
        }
        call("react", &Array::of3(container, &next, &layout)).map(|_| ())
    }

    fn destroy(&self, container: &Element) {
        let args = Array::of1(container);
        if let Err(err) = call("purge", &args) {
            debug!(error = %err, "Plotly.purge failed");
        }
    }
}
