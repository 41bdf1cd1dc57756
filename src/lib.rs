//! Comment markers: directives such as `<!--toc-->` or
//! `<!--lint disable heading-style-->` written inside comment nodes of a
//! markdown / MDX syntax tree.

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
use pyo3::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

mod config;
mod error;
mod json;
mod marker;
mod node;
mod parameters;

pub use config::{EmptyValue, ParseOptions};
pub use error::{Error, Result};
pub use json::{parse_marker_json, parse_options_json};
pub use marker::{parse_marker, parse_marker_with, split, Marker};
pub use node::{Classify, CommentSource, Dialect, Node};
pub use parameters::{
    decode_parameters, decode_parameters_with, DecodeError, ParameterValue, Parameters,
};

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
#[pyo3(name = "parse_marker", signature = (node_json, options_json=None))]
fn parse_marker_py(node_json: String, options_json: Option<String>) -> PyResult<String> {
    let to_py_err = |e: Error| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string());

    let options = match options_json {
        Some(options_json) => parse_options_json(&options_json).map_err(to_py_err)?,
        None => ParseOptions::default(),
    };
    parse_marker_json(&node_json, &options).map_err(to_py_err)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn parse_marker_wasm(node_json: &str) -> std::result::Result<String, JsValue> {
    parse_marker_json(node_json, &ParseOptions::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn parse_marker_with_options_wasm(
    node_json: &str,
    options_json: &str,
) -> std::result::Result<String, JsValue> {
    let options = parse_options_json(options_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    parse_marker_json(node_json, &options).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pymodule]
fn comment_marker(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_marker_py, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn run_fixture(name: &str, cfg: &serde_json::Value) {
        let options = match cfg.get("options") {
            Some(options) => serde_json::from_value(options.clone()).expect("Invalid options"),
            None => ParseOptions::default(),
        };
        let node = cfg.get("node").expect("Fixture is missing a node");
        let mut expected = cfg.get("expected").cloned().unwrap_or_default();
        if let Some(obj) = expected.as_object_mut() {
            obj.insert("node".to_string(), node.clone());
        }

        let json_out = parse_marker_json(&node.to_string(), &options).unwrap();
        let v_out: serde_json::Value = serde_json::from_str(&json_out).unwrap();

        if v_out != expected {
            println!("Got: {}", serde_json::to_string_pretty(&v_out).unwrap());
            println!("Exp: {}", serde_json::to_string_pretty(&expected).unwrap());
        }
        assert_eq!(v_out, expected, "Mismatch in fixture {}", name);
    }

    #[test]
    fn test_fixtures() {
        let fixtures_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/markers.json");
        let fixtures_text = fs::read_to_string(fixtures_path).expect("Failed to read markers.json");
        let fixtures: serde_json::Value =
            serde_json::from_str(&fixtures_text).expect("Invalid markers.json");
        let obj = fixtures
            .as_object()
            .expect("markers.json must be an object");

        for (name, cfg) in obj {
            run_fixture(name, cfg);
        }
    }
}
