//! Python bindings.
//!
//! The dashboard drives the pipeline through these entry points: parse a
//! report into its tables, manage the session reference catalog, and the
//! site / model / code helpers the export views call directly. Compiled
//! only under the `python` feature so default builds need no libpython.

use std::sync::RwLock;

use lazy_static::lazy_static;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use serde_json::Value;

use crate::logging::LogContext;
use crate::lookup::catalog::{ReferenceCatalog, ReferenceTable};
use crate::lookup::{code, resolve};
use crate::pipeline::context::ParseContext;
use crate::pipeline::ingest::parse_with_context;

// Session catalog, loaded once per dashboard session.
lazy_static! {
    static ref CATALOG: RwLock<ReferenceCatalog> = RwLock::new(ReferenceCatalog::new());
}

/// Get a read-only reference to the session catalog.
fn catalog() -> std::sync::RwLockReadGuard<'static, ReferenceCatalog> {
    CATALOG.read().expect("Catalog cache lock poisoned")
}

/// Get a mutable reference to the session catalog.
fn catalog_mut() -> std::sync::RwLockWriteGuard<'static, ReferenceCatalog> {
    CATALOG.write().expect("Catalog cache lock poisoned")
}

/// Initialize the module-level logger
fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}

/// Recursively convert a JSON value into the matching Python object.
fn json_to_py(py: Python<'_>, value: &Value) -> PyResult<Py<PyAny>> {
    match value {
        Value::Null => Ok(py.None()),
        Value::Bool(b) => Ok(b.into_py(py)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.into_py(py))
            } else if let Some(u) = n.as_u64() {
                Ok(u.into_py(py))
            } else {
                Ok(n.as_f64().unwrap_or_default().into_py(py))
            }
        }
        Value::String(s) => Ok(s.as_str().into_py(py)),
        Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(json_to_py(py, item)?)?;
            }
            Ok(list.into())
        }
        Value::Object(map) => {
            let dict = PyDict::new(py);
            for (key, item) in map {
                dict.set_item(key, json_to_py(py, item)?)?;
            }
            Ok(dict.into())
        }
    }
}

/// Parse a concatenated inventory report.
///
/// This is the main entry point from Python. Returns a dict with every
/// record table (identities, chassis, versions, ports, port_descriptions,
/// services, modules, unreadable) plus the derived summary rows.
///
/// # Arguments
/// * `text` - Raw concatenated report text
/// * `received_at` - Optional RFC 3339 timestamp the host received the file
#[pyfunction]
#[pyo3(signature = (text, received_at=None))]
fn parse_report(py: Python<'_>, text: String, received_at: Option<String>) -> PyResult<Py<PyAny>> {
    init_logger();

    let ctx = ParseContext::with_received_at(received_at.as_deref());
    let result = parse_with_context(&ctx, &text);

    let value = serde_json::to_value(&result)
        .map_err(|e| PyValueError::new_err(format!("result serialization failed: {}", e)))?;
    json_to_py(py, &value)
}

/// Derive the three-letter site code from a device identifier.
#[pyfunction]
fn extract_site_code(device_id: String) -> PyResult<Option<String>> {
    Ok(crate::resolve::site::extract_site_code(&device_id))
}

/// Map a site code to its canonical city name.
#[pyfunction]
fn normalize_site(code: String) -> PyResult<Option<String>> {
    Ok(crate::resolve::site::normalize_site(&code))
}

/// True when a candidate model string starts with a valid `7xxx` prefix.
#[pyfunction]
fn validate_device_type(device_type: String) -> PyResult<bool> {
    Ok(crate::resolve::device_type::validate_device_type(
        &device_type,
    ))
}

/// Load one reference spreadsheet into the session catalog.
///
/// The table is classified by its header shape and replaces any previous
/// table of the same format. Returns the detected format label, or
/// `"unrecognized"` for a header matching neither export.
///
/// # Arguments
/// * `columns` - Header row
/// * `rows` - Data rows, one list of cells per row
#[pyfunction]
fn load_catalog_table(columns: Vec<String>, rows: Vec<Vec<String>>) -> PyResult<String> {
    init_logger();

    let rows = rows
        .into_iter()
        .map(|cells| cells.into_iter().map(Value::String).collect())
        .collect();
    let table = ReferenceTable::from_rows(columns, rows)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    match catalog_mut().push_table(table) {
        Some(format) => Ok(format.as_str().to_string()),
        None => Ok("unrecognized".to_string()),
    }
}

/// Drop every loaded reference table.
///
/// Call this when the dashboard session reloads its spreadsheets.
#[pyfunction]
fn refresh_catalog() -> PyResult<()> {
    init_logger();
    catalog_mut().clear();
    log::info!("CATALOG_CLEARED");
    Ok(())
}

/// Number of reference tables currently loaded.
#[pyfunction]
fn get_catalog_table_count() -> PyResult<usize> {
    Ok(catalog().table_count())
}

/// Look a service id up across the loaded reference tables.
///
/// Returns `(description, source)`; a miss yields `(None, "Not found")`.
#[pyfunction]
fn lookup_service(service_id: String) -> PyResult<(Option<String>, String)> {
    init_logger();

    let ctx = LogContext::new("catalog");
    let result = resolve::lookup_service(&catalog(), &service_id, &ctx);
    Ok((result.description, result.source.as_str().to_string()))
}

/// Extract the CI/CO tracking code for one service.
#[pyfunction]
fn extract_service_code(service_id: String, description: String) -> PyResult<String> {
    Ok(code::extract_service_code(&service_id, &description))
}

/// Python module definition
#[pymodule]
fn noclens_core(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_report, m)?)?;
    m.add_function(wrap_pyfunction!(extract_site_code, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_site, m)?)?;
    m.add_function(wrap_pyfunction!(validate_device_type, m)?)?;
    m.add_function(wrap_pyfunction!(load_catalog_table, m)?)?;
    m.add_function(wrap_pyfunction!(refresh_catalog, m)?)?;
    m.add_function(wrap_pyfunction!(get_catalog_table_count, m)?)?;
    m.add_function(wrap_pyfunction!(lookup_service, m)?)?;
    m.add_function(wrap_pyfunction!(extract_service_code, m)?)?;
    Ok(())
}
