//! Two-source service lookup with a generic fallback.
//!
//! A service id is searched in the NSP24 table first, then the NSP19
//! table. Each table gets a dialect-specific search on its id column and,
//! when that yields nothing usable, a generic any-column scan. The result
//! always names which source satisfied the match; an absent id is the
//! `NotFound` attribution, never an error.

use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::logging::LogContext;
use crate::lookup::catalog::{cell_str, string_cell, ReferenceCatalog, ReferenceTable};
use crate::lookup::code::extract_service_code;
use crate::records::{ReportFormat, ServiceRecord};

/// Which source satisfied a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LookupSource {
    #[serde(rename = "NSP24")]
    Nsp24,
    #[serde(rename = "NSP19")]
    Nsp19,
    #[serde(rename = "Not found")]
    NotFound,
}

impl LookupSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupSource::Nsp24 => "NSP24",
            LookupSource::Nsp19 => "NSP19",
            LookupSource::NotFound => "Not found",
        }
    }
}

/// Result of one service lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceLookup {
    pub description: Option<String>,
    pub source: LookupSource,
}

// NSP24 export columns.
const NSP24_ID_COLUMN: &str = "Service ID";
const NSP24_NAME_COLUMN: &str = "Service Name";
const NSP24_TYPE_COLUMN: &str = "Service Type";
const NSP24_DESC_COLUMN: &str = "Description";

// NSP19 export columns.
const NSP19_ID_COLUMN: &str = "ServiceId";
const NSP19_NAME_COLUMN: &str = "ServiceName";
const NSP19_CUSTOMER_COLUMN: &str = "CustomerName";

/// Column-name fragments worth matching an id against.
const KEY_COLUMN_TERMS: [&str; 4] = ["id", "service", "name", "desc"];
/// Column-name fragments likely to hold a description.
const DESC_COLUMN_TERMS: [&str; 4] = ["desc", "name", "servicio", "service"];
/// Value fragments that mark real NOC descriptions.
const DESC_VALUE_MARKERS: [&str; 4] = ["CI", ".CO", "ETB", "MGMT"];
/// Anything at or below this length is a label, not a description.
const MIN_DESC_LEN: usize = 5;

/// Spreadsheet placeholders never count as a description.
fn is_usable(value: &str) -> bool {
    !value.is_empty() && value != "N/A" && value != "NaN"
}

fn usable_cell(row: &Map<String, Value>, column: &str) -> Option<String> {
    string_cell(row, column).filter(|value| is_usable(value))
}

fn find_row<'a>(
    table: &'a ReferenceTable,
    id_column: &str,
    service_id: &str,
) -> Option<&'a Map<String, Value>> {
    if !table.has_column(id_column) {
        return None;
    }
    table
        .rows()
        .iter()
        .find(|row| cell_str(row, id_column).as_deref() == Some(service_id))
}

/// NSP24 row: the description column first, then the name and type
/// columns, composited when both are present.
fn describe_nsp24_row(row: &Map<String, Value>) -> Option<String> {
    if let Some(desc) = usable_cell(row, NSP24_DESC_COLUMN) {
        return Some(desc);
    }
    match (
        usable_cell(row, NSP24_NAME_COLUMN),
        usable_cell(row, NSP24_TYPE_COLUMN),
    ) {
        (Some(name), Some(kind)) => Some(format!("{} ({})", name, kind)),
        (Some(name), None) => Some(name),
        (None, Some(kind)) => Some(kind),
        (None, None) => None,
    }
}

/// NSP19 row: the service name, falling back to the customer column. An
/// unusable row falls through to the generic scan.
fn describe_nsp19_row(row: &Map<String, Value>) -> Option<String> {
    usable_cell(row, NSP19_NAME_COLUMN).or_else(|| usable_cell(row, NSP19_CUSTOMER_COLUMN))
}

fn name_matches(column: &str, terms: &[&str]) -> bool {
    let lower = column.to_lowercase();
    terms.iter().any(|term| lower.contains(term))
}

/// Last-resort scan: match the id against every plausible key column,
/// then pull the first description-looking value out of the matched row.
fn generic_search(table: &ReferenceTable, service_id: &str) -> Option<String> {
    let mut key_columns: Vec<&String> = table
        .columns()
        .iter()
        .filter(|column| name_matches(column, &KEY_COLUMN_TERMS))
        .collect();
    if key_columns.is_empty() {
        key_columns = table.columns().iter().collect();
    }

    let desc_columns: Vec<&String> = table
        .columns()
        .iter()
        .filter(|column| name_matches(column, &DESC_COLUMN_TERMS))
        .collect();

    for key_column in key_columns {
        let Some(row) = find_row(table, key_column, service_id) else {
            continue;
        };

        for column in &desc_columns {
            if let Some(value) = string_cell(row, column) {
                if value.len() > MIN_DESC_LEN && value != "N/A" {
                    return Some(value);
                }
            }
        }
        for column in table.columns() {
            if let Some(value) = string_cell(row, column) {
                if value.len() > MIN_DESC_LEN
                    && value != "N/A"
                    && DESC_VALUE_MARKERS.iter().any(|marker| value.contains(marker))
                {
                    return Some(value);
                }
            }
        }
    }

    None
}

fn search_table(table: &ReferenceTable, format: ReportFormat, service_id: &str) -> Option<String> {
    let described = match format {
        ReportFormat::Nsp24 => {
            find_row(table, NSP24_ID_COLUMN, service_id).and_then(describe_nsp24_row)
        }
        ReportFormat::Nsp19 => {
            find_row(table, NSP19_ID_COLUMN, service_id).and_then(describe_nsp19_row)
        }
    };
    described.or_else(|| generic_search(table, service_id))
}

/// Look one service id up across the catalog.
pub fn lookup_service(
    catalog: &ReferenceCatalog,
    service_id: &str,
    ctx: &LogContext,
) -> ServiceLookup {
    let service_id = service_id.trim();

    if let Some(table) = catalog.nsp24() {
        if let Some(description) = search_table(table, ReportFormat::Nsp24, service_id) {
            log::debug!("{} LOOKUP_HIT service_id={} source=NSP24", ctx, service_id);
            return ServiceLookup {
                description: Some(description),
                source: LookupSource::Nsp24,
            };
        }
    }
    if let Some(table) = catalog.nsp19() {
        if let Some(description) = search_table(table, ReportFormat::Nsp19, service_id) {
            log::debug!("{} LOOKUP_HIT service_id={} source=NSP19", ctx, service_id);
            return ServiceLookup {
                description: Some(description),
                source: LookupSource::Nsp19,
            };
        }
    }

    log::debug!("{} LOOKUP_MISS service_id={}", ctx, service_id);
    ServiceLookup {
        description: None,
        source: LookupSource::NotFound,
    }
}

/// One service resolved against the catalog, ready for NOC export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedService {
    pub device_id: String,
    pub service_id: u64,
    /// Catalog description when the lookup hit, otherwise the name the
    /// report itself carried.
    pub name: String,
    pub code: String,
    pub source: LookupSource,
}

/// Per-origin tallies for one batch resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LookupStats {
    pub nsp24: usize,
    pub nsp19: usize,
    pub not_found: usize,
}

/// Resolve a whole service table against the catalog.
///
/// Lookups are independent and fan out over the thread pool; the stats
/// tally runs sequentially over the collected results.
pub fn resolve_services(
    catalog: &ReferenceCatalog,
    services: &[ServiceRecord],
    ctx: &LogContext,
) -> (Vec<ResolvedService>, LookupStats) {
    let resolved: Vec<ResolvedService> = services
        .par_iter()
        .map(|service| {
            let service_id = service.service_id.to_string();
            let lookup = lookup_service(catalog, &service_id, ctx);
            let name = lookup
                .description
                .or_else(|| service.name.clone())
                .unwrap_or_default();
            let code = extract_service_code(&service_id, &name);
            ResolvedService {
                device_id: service.device_id.clone(),
                service_id: service.service_id,
                name,
                code,
                source: lookup.source,
            }
        })
        .collect();

    let mut stats = LookupStats::default();
    for service in &resolved {
        match service.source {
            LookupSource::Nsp24 => stats.nsp24 += 1,
            LookupSource::Nsp19 => stats.nsp19 += 1,
            LookupSource::NotFound => stats.not_found += 1,
        }
    }

    log::info!(
        "{} LOOKUP_BATCH_COMPLETE services={} nsp24={} nsp19={} not_found={}",
        ctx,
        resolved.len(),
        stats.nsp24,
        stats.nsp19,
        stats.not_found
    );

    (resolved, stats)
}
