//! Report ingestion pipeline.
//!
//! One call parses one concatenated report end to end: unreachable
//! detection, segmentation, per-device extraction, and the summary
//! rollup. Extraction never fails the parse; a block that yields nothing
//! simply contributes empty tables and the device surfaces as `NoData`.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::extraction::{
    detect_unreachable, extract_chassis, extract_modules, extract_port_descriptions,
    extract_ports, extract_services, extract_version,
};
use crate::pipeline::context::{DeviceContext, ParseContext};
use crate::pipeline::segmenter::{harvest_inventory, segment_blocks};
use crate::records::{
    ChassisRecord, ModuleRecord, ParseResult, PortDescriptionRecord, PortRecord, ReportFormat,
    ServiceRecord, VersionRecord,
};
use crate::summary::summarize;

/// Everything one device block yields. Chassis and version sections occur
/// at most once per block.
#[derive(Debug, Default)]
struct BlockRecords {
    services: Vec<ServiceRecord>,
    ports: Vec<PortRecord>,
    descriptions: Vec<PortDescriptionRecord>,
    chassis: Option<ChassisRecord>,
    version: Option<VersionRecord>,
    modules: Vec<ModuleRecord>,
}

/// Parse a raw concatenated report under a fresh context.
pub fn parse(raw_text: &str) -> ParseResult {
    parse_with_context(&ParseContext::new(), raw_text)
}

/// Parse a raw concatenated report under the given context.
///
/// Pure over the input: the same text always yields the same tables and
/// summaries, so re-running a parse is always safe.
pub fn parse_with_context(ctx: &ParseContext, raw_text: &str) -> ParseResult {
    let log_ctx = ctx.log_context();
    log::info!("{} PARSE_RECEIVED bytes={}", log_ctx, raw_text.len());

    // [1] UNREACHABLE DETECTION
    // Error banners are flagged over the whole text before slicing, so a
    // device that never produced a block still gets reported.
    let unreadable = detect_unreachable(raw_text, &log_ctx);

    // [2] SEGMENTATION & INVENTORY
    let blocks = segment_blocks(raw_text, &log_ctx);
    let identities = harvest_inventory(raw_text, &log_ctx);
    let source_by_id: HashMap<&str, ReportFormat> = identities
        .iter()
        .map(|identity| (identity.device_id.as_str(), identity.source))
        .collect();

    // [3] PER-BLOCK EXTRACTION
    // Blocks are independent, so extraction fans out across the thread
    // pool; collect() keeps report order.
    let extracted: Vec<BlockRecords> = blocks
        .par_iter()
        .map(|(device_id, body)| {
            let source = source_by_id
                .get(device_id.as_str())
                .copied()
                .unwrap_or(ReportFormat::Nsp19);
            extract_block(&ctx.device_context(device_id, source), body)
        })
        .collect();

    // [4] MERGE
    let mut services = Vec::new();
    let mut ports = Vec::new();
    let mut port_descriptions = Vec::new();
    let mut chassis = Vec::new();
    let mut versions = Vec::new();
    let mut modules = Vec::new();
    for block in extracted {
        services.extend(block.services);
        ports.extend(block.ports);
        port_descriptions.extend(block.descriptions);
        chassis.extend(block.chassis);
        versions.extend(block.version);
        modules.extend(block.modules);
    }

    // [5] SUMMARY ROLLUP
    let summaries = summarize(ctx, &identities, &services, &ports, &chassis, &versions);

    log::info!(
        "{} PARSE_COMPLETE devices={} services={} ports={} unreachable={}",
        log_ctx,
        identities.len(),
        services.len(),
        ports.len(),
        unreadable.len()
    );

    ParseResult {
        parse_id: ctx.parse_id.clone(),
        parsed_at: ctx.started_at,
        identities,
        chassis,
        versions,
        ports,
        port_descriptions,
        services,
        modules,
        unreadable,
        summaries,
    }
}

fn extract_block(device: &DeviceContext, body: &str) -> BlockRecords {
    let ctx = device.log_context();
    BlockRecords {
        services: extract_services(body, &device.device_id, &ctx),
        ports: extract_ports(body, &device.device_id, &ctx),
        descriptions: extract_port_descriptions(body, &device.device_id, &ctx),
        chassis: extract_chassis(body, &device.device_id, &ctx),
        version: extract_version(body, &device.device_id, &ctx),
        modules: extract_modules(body, &device.device_id, &ctx),
    }
}
