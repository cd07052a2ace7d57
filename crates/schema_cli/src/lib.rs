//! Schema CLI Library
//!
//! Per-match JSON batches and CSV exports → validated registry
//! Accepted records → MessagePack → LZ4 → SHA256 snapshot

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use soccer_schema::registry::BatchReport;
use soccer_schema::{EntitySpec, MatchBatch, Record, SchemaRegistry};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Snapshot metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Catalog version of the exported records
    pub schema_version: String,
    /// SHA256 of the compressed file (hex)
    pub checksum: String,
    /// RFC3339
    pub created_at: String,
    /// MessagePack size before compression (bytes)
    pub original_size: u64,
    pub compressed_size: u64,
    /// compressed / original
    pub compression_ratio: f64,
    pub record_count: usize,
}

/// Reads a per-match batch file: `{"entities": {"Team": [...], ...}}`.
pub fn read_batch(path: &Path) -> Result<MatchBatch> {
    let json_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file: {}", path.display()))?;

    serde_json::from_str(&json_str)
        .with_context(|| format!("Failed to parse batch file: {}", path.display()))
}

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseStats {
    pub total_rows: usize,
    pub parsed: usize,
    /// Rows the csv reader could not decode; skipped
    pub failed: usize,
    /// Rows whose cell count differs from the header
    pub ragged: usize,
}

/// Records read from one CSV export.
#[derive(Debug, Clone, Default)]
pub struct CsvRows {
    pub records: Vec<Record>,
    pub stats: ParseStats,
}

/// Reads a CSV export of one entity. Headers are field names.
///
/// Cells are coerced by the declared field type. Empty cells become null;
/// cells that don't coerce (and undeclared columns) stay as text so the
/// validator reports them. Short rows are kept with their missing columns
/// absent; cells beyond the header are dropped.
pub fn read_csv(path: &Path, spec: &EntitySpec) -> Result<CsvRows> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV headers: {}", path.display()))?
        .clone();

    let mut rows = CsvRows::default();
    for result in reader.records() {
        rows.stats.total_rows += 1;
        let row_data = match result {
            Ok(row_data) => row_data,
            Err(e) => {
                rows.stats.failed += 1;
                warn!("{}: skipping row {}: {}", path.display(), rows.stats.total_rows, e);
                continue;
            }
        };

        if row_data.len() != headers.len() {
            rows.stats.ragged += 1;
            warn!(
                "{}: row {} has {} cells, header has {}",
                path.display(),
                rows.stats.total_rows,
                row_data.len(),
                headers.len()
            );
        }

        let mut record = Record::new();
        for (header, cell) in headers.iter().zip(row_data.iter()) {
            record.insert(header.to_string(), coerce_cell(spec, header, cell));
        }
        rows.records.push(record);
        rows.stats.parsed += 1;
    }

    debug!("{}: read {} rows for {}", path.display(), rows.stats.parsed, spec.name);
    Ok(rows)
}

fn coerce_cell(spec: &EntitySpec, header: &str, cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    spec.field_spec(header)
        .and_then(|field| field.field_type.coerce_str(cell))
        .unwrap_or_else(|| Value::String(cell.to_string()))
}

/// Loads a CSV export into the registry as one batch.
pub fn load_csv(registry: &mut SchemaRegistry, entity: &str, path: &Path) -> Result<BatchReport> {
    let Some(spec) = registry.entity(entity) else {
        bail!("Unknown entity: {}", entity);
    };
    let rows = read_csv(path, spec)?;
    Ok(registry.load_batch(entity, rows.records)?)
}

/// Exports every accepted record as a MsgPack+LZ4 snapshot.
///
/// The payload is a `MatchBatch`, so a snapshot can be fed back through
/// `load_match_file`.
pub fn export_snapshot(
    registry: &SchemaRegistry,
    output: &Path,
    schema_version: &str,
) -> Result<SnapshotMetadata> {
    let batch = MatchBatch {
        entities: registry.index().to_tables(),
    };
    let record_count = batch.record_count();

    let msgpack_bytes =
        rmp_serde::to_vec_named(&batch).context("Failed to serialize to MessagePack")?;
    let original_size = msgpack_bytes.len() as u64;

    let compressed = lz4_flex::compress_prepend_size(&msgpack_bytes);
    let compressed_size = compressed.len() as u64;
    let checksum = sha256_hex(&compressed);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output, &compressed)
        .with_context(|| format!("Failed to write snapshot: {}", output.display()))?;

    info!(
        "exported {} records to {} ({} -> {} bytes)",
        record_count,
        output.display(),
        original_size,
        compressed_size
    );

    Ok(SnapshotMetadata {
        schema_version: schema_version.to_string(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        original_size,
        compressed_size,
        compression_ratio: if original_size == 0 {
            0.0
        } else {
            compressed_size as f64 / original_size as f64
        },
        record_count,
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// True if the snapshot file hashes to `expected_checksum`.
pub fn verify_snapshot(snapshot: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(snapshot)
        .with_context(|| format!("Failed to read snapshot: {}", snapshot.display()))?;

    Ok(sha256_hex(&bytes) == expected_checksum)
}

/// Decompresses and decodes a snapshot back into a batch.
pub fn load_snapshot(snapshot: &Path) -> Result<MatchBatch> {
    let compressed = fs::read(snapshot)
        .with_context(|| format!("Failed to read snapshot: {}", snapshot.display()))?;

    let msgpack_bytes =
        lz4_flex::decompress_size_prepended(&compressed).context("Failed to decompress LZ4")?;

    rmp_serde::from_slice(&msgpack_bytes).context("Failed to deserialize MessagePack")
}

/// Rejections rendered one per line: `Entity row N: error`.
pub fn format_rejections(reports: &[BatchReport]) -> Vec<String> {
    reports
        .iter()
        .flat_map(|report| {
            report
                .rejected
                .iter()
                .map(move |r| format!("{} row {}: {}", report.entity, r.row, r.error))
        })
        .collect()
}
