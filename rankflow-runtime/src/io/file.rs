use crate::dataset::PartitionedDataset;
use crate::io::storage::Storage;
use rankflow_common::error::{RankFlowError, RankFlowResult};
use rankflow_common::types::{AdjacencyRankRecord, RankedEntry};
use std::path::Path;

fn tab_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

fn tab_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new())
}

fn into_bytes(wtr: csv::Writer<Vec<u8>>) -> RankFlowResult<Vec<u8>> {
    wtr.into_inner().map_err(|e| {
        RankFlowError::Io(std::io::Error::new(e.error().kind(), e.error().to_string()))
    })
}

/// Reads every record of a round location, part files in order.
pub fn read_rank_records<S: Storage + ?Sized>(
    storage: &S,
    location: impl AsRef<Path>,
) -> RankFlowResult<Vec<AdjacencyRankRecord>> {
    let mut out = Vec::new();
    for file in storage.list_files(location.as_ref())? {
        let mut rdr = tab_reader(storage.open(&file)?);
        for (i, rec) in rdr.records().enumerate() {
            let at = format!("{}:{}", file.display(), i + 1);
            let rec = rec.map_err(|e| RankFlowError::malformed(&at, format!("csv read: {e}")))?;
            if rec.len() != 2 {
                return Err(RankFlowError::malformed(
                    &at,
                    format!("expected 2 tab-separated fields, found {}", rec.len()),
                ));
            }
            out.push(AdjacencyRankRecord::from_fields(&rec[0], &rec[1], &at)?);
        }
    }
    Ok(out)
}

pub fn write_rank_records<S: Storage + ?Sized>(
    storage: &S,
    location: impl AsRef<Path>,
    records: &PartitionedDataset<AdjacencyRankRecord>,
) -> RankFlowResult<()> {
    let mut parts = Vec::with_capacity(records.partitions());
    for p in 0..records.partitions() {
        let mut wtr = tab_writer();
        for r in records.partition(p) {
            wtr.write_record([r.key_field(), r.value_field()])
                .map_err(|e| RankFlowError::Io(e.into()))?;
        }
        parts.push(into_bytes(wtr)?);
    }
    storage.write_location(location.as_ref(), parts)
}

pub fn write_ranking<S: Storage + ?Sized>(
    storage: &S,
    location: impl AsRef<Path>,
    entries: &PartitionedDataset<RankedEntry>,
) -> RankFlowResult<()> {
    let mut parts = Vec::with_capacity(entries.partitions());
    for p in 0..entries.partitions() {
        let mut wtr = tab_writer();
        for entry in entries.partition(p) {
            wtr.write_record([entry.label.clone(), entry.rank.to_string()])
                .map_err(|e| RankFlowError::Io(e.into()))?;
        }
        parts.push(into_bytes(wtr)?);
    }
    storage.write_location(location.as_ref(), parts)
}

/// Reads the published ranking back as `(label, rank)` pairs.
pub fn read_ranking<S: Storage + ?Sized>(
    storage: &S,
    location: impl AsRef<Path>,
) -> RankFlowResult<Vec<(String, f64)>> {
    let mut out = Vec::new();
    for file in storage.list_files(location.as_ref())? {
        let mut rdr = tab_reader(storage.open(&file)?);
        for (i, rec) in rdr.records().enumerate() {
            let at = format!("{}:{}", file.display(), i + 1);
            let rec = rec.map_err(|e| RankFlowError::malformed(&at, format!("csv read: {e}")))?;
            let label = rec
                .get(0)
                .ok_or_else(|| RankFlowError::malformed(&at, "label missing"))?
                .to_string();
            let rank: f64 = rec
                .get(1)
                .ok_or_else(|| RankFlowError::malformed(&at, "rank missing"))?
                .trim()
                .parse()
                .map_err(|e| RankFlowError::malformed(&at, format!("rank parse: {e}")))?;
            out.push((label, rank));
        }
    }
    Ok(out)
}
