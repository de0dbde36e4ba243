/// Stops with more demand than this are routed as several chunks.
pub const CHUNK_SIZE: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandChunk {
    /// `None` when the stop is not split.
    pub chunk: Option<usize>,
    pub demand: i64,
    pub service_min: i64,
}

/// Splits a demand into contiguous chunks of at most [`CHUNK_SIZE`] units.
///
/// Each chunk gets the share of the service time proportional to its demand,
/// rounded to whole minutes. The last chunk holds the remainder.
pub fn split_demand(demand: i64, service_min: f64) -> Vec<DemandChunk> {
    if demand <= CHUNK_SIZE {
        return vec![DemandChunk {
            chunk: None,
            demand,
            service_min: service_min.round() as i64,
        }];
    }

    let mut chunks = Vec::with_capacity(chunk_count(demand));
    let mut remaining = demand;

    while remaining > 0 {
        let take = remaining.min(CHUNK_SIZE);
        chunks.push(DemandChunk {
            chunk: Some(chunks.len()),
            demand: take,
            service_min: (service_min * take as f64 / demand as f64).round() as i64,
        });
        remaining -= take;
    }

    chunks
}

/// Number of chunks [`split_demand`] produces for a positive demand above [`CHUNK_SIZE`].
fn chunk_count(demand: i64) -> usize {
    ((demand + CHUNK_SIZE - 1) / CHUNK_SIZE) as usize
}

/// Internal name of a chunk node, only ever used in logs.
pub fn chunk_label(stop_id: &str, chunk: usize) -> String {
    format!("{stop_id}#chunk_{chunk}")
}
