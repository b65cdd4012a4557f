//! Optional metrics recorded by queries and updates.

#[cfg(feature = "metrics")]
pub(crate) fn record_query() {
    metrics::counter!("lcknn_queries_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) const fn record_query() {}

#[cfg(feature = "metrics")]
pub(crate) fn record_insert(operations: usize, affected: usize) {
    metrics::counter!("lcknn_poi_inserts_total").increment(operations as u64);
    record_affected("insert", affected);
}

#[cfg(not(feature = "metrics"))]
pub(crate) const fn record_insert(_operations: usize, _affected: usize) {}

#[cfg(feature = "metrics")]
pub(crate) fn record_delete(operations: usize, affected: usize) {
    metrics::counter!("lcknn_poi_deletes_total").increment(operations as u64);
    record_affected("delete", affected);
}

#[cfg(not(feature = "metrics"))]
pub(crate) const fn record_delete(_operations: usize, _affected: usize) {}

#[cfg(feature = "metrics")]
fn record_affected(operation: &'static str, affected: usize) {
    metrics::histogram!("lcknn_update_affected_vertices", "operation" => operation)
        .record(affected as f64);
}
