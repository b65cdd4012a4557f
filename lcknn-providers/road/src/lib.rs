//! Text formats for road networks, points of interest, elimination orders,
//! update streams, and query workloads.
//!
//! Every reader accepts any [`std::io::BufRead`] and reports failures with
//! the 1-based line they occurred on. The `load_*` helpers open a path and
//! delegate to the matching reader.

mod errors;
mod network;
mod records;
mod sample;
mod vertices;
mod workload;

pub use errors::RoadFormatError;
pub use network::{RoadNetwork, load_network, parse_label_code, read_network, road_class_code};
pub use sample::{DEFAULT_POI_DENSITY, DEFAULT_POI_SEED, sample_pois};
pub use vertices::{load_order, load_pois, read_order, read_pois};
pub use workload::{
    QueryRequest, load_queries, load_updates, read_queries, read_updates, write_updates,
};

#[cfg(test)]
mod tests;
