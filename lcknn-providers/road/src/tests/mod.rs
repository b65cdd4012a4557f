//! Tests covering the road-network text formats.

mod sample;
