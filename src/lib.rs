//! Adaptive Intersection Simulation Library
//!
//! Simulates a four-way urban intersection: vehicles approach from four
//! directions, a signal controller grants right-of-way, and signal timing is
//! periodically re-optimized by an external advisory service with a
//! deterministic local fallback. The simulation runs headless; external
//! consumers (rendering, dashboards) read copy-out snapshots.

pub mod simulation;
