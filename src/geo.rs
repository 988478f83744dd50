// Geospatial cell bucketing
// The indexer is a collaborator seam: the rest of the service treats
// CellId as opaque and only depends on the trait.

use serde::{Deserialize, Serialize};

/// Highest resolution the service accepts. At resolution 12 a cell spans
/// roughly 0.09 degrees of longitude, which is far finer than the density
/// queries this service answers.
pub const MAX_RESOLUTION: u8 = 12;

/// Opaque identifier for a bounded geographic region at a fixed resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a WGS84 coordinate to its cell at the given resolution.
///
/// Implementations must be pure: the same (lat, lon, resolution) always
/// yields the same CellId.
pub trait CellIndexer: Send + Sync {
    fn cell_index(&self, lat: f64, lon: f64, resolution: u8) -> CellId;
}

/// Fixed-grid quantizer over the lat/lon plane.
///
/// Each resolution step doubles the number of rows and columns, so two
/// coordinates share a cell exactly when they fall into the same grid
/// square. A hierarchical indexer (H3, S2) can be swapped in behind the
/// same trait without touching the service.
pub struct GridCellIndexer;

impl CellIndexer for GridCellIndexer {
    fn cell_index(&self, lat: f64, lon: f64, resolution: u8) -> CellId {
        let resolution = resolution.min(MAX_RESOLUTION);
        let scale = f64::from(1u32 << resolution);

        // Normalize into [0, 1) and clamp the poles/antimeridian into the
        // outermost cells so every input maps somewhere.
        let col = grid_coord((lon + 180.0) / 360.0, scale);
        let row = grid_coord((lat + 90.0) / 180.0, scale);

        CellId::new(format!("{:02x}{:04x}{:04x}", resolution, col, row))
    }
}

fn grid_coord(normalized: f64, scale: f64) -> u32 {
    let idx = (normalized * scale).floor();
    idx.clamp(0.0, scale - 1.0) as u32
}
