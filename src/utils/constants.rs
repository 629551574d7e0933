/// Region defaults (Región Metropolitana de Santiago)
pub const DEFAULT_REGION_CODE: u32 = 13;
pub const DEFAULT_UTM_ZONE: u8 = 19;

/// Year range defaults, end exclusive
pub const DEFAULT_START_YEAR: i32 = 2019;
pub const DEFAULT_END_YEAR: i32 = 2026;

/// Degree-to-kilometre factor used by the planar distance approximation
pub const KM_PER_DEGREE: f64 = 111.0;

/// Neighbors used by cross-sectional imputation
pub const DEFAULT_KNN_NEIGHBORS: usize = 3;

/// Reconstruction method discriminators
pub const METHOD_LINEAR: &str = "linear";
pub const METHOD_SEASONAL: &str = "seasonal";
pub const METHOD_KNN: &str = "knn";

/// WGS84 ellipsoid
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
pub const UTM_SCALE_FACTOR: f64 = 0.9996;
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// EPSG codes
pub const EPSG_WGS84: u32 = 4326;
pub const EPSG_UTM_NORTH_BASE: u32 = 32600;
pub const EPSG_UTM_SOUTH_BASE: u32 = 32700;

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "COMUNA_TEMPS";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
