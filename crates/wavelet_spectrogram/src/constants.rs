// Defaults for values the cli can override.
/// `decimate = nsamples >> DECIMATION_FACTOR` columns are kept per chunk.
pub const DECIMATION_FACTOR: u32 = 8;
/// Columns in the horizontal normalization window.
pub const NORMA_WINDOW_LEN: usize = 501;
pub const ROWS_PER_OCTAVE: f64 = 72.0;
pub const OMEGA0: f64 = 70.0;

// Harmonic search around a point.
pub const HARMONIC_COUNT: usize = 24;
pub const SUBHARMONIC_COUNT: usize = 12;
/// Columns searched either side of the point.
pub const PEAK_SEARCH_COLUMNS: usize = 3;
/// Rows searched either side of the point.
pub const PEAK_SEARCH_ROWS: usize = 12;
