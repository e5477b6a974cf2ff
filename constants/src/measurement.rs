/// Decimal places used when formatting a measurement label.
pub const MEASUREMENT_LABEL_PRECISION: usize = 5;

/// Distances below this are too short to draw an edge for (metres).
pub const MIN_DRAWABLE_DISTANCE: f32 = 0.02;
