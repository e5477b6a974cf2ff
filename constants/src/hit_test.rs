/// Full opening angle of the high-quality feature cone (degrees). The cone
/// half-angle is half of this.
pub const FEATURE_CONE_OPENING_ANGLE_DEGREES: f32 = 18.0;

/// Features projecting closer than this along the ray are ignored (metres).
pub const FEATURE_MIN_DISTANCE: f32 = 0.2;

/// Features projecting further than this along the ray are ignored (metres).
pub const FEATURE_MAX_DISTANCE: f32 = 2.0;

/// Number of candidates kept by a constrained feature search.
pub const FEATURE_MAX_RESULTS: usize = 1;

/// Rays whose vertical direction component is above this value never hit the
/// infinite horizontal plane (too flat, or pointing up).
pub const INFINITE_PLANE_MAX_DIRECTION_Y: f32 = -0.03;

/// Global switch for the drag-on-infinite-planes mode.
pub const DRAG_ON_INFINITE_PLANES_ENABLED: bool = false;

/// Vectors shorter than this cannot be normalised.
pub const DEGENERATE_VECTOR_EPSILON: f32 = 1e-6;

/// Direction components with a magnitude below this count as parallel to a plane.
pub const PARALLEL_EPSILON: f32 = 1e-6;
