/// Occlusion geometry sits 1 cm below the tracked plane to avoid z-fighting.
pub const OCCLUSION_PLANE_VERTICAL_OFFSET: f32 = -0.01;

/// The occlusion surface is shrunk by this much on each axis (metres).
pub const OCCLUSION_PLANE_INSET: f32 = 0.05;

/// Debug surface sits 2 mm below the plane origin.
pub const DEBUG_PLANE_VERTICAL_OFFSET: f32 = -0.002;

/// World size covered by one repeat of the debug grid texture (metres).
pub const DEBUG_GRID_TILE_SIZE: f32 = 2.4;

pub const SHOW_DEBUG_VISUALIZATION: bool = true;
pub const USE_OCCLUSION_PLANES: bool = false;
