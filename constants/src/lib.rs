pub mod coordinate_system;
pub mod hit_test;
pub mod measurement;
pub mod plane_visuals;
