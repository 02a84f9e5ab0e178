pub mod courses;
pub mod enrollment;
pub mod status;
