pub mod candidate;
pub mod face;
pub mod plane;
pub mod quadric;
pub mod reduction;
pub mod topology;
pub mod tri_mesh;
pub mod vertex;

mod compact;
