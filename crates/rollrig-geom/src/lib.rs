pub mod aabb;
pub mod shape;
pub mod mass;
pub mod sphere;

pub use aabb::Aabb;
pub use shape::Shape;
pub use mass::MassProps;
pub use shape::aabb_of;
pub use sphere::{closest_point_on_sphere, grab_point, GRAB_REACH_RADII};
