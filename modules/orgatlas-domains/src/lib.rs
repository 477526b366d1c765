pub mod geo;
pub mod tree;

pub use geo::{filter_by_bbox, filter_by_radius, haversine_km, Located};
pub use tree::ActivityTree;
