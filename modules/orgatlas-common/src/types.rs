use serde::{Deserialize, Serialize};

// --- Geography ---

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

// --- Domain entities ---

/// A node in the activity taxonomy. `parent_id` is None for roots;
/// the parent/child graph is a forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

/// A building owning zero or more organizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Building {
    pub id: i32,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// An organization, pre-joined with its building's coordinates and its
/// linked activity ids. This is the shape every read path returns, so the
/// geo filter always receives a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Organization {
    pub id: i32,
    pub name: String,
    #[sqlx(json)]
    pub phone_numbers: Vec<String>,
    pub building_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub activity_ids: Vec<i32>,
}
