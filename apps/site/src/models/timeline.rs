use serde::{Deserialize, Serialize};

/// One stop on the career timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: u32,
    pub company: String,
    /// Path to the logo under the static build directory.
    pub logo: String,
    pub role: String,
    pub dates: String,
    pub stack: Vec<String>,
    pub summary: String,
    pub details: Vec<String>,
}
