use serde::Deserialize;

/// One entry of a movie catalog listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    #[allow(dead_code)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}
