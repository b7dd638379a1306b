use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorQuery {
    #[serde(alias = "business_id")]
    pub business_id: u32,
    /// Falls back to the configured default search radius.
    #[serde(alias = "radius_km")]
    pub radius_km: Option<f64>,
}
