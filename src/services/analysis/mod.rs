pub mod competitor;
pub mod geo;
pub mod trends;

pub use competitor::{analyze, AnalysisError, CompetitorAnalysis, MarketSaturation};
pub use geo::{haversine_km, Coordinates};
pub use trends::MarketTrends;
