//! Rate Model (费率)

use serde::{Deserialize, Serialize};

/// Fee policy row. The lowest-id active row is canonical.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Rate {
    pub id: i64,
    pub rate_per_hour: f64,
    pub is_active: bool,
    pub effective_from: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Current-rate view exposed to clients
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateInfo {
    pub rate_per_hour: f64,
}

/// Administrative rate update (mutates the canonical row in place)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateUpdate {
    pub rate_per_hour: f64,
}
