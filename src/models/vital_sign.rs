use serde::{Deserialize, Serialize};

/// A single vital sign measurement set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSign {
    pub id: i64,
    pub patient_id: String,
    pub measurement_date: String,
    pub systolic_bp: i32,
    pub diastolic_bp: i32,
    pub heart_rate: i32,
    pub temperature: Option<f64>,
    pub respiratory_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub weight: Option<f64>,
}
