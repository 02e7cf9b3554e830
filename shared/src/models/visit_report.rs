//! Visit Report (Daily Call Report) Models

use serde::{Deserialize, Deserializer, Serialize};

/// One sample line handed over during a visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleGiven {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
}

/// Daily call report describing one doctor visit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitReport {
    pub report_id: i64,
    pub visit_title: String,
    /// e.g. "Clinic Visit", "Hospital Round", "Pharmacy Call"
    pub visit_type: String,
    /// Stringified doctor ID as the form submits it
    pub doctor_id: Option<String>,
    pub doctor_name: String,
    pub clinic_location: Option<String>,
    /// Visit timestamp, "YYYY-MM-DDTHH:MM" local form
    pub date_time: String,
    /// 1 to 5; tolerated as a number or a numeric string on the wire
    #[serde(default, deserialize_with = "rating_as_int")]
    pub rating: Option<i32>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub samples_given: Vec<SampleGiven>,
    pub submission_time: Option<String>,
}

/// Create payload; edits re-submit this same shape in full
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitReportCreate {
    pub visit_title: String,
    pub visit_type: String,
    pub doctor_id: Option<String>,
    pub doctor_name: String,
    pub clinic_location: Option<String>,
    pub date_time: String,
    #[serde(default, deserialize_with = "rating_as_int")]
    pub rating: Option<i32>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub samples_given: Vec<SampleGiven>,
}

impl VisitReport {
    /// Build a full record from a create payload and an assigned ID.
    pub fn from_create(report_id: i64, payload: VisitReportCreate, submission_time: String) -> Self {
        Self {
            report_id,
            visit_title: payload.visit_title,
            visit_type: payload.visit_type,
            doctor_id: payload.doctor_id,
            doctor_name: payload.doctor_name,
            clinic_location: payload.clinic_location,
            date_time: payload.date_time,
            rating: payload.rating,
            remarks: payload.remarks,
            samples_given: payload.samples_given,
            submission_time: Some(submission_time),
        }
    }

    /// Total units handed out across all sample lines.
    pub fn total_samples(&self) -> i64 {
        self.samples_given.iter().map(|s| s.quantity).sum()
    }
}

fn rating_as_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i32),
        Text(String),
    }
    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratings_parse_from_numbers_and_strings() {
        let from_num: VisitReport = serde_json::from_str(
            r#"{"reportId":1,"visitTitle":"t","visitType":"Clinic Visit","doctorName":"Dr. Mehta","dateTime":"2025-08-12T10:30","rating":4}"#,
        )
        .unwrap();
        assert_eq!(from_num.rating, Some(4));
        let from_text: VisitReport = serde_json::from_str(
            r#"{"reportId":2,"visitTitle":"t","visitType":"Clinic Visit","doctorName":"Dr. Mehta","dateTime":"2025-08-12T10:30","rating":"5"}"#,
        )
        .unwrap();
        assert_eq!(from_text.rating, Some(5));
        assert_eq!(from_text.doctor_id, None);
    }

    #[test]
    fn sample_totals_sum_every_line() {
        let report: VisitReport = serde_json::from_str(
            r#"{"reportId":1,"visitTitle":"t","visitType":"Clinic Visit","doctorName":"Dr. Mehta","dateTime":"2025-08-12T10:30","samplesGiven":[{"productId":"1","productName":"A","quantity":5},{"productId":"2","productName":"B","quantity":3}]}"#,
        )
        .unwrap();
        assert_eq!(report.total_samples(), 8);
    }
}
