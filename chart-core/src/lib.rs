//! Mô hình hồ sơ bệnh nhân chuẩn hóa và các tiện ích hiển thị đi kèm.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod dates;
mod directory;
mod ordering;

pub use dates::{age_on, parse_calendar_date, parse_instant};
pub use directory::PatientDirectory;
pub use ordering::{ordered_encounters, EncounterOrder, SortDirection, SortKey};

/// Hồ sơ tóm tắt của một bệnh nhân, dựng một lần từ một bundle.
///
/// Mọi trường văn bản đều là `Option`: `None` nghĩa là nguồn không có dữ liệu,
/// còn `Some("")` nghĩa là nguồn có trường nhưng để trống.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientRecord {
    pub subject_id: String,
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub sex: Option<String>,
    pub insurance_payor: Option<String>,
    pub pcp_name: Option<String>,
    pub contact_phone: Option<String>,
    pub address_display: Option<String>,
    pub marital_status: Option<String>,
    pub preferred_language: Option<String>,
    /// Theo đúng thứ tự xuất hiện trong bundle.
    pub encounters: Vec<EncounterSummary>,
    pub diagnoses: Vec<DiagnosisSummary>,
    pub medications: Vec<MedicationSummary>,
}

impl PatientRecord {
    /// Khởi tạo hồ sơ rỗng chỉ với mã bệnh nhân.
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            full_name: None,
            date_of_birth: None,
            sex: None,
            insurance_payor: None,
            pcp_name: None,
            contact_phone: None,
            address_display: None,
            marital_status: None,
            preferred_language: None,
            encounters: Vec::new(),
            diagnoses: Vec::new(),
            medications: Vec::new(),
        }
    }

    /// Tuổi của bệnh nhân tại ngày `today`, nếu ngày sinh đọc được.
    pub fn age_on(&self, today: chrono::NaiveDate) -> Option<i32> {
        age_on(self.date_of_birth.as_deref(), today)
    }
}

/// Một lần khám (Encounter) đã rút gọn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncounterSummary {
    /// Giữ nguyên văn bản gốc, không ép định dạng.
    pub date: Option<String>,
    pub visit_type: Option<String>,
    pub facility: Option<String>,
    pub provider: Option<String>,
    pub primary_diagnosis_text: Option<String>,
}

/// Một chẩn đoán (Condition) đã rút gọn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosisSummary {
    pub code: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Một y lệnh thuốc đã rút gọn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicationSummary {
    /// Luôn có giá trị: tên thật hoặc chuỗi chẩn đoán khi không tìm được tên.
    pub name: String,
    pub authored_on: Option<String>,
    pub prescriber: Option<String>,
    pub dosage: Option<String>,
    pub status: Option<String>,
}

/// Lỗi chung khi đọc và chuẩn hóa hồ sơ.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Bundle {bundle_id} không có resource Patient")]
    MissingSubject { bundle_id: String },
    #[error("Không đọc được tài liệu: {0}")]
    Parse(String),
    #[error("Lỗi đọc {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Tham số không hợp lệ: {0}")]
    InvalidArgument(String),
}

pub type ChartResult<T> = Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_fields_serialize_differently() {
        let mut record = PatientRecord::new("p-1");
        record.full_name = Some(String::new());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["full_name"], serde_json::json!(""));
        assert_eq!(value["sex"], serde_json::Value::Null);
    }

    #[test]
    fn missing_subject_message_names_bundle() {
        let err = ChartError::MissingSubject {
            bundle_id: "b-7".into(),
        };
        assert!(err.to_string().contains("b-7"));
    }
}
