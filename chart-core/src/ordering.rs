//! Sắp xếp danh sách lần khám để hiển thị.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{parse_instant, ChartError, EncounterSummary};

/// Khóa sắp xếp lần khám.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
}

impl FromStr for SortKey {
    type Err = ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            other => Err(ChartError::InvalidArgument(format!(
                "khóa sắp xếp không hỗ trợ: {other}"
            ))),
        }
    }
}

/// Chiều sắp xếp, mặc định giảm dần (mới nhất trước).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl FromStr for SortDirection {
    type Err = ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(ChartError::InvalidArgument(format!(
                "chiều sắp xếp không hỗ trợ: {other}"
            ))),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

/// Cấu hình thứ tự hiển thị lần khám.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncounterOrder {
    #[serde(default)]
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl EncounterOrder {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Mốc so sánh của một lần khám.
    ///
    /// Ngày thiếu hoặc hỏng nhận giá trị biên sao cho luôn nằm cuối danh sách,
    /// bất kể chiều sắp xếp.
    fn instant_of(&self, encounter: &EncounterSummary) -> DateTime<Utc> {
        let parsed = match self.key {
            SortKey::Date => encounter.date.as_deref().and_then(parse_instant),
        };
        parsed.unwrap_or(match self.direction {
            SortDirection::Ascending => DateTime::<Utc>::MAX_UTC,
            SortDirection::Descending => DateTime::<Utc>::MIN_UTC,
        })
    }

    fn compare(&self, a: &DateTime<Utc>, b: &DateTime<Utc>) -> Ordering {
        match self.direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => b.cmp(a),
        }
    }
}

/// Trả về các lần khám theo thứ tự hiển thị, không sửa dữ liệu gốc.
///
/// Sắp xếp ổn định: các phần tử bằng nhau (kể cả các phần tử mang giá trị
/// biên) giữ nguyên thứ tự tương đối ban đầu.
pub fn ordered_encounters(
    encounters: &[EncounterSummary],
    order: EncounterOrder,
) -> Vec<&EncounterSummary> {
    let mut keyed: Vec<(DateTime<Utc>, &EncounterSummary)> = encounters
        .iter()
        .map(|encounter| (order.instant_of(encounter), encounter))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| order.compare(a, b));
    keyed.into_iter().map(|(_, encounter)| encounter).collect()
}
