//! Danh bạ hồ sơ trong bộ nhớ phục vụ tra cứu.

use crate::PatientRecord;

/// Tập hồ sơ đã nạp. Mỗi lần nạp lại sẽ dựng mới toàn bộ.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientDirectory {
    records: Vec<PatientRecord>,
}

impl PatientDirectory {
    pub fn new(records: Vec<PatientRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Tìm đúng theo mã bệnh nhân.
    pub fn find_by_id(&self, subject_id: &str) -> Option<&PatientRecord> {
        self.records
            .iter()
            .find(|record| record.subject_id == subject_id)
    }

    /// Tìm theo mã (khớp tuyệt đối) hoặc theo tên (chuỗi con, không phân biệt hoa thường).
    ///
    /// Truy vấn rỗng không trả về kết quả nào.
    pub fn search(&self, query: &str) -> Vec<&PatientRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|record| {
                record.subject_id == query
                    || record
                        .full_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

impl FromIterator<PatientRecord> for PatientDirectory {
    fn from_iter<I: IntoIterator<Item = PatientRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: Option<&str>) -> PatientRecord {
        let mut record = PatientRecord::new(id);
        record.full_name = name.map(str::to_string);
        record
    }

    fn directory() -> PatientDirectory {
        [
            record("patient-001", Some("Walter White")),
            record("patient-002", Some("Jesse Bruce Pinkman")),
            record("patient-003", Some("Skyler White (née Lambert)")),
            record("patient-004", None),
        ]
        .into_iter()
        .collect()
    }

    fn ids<'a>(found: &[&'a PatientRecord]) -> Vec<&'a str> {
        found.iter().map(|r| r.subject_id.as_str()).collect()
    }

    #[test]
    fn search_by_exact_id() {
        let dir = directory();
        assert_eq!(ids(&dir.search("patient-001")), vec!["patient-001"]);
        assert!(dir.search("patient-999").is_empty());
    }

    #[test]
    fn search_by_name_is_case_insensitive_substring() {
        let dir = directory();
        assert_eq!(
            ids(&dir.search("white")),
            vec!["patient-001", "patient-003"]
        );
        assert_eq!(ids(&dir.search("WALTER white")), vec!["patient-001"]);
        assert!(dir.search("Gus Fring").is_empty());
    }

    #[test]
    fn blank_query_finds_nothing() {
        assert!(directory().search("   ").is_empty());
    }

    #[test]
    fn find_by_id_requires_exact_match() {
        let dir = directory();
        assert!(dir.find_by_id("patient-002").is_some());
        assert!(dir.find_by_id("patient-00").is_none());
        assert_eq!(dir.len(), 4);
    }
}
