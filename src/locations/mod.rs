//! Administrative region directory for the capital area.
//!
//! Built once at startup from the bundled 행정동 dataset and immutable
//! afterwards. Every region triple attached to a listing or post must
//! resolve through this directory.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::errors::AppError;

/// Sido display order on the location selector.
pub const CAPITAL_SIDO: [&str; 3] = ["서울특별시", "인천광역시", "경기도"];

const DATASET: &str = include_str!("../../data/locations_capital.json");

/// One record of the bundled dataset.
#[derive(Debug, Deserialize)]
struct LocationRecord {
    sido: String,
    sigungu: String,
    dong: String,
}

/// sido -> sigungu -> sorted, deduplicated dong list.
#[derive(Debug)]
pub struct LocationDirectory {
    tree: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl LocationDirectory {
    /// Load the bundled capital-region dataset.
    pub fn load() -> Result<Self, AppError> {
        let records: Vec<LocationRecord> = serde_json::from_str(DATASET)
            .map_err(|e| AppError::Internal(format!("location dataset: {}", e)))?;
        Ok(Self::from_records(records))
    }

    fn from_records(records: Vec<LocationRecord>) -> Self {
        let mut tree: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();
        for r in records {
            tree.entry(r.sido)
                .or_default()
                .entry(r.sigungu)
                .or_default()
                .push(r.dong);
        }
        for sigungu_map in tree.values_mut() {
            for dongs in sigungu_map.values_mut() {
                dongs.sort();
                dongs.dedup();
            }
        }
        Self { tree }
    }

    /// Top-level regions in selector order.
    pub fn sido_list(&self) -> Vec<String> {
        CAPITAL_SIDO.iter().map(|s| (*s).to_string()).collect()
    }

    /// Sorted sigungu names for a sido.
    pub fn sigungu_list(&self, sido: &str) -> Result<Vec<String>, AppError> {
        self.tree
            .get(sido)
            .map(|m| m.keys().cloned().collect())
            .ok_or_else(|| AppError::InvalidLocation("잘못된 시/도".to_string()))
    }

    /// Dong names for a sido/sigungu pair.
    pub fn dong_list(&self, sido: &str, sigungu: &str) -> Result<Vec<String>, AppError> {
        let sigungu_map = self
            .tree
            .get(sido)
            .ok_or_else(|| AppError::InvalidLocation("잘못된 시/도".to_string()))?;
        sigungu_map
            .get(sigungu)
            .cloned()
            .ok_or_else(|| AppError::InvalidLocation("잘못된 시/군/구".to_string()))
    }

    /// Validate a full region triple; each level fails with its own message.
    pub fn validate(&self, sido: &str, sigungu: &str, dong: &str) -> Result<(), AppError> {
        let dongs = self.dong_list(sido, sigungu)?;
        if dongs.iter().any(|d| d == dong) {
            Ok(())
        } else {
            Err(AppError::InvalidLocation("잘못된 동".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> LocationDirectory {
        LocationDirectory::load().unwrap()
    }

    #[test]
    fn test_sido_order_is_fixed() {
        assert_eq!(
            directory().sido_list(),
            vec!["서울특별시", "인천광역시", "경기도"]
        );
    }

    #[test]
    fn test_sigungu_sorted() {
        let list = directory().sigungu_list("서울특별시").unwrap();
        let mut sorted = list.clone();
        sorted.sort();
        assert_eq!(list, sorted);
        assert!(list.contains(&"마포구".to_string()));
    }

    #[test]
    fn test_dong_sorted_and_deduplicated() {
        let dongs = directory().dong_list("서울특별시", "마포구").unwrap();
        let mut expected = dongs.clone();
        expected.sort();
        expected.dedup();
        assert_eq!(dongs, expected);
        assert!(dongs.contains(&"망원동".to_string()));
    }

    #[test]
    fn test_validate_good_triple() {
        assert!(directory()
            .validate("서울특별시", "마포구", "망원동")
            .is_ok());
    }

    #[test]
    fn test_validate_fails_per_level() {
        let dir = directory();

        let err = dir.validate("부산광역시", "마포구", "망원동").unwrap_err();
        assert_eq!(err.message(), "잘못된 시/도");

        let err = dir.validate("서울특별시", "없는구", "망원동").unwrap_err();
        assert_eq!(err.message(), "잘못된 시/군/구");

        let err = dir.validate("서울특별시", "마포구", "없는동").unwrap_err();
        assert_eq!(err.message(), "잘못된 동");
    }

    #[test]
    fn test_sigungu_exists_in_other_sido_does_not_leak() {
        // 논현동 exists under both 서울 강남구 and 인천 남동구; lookups stay scoped
        let dir = directory();
        assert!(dir.validate("인천광역시", "남동구", "논현동").is_ok());
        assert!(dir.validate("인천광역시", "부평구", "논현동").is_err());
    }
}
