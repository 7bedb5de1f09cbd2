use crate::domain::model::Office;
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::validate_non_empty_string;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

const EMBEDDED_OFFICES: &str = include_str!("offices.toml");

#[derive(Debug, Deserialize)]
struct OfficeList {
    offices: Vec<Office>,
}

/// Fixed, validated set of offices in insertion order.
///
/// Construction is the only place the invariants are checked: the list is
/// non-empty, ids are unique and every coordinate is finite and in range.
/// Nothing can mutate the registry afterwards.
#[derive(Debug, Clone)]
pub struct OfficeRegistry {
    offices: Vec<Arc<Office>>,
}

impl OfficeRegistry {
    pub fn new(offices: Vec<Office>) -> Result<Self> {
        if offices.is_empty() {
            return Err(LocatorError::EmptyRegistry);
        }

        let mut seen = HashSet::with_capacity(offices.len());
        for office in &offices {
            validate_non_empty_string("offices.id", &office.id)?;

            if !seen.insert(office.id.as_str()) {
                return Err(LocatorError::DuplicateOfficeId {
                    id: office.id.clone(),
                });
            }

            let coordinate = office.coordinate();
            if !coordinate.latitude.is_finite()
                || !coordinate.longitude.is_finite()
                || !coordinate.is_within_bounds()
            {
                return Err(LocatorError::InvalidOfficeCoordinate {
                    id: office.id.clone(),
                    latitude: office.latitude,
                    longitude: office.longitude,
                });
            }
        }

        tracing::debug!("Office registry loaded with {} offices", offices.len());

        Ok(Self {
            offices: offices.into_iter().map(Arc::new).collect(),
        })
    }

    /// The registry bundled with the crate.
    pub fn embedded() -> Result<Self> {
        let list: OfficeList =
            toml::from_str(EMBEDDED_OFFICES).map_err(|e| LocatorError::ConfigValidationError {
                field: "offices".to_string(),
                message: format!("Embedded office list is not valid TOML: {}", e),
            })?;
        Self::new(list.offices)
    }

    /// First-listed office; used whenever no coordinate is available.
    pub fn default_office(&self) -> &Arc<Office> {
        // non-empty by construction
        &self.offices[0]
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Office>> {
        self.offices.iter().find(|office| office.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Office>> {
        self.offices.iter()
    }

    pub fn len(&self) -> usize {
        self.offices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office(id: &str, latitude: f64, longitude: f64) -> Office {
        Office {
            id: id.to_string(),
            city: id.to_string(),
            state: "State".to_string(),
            phone: "+91-00-0000000".to_string(),
            email: format!("{}@example.com", id),
            address: "Somewhere".to_string(),
            latitude,
            longitude,
            projects: vec![],
        }
    }

    #[test]
    fn test_embedded_registry_order() {
        let registry = OfficeRegistry::embedded().unwrap();
        let ids: Vec<&str> = registry.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["mumbai", "delhi", "bangalore", "chennai"]);
        assert_eq!(registry.default_office().city, "Mumbai");
        assert_eq!(registry.get("chennai").unwrap().projects.len(), 2);
        assert!(registry.get("pune").is_none());
    }

    #[test]
    fn test_empty_registry_is_rejected() {
        assert!(matches!(
            OfficeRegistry::new(vec![]),
            Err(LocatorError::EmptyRegistry)
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = OfficeRegistry::new(vec![office("a", 1.0, 1.0), office("a", 2.0, 2.0)]);
        match result {
            Err(LocatorError::DuplicateOfficeId { id }) => assert_eq!(id, "a"),
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_coordinates_are_rejected() {
        assert!(OfficeRegistry::new(vec![office("a", 95.0, 1.0)]).is_err());
        assert!(OfficeRegistry::new(vec![office("a", 1.0, -181.0)]).is_err());
        assert!(OfficeRegistry::new(vec![office("a", f64::NAN, 1.0)]).is_err());
    }

    #[test]
    fn test_blank_id_is_rejected() {
        assert!(matches!(
            OfficeRegistry::new(vec![office("  ", 1.0, 1.0)]),
            Err(LocatorError::InvalidConfigValueError { .. })
        ));
    }
}
