//! The static region dataset a quiz draws from.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{QuizError, QuizResult};
use crate::region::Region;

/// Bundled dataset: the 96 metropolitan French départements.
const BUILTIN_GEOJSON: &str = include_str!("../data/departements.geojson");

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Deserialize)]
struct FeatureProperties {
    code: String,
    nom: String,
    #[serde(default)]
    prefecture: Option<String>,
}

/// Read-only list of every region that can be played.
#[derive(Debug, Clone)]
pub struct RegionPool {
    regions: Vec<Region>,
}

impl RegionPool {
    /// Build a pool from regions. Codes must be unique and the pool non-empty.
    pub fn new(regions: Vec<Region>) -> QuizResult<Self> {
        if regions.is_empty() {
            return Err(QuizError::Dataset("region pool is empty".into()));
        }
        let mut seen = HashSet::new();
        for region in &regions {
            if !seen.insert(region.code.as_str()) {
                return Err(QuizError::Dataset(format!(
                    "duplicate region code \"{}\"",
                    region.code
                )));
            }
        }
        let regions = regions
            .into_iter()
            .map(|mut r| {
                r.reset(true);
                r
            })
            .collect();
        Ok(Self { regions })
    }

    /// Parse a GeoJSON `FeatureCollection` whose properties carry `code` and `nom`.
    ///
    /// Geometry is ignored.
    pub fn from_geojson(source: &str) -> QuizResult<Self> {
        let collection: FeatureCollection =
            serde_json::from_str(source).map_err(|e| QuizError::Dataset(e.to_string()))?;
        let regions = collection
            .features
            .into_iter()
            .map(|f| {
                let props = f.properties;
                let region = Region::new(props.code, props.nom);
                match props.prefecture {
                    Some(p) => region.with_prefecture(p),
                    None => region,
                }
            })
            .collect();
        Self::new(regions)
    }

    /// The bundled département dataset.
    pub fn builtin() -> QuizResult<Self> {
        Self::from_geojson(BUILTIN_GEOJSON)
    }

    /// All regions in dataset order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Look up a region by code.
    pub fn get(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == code)
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Always false: a pool is never empty.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_96_departements() {
        let pool = RegionPool::builtin().unwrap();
        assert_eq!(pool.len(), 96);
        assert_eq!(pool.get("75").unwrap().name, "Paris");
        assert_eq!(pool.get("2A").unwrap().name, "Corse-du-Sud");
        assert_eq!(
            pool.get("33").unwrap().prefecture.as_deref(),
            Some("Bordeaux")
        );
        assert!(pool.regions().iter().all(Region::is_open));
    }

    #[test]
    fn parses_geojson_with_geometry() {
        let src = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"code": "01", "nom": "Ain"},
                 "geometry": {"type": "Polygon", "coordinates": [[[5.0, 46.0], [5.1, 46.1], [5.0, 46.0]]]}},
                {"type": "Feature", "properties": {"code": "02", "nom": "Aisne", "prefecture": "Laon"},
                 "geometry": null}
            ]
        }"#;
        let pool = RegionPool::from_geojson(src).unwrap();
        assert_eq!(pool.len(), 2);
        assert!(pool.get("01").unwrap().prefecture.is_none());
        assert_eq!(pool.get("02").unwrap().prefecture.as_deref(), Some("Laon"));
    }

    #[test]
    fn rejects_duplicate_codes() {
        let err = RegionPool::new(vec![Region::new("01", "Ain"), Region::new("01", "Ain")])
            .unwrap_err();
        assert!(matches!(err, QuizError::Dataset(_)));
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(RegionPool::new(Vec::new()).is_err());
        assert!(RegionPool::from_geojson("not json").is_err());
        assert!(RegionPool::from_geojson(r#"{"features": []}"#).is_err());
    }
}
