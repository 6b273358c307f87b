use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{CatalogConfig, EnumerationLimits};
use crate::error::{Error, Result};
use crate::graph::explorer::{explore_path, star_paths, VisitPolicy};
use crate::spatial::adjacency::{neighbours_within, Neighbour};
use crate::star::StarRecord;

/// Stars within the catalog cutoff, sorted by distance from the reference
/// origin, with every star's one-jump neighbours precomputed.
///
/// Built once and read-only afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogIndex {
    config: CatalogConfig,
    stars: Vec<StarRecord>,
    /// neighbours[i] lists the stars one jump from stars[i]
    neighbours: Vec<Vec<Neighbour>>,
    #[serde(skip)]
    name_index: HashMap<String, usize>,
    #[serde(skip)]
    id_index: HashMap<String, usize>,
}

impl CatalogIndex {
    /// Filter, sort and link `stars`. This is quadratic in the number of
    /// retained stars.
    pub fn build<I>(stars: I, config: CatalogConfig) -> Self
    where
        I: IntoIterator<Item = StarRecord>,
    {
        let mut stars: Vec<StarRecord> = stars
            .into_iter()
            .filter(|star| star.dist <= config.catalog_cutoff_pc)
            .collect();
        stars.sort_by(|a, b| a.dist.total_cmp(&b.dist));

        let neighbours: Vec<Vec<Neighbour>> = (0..stars.len())
            .map(|origin| {
                neighbours_within(&stars, origin, config.jump_range_pc, &config.reference_name)
            })
            .collect();

        let links: usize = neighbours.iter().map(Vec::len).sum();
        info!(
            "{} stars within {} parsecs of {} ({} directed links at {} pc)",
            stars.len(),
            config.catalog_cutoff_pc,
            config.reference_name,
            links,
            config.jump_range_pc
        );

        let mut index = CatalogIndex {
            config,
            stars,
            neighbours,
            name_index: HashMap::new(),
            id_index: HashMap::new(),
        };
        index.rebuild_indices();
        match index.index_of_name(&index.config.reference_name) {
            None => warn!(
                "reference origin {} is not in the catalog",
                index.config.reference_name
            ),
            Some(i) if index.stars[i].dist != 0.0 => warn!(
                "reference origin {} is {} pc from the catalog zero point",
                index.config.reference_name, index.stars[i].dist
            ),
            Some(_) => {}
        }
        index
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn stars(&self) -> &[StarRecord] {
        &self.stars
    }

    pub fn star(&self, index: usize) -> Option<&StarRecord> {
        self.stars.get(index)
    }

    /// Precomputed one-jump neighbours, in catalog order.
    pub fn neighbours(&self, index: usize) -> &[Neighbour] {
        self.neighbours
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First star, in catalog order, whose display name is `name`.
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.id_index.get(id).copied()
    }

    /// Index of the reference origin.
    pub fn reference(&self) -> Result<usize> {
        self.lookup(&self.config.reference_name)
    }

    pub fn lookup(&self, name: &str) -> Result<usize> {
        self.index_of_name(name).ok_or_else(|| Error::NotFound {
            name: name.to_string(),
        })
    }

    /// Labels of a jump path from `origin_name` to `target_name`, or `None`
    /// when the target cannot be reached.
    ///
    /// The first path found in neighbour order is returned; it is not
    /// necessarily the shortest.
    pub fn find_path(&self, origin_name: &str, target_name: &str) -> Result<Option<Vec<String>>> {
        self.find_path_with(origin_name, target_name, VisitPolicy::CopyOnBranch)
    }

    pub fn find_path_with(
        &self,
        origin_name: &str,
        target_name: &str,
        policy: VisitPolicy,
    ) -> Result<Option<Vec<String>>> {
        let origin = self.lookup(origin_name)?;
        let target = self.lookup(target_name)?;
        let path = explore_path(self, origin, target, policy);
        match &path {
            Some(path) => debug!(
                "path {} -> {}: {} jumps",
                origin_name,
                target_name,
                path.len() - 1
            ),
            None => debug!("no path {} -> {}", origin_name, target_name),
        }
        Ok(path.map(|path| self.labels(&path)))
    }

    /// Every dead-end branch reachable from the reference origin, bounded by
    /// the configured enumeration limits.
    pub fn enumerate_all_paths(&self) -> Result<Vec<Vec<&StarRecord>>> {
        self.enumerate_all_paths_with(VisitPolicy::Backtrack)
    }

    pub fn enumerate_all_paths_with(&self, policy: VisitPolicy) -> Result<Vec<Vec<&StarRecord>>> {
        self.enumerate_paths(&self.config.enumeration, policy)
    }

    /// [`enumerate_all_paths`](Self::enumerate_all_paths) with limits other
    /// than the configured ones.
    pub fn enumerate_paths(
        &self,
        limits: &EnumerationLimits,
        policy: VisitPolicy,
    ) -> Result<Vec<Vec<&StarRecord>>> {
        let start = self.reference()?;
        let paths = star_paths(self, start, limits, policy);
        debug!("enumerated {} paths from {}", paths.len(), self.config.reference_name);
        Ok(paths
            .iter()
            .map(|path| path.iter().map(|&i| &self.stars[i]).collect())
            .collect())
    }

    pub fn labels(&self, path: &[usize]) -> Vec<String> {
        path.iter().map(|&i| self.stars[i].label()).collect()
    }

    /// Recreate the lookup tables skipped by serialization.
    pub fn rebuild_indices(&mut self) {
        self.name_index.clear();
        self.id_index.clear();
        for (idx, star) in self.stars.iter().enumerate() {
            if let Some(name) = star.display_name() {
                if self.name_index.contains_key(&name) {
                    warn!("duplicate display name {name}; lookups resolve to the nearer star");
                } else {
                    self.name_index.insert(name, idx);
                }
            }
            self.id_index.entry(star.id.clone()).or_insert(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(id: &str, ra: f64, dec: f64, dist: f64, name: &str) -> StarRecord {
        StarRecord::new(id, ra, dec, dist).unwrap().with_proper(name)
    }

    fn triangle() -> CatalogIndex {
        CatalogIndex::build(
            vec![
                star("2", 90.0, 0.0, 1.5, "C"),
                star("1", 0.0, 0.0, 1.5, "B"),
                star("0", 0.0, 0.0, 0.0, "Sol"),
            ],
            CatalogConfig::new(2.0, 4.0).unwrap(),
        )
    }

    fn names(index: &CatalogIndex, star: usize) -> Vec<String> {
        index
            .neighbours(star)
            .iter()
            .map(|n| index.stars()[n.index].label())
            .collect()
    }

    #[test]
    fn build_sorts_by_catalog_distance() {
        let index = triangle();
        let ids: Vec<&str> = index.stars().iter().map(|s| s.id.as_str()).collect();
        // equal distances keep input order
        assert_eq!(ids, vec!["0", "2", "1"]);
    }

    #[test]
    fn build_populates_neighbours() {
        let index = triangle();
        let sol = index.reference().unwrap();
        assert_eq!(names(&index, sol), vec!["C", "B"]);
        assert_eq!(names(&index, index.lookup("B").unwrap()), vec!["Sol"]);
        assert_eq!(names(&index, index.lookup("C").unwrap()), vec!["Sol"]);
    }

    #[test]
    fn build_applies_catalog_cutoff() {
        let index = CatalogIndex::build(
            vec![
                star("0", 0.0, 0.0, 0.0, "Sol"),
                star("1", 10.0, 10.0, 3.9, "Near"),
                star("2", 10.0, 10.0, 4.0, "Edge"),
                star("3", 10.0, 10.0, 4.1, "Far"),
            ],
            CatalogConfig::new(2.0, 4.0).unwrap(),
        );
        assert_eq!(index.len(), 3);
        assert!(index.index_of_name("Edge").is_some());
        assert!(index.index_of_name("Far").is_none());
    }

    #[test]
    fn reference_away_from_zero_point_keeps_links_in_range() {
        let config = CatalogConfig {
            reference_name: "A".to_string(),
            ..CatalogConfig::new(2.0, 4.0).unwrap()
        };
        let index = CatalogIndex::build(
            vec![
                star("0", 0.0, 0.0, 0.0, "Sol"),
                star("1", 0.0, 0.0, 1.0, "A"),
                star("2", 180.0, 0.0, 1.5, "B"),
            ],
            config,
        );
        let a = index.reference().unwrap();
        assert_eq!(names(&index, a), vec!["Sol"]);
        assert!((index.neighbours(a)[0].distance - 1.0).abs() < 1e-12);
        assert_eq!(names(&index, index.lookup("B").unwrap()), vec!["Sol"]);
        assert_eq!(
            index.find_path("A", "B").unwrap(),
            Some(vec!["A".to_string(), "Sol".to_string(), "B".to_string()])
        );
    }

    #[test]
    fn out_of_range_index_has_no_neighbours() {
        let index = triangle();
        assert!(index.neighbours(index.len()).is_empty());
        assert!(index.star(index.len()).is_none());
    }

    #[test]
    fn missing_reference_is_not_found() {
        let index = CatalogIndex::build(
            vec![star("1", 0.0, 0.0, 1.0, "B")],
            CatalogConfig::default(),
        );
        assert!(matches!(index.reference(), Err(Error::NotFound { name }) if name == "Sol"));
        assert!(index.enumerate_all_paths().is_err());

        let empty = CatalogIndex::build(Vec::new(), CatalogConfig::default());
        assert!(empty.is_empty());
        assert!(matches!(empty.reference(), Err(Error::NotFound { .. })));
    }

    #[test]
    fn find_path_through_reference() {
        let index = triangle();
        assert_eq!(
            index.find_path("Sol", "C").unwrap(),
            Some(vec!["Sol".to_string(), "C".to_string()])
        );
        assert_eq!(
            index.find_path("B", "C").unwrap(),
            Some(vec!["B".to_string(), "Sol".to_string(), "C".to_string()])
        );
        assert_eq!(
            index.find_path("C", "C").unwrap(),
            Some(vec!["C".to_string()])
        );
    }

    #[test]
    fn find_path_unknown_name() {
        let index = triangle();
        let err = index.find_path("Sol", "Vega").unwrap_err();
        assert!(matches!(err, Error::NotFound { name } if name == "Vega"));
        assert!(index.find_path("Vega", "Sol").is_err());
    }

    #[test]
    fn find_path_unreachable_is_none() {
        let index = CatalogIndex::build(
            vec![
                star("0", 0.0, 0.0, 0.0, "Sol"),
                star("1", 0.0, 0.0, 1.0, "B"),
                star("2", 180.0, 0.0, 3.5, "Lonely"),
            ],
            CatalogConfig::new(2.0, 4.0).unwrap(),
        );
        assert_eq!(index.find_path("Sol", "Lonely").unwrap(), None);
        assert_eq!(index.find_path("B", "Lonely").unwrap(), None);
    }

    #[test]
    fn id_and_duplicate_name_lookup() {
        let index = CatalogIndex::build(
            vec![
                star("0", 0.0, 0.0, 0.0, "Sol"),
                star("far-twin", 40.0, 0.0, 1.8, "Twin"),
                star("near-twin", 20.0, 0.0, 1.2, "Twin"),
            ],
            CatalogConfig::default(),
        );
        let near = index.index_of_id("near-twin").unwrap();
        let far = index.index_of_id("far-twin").unwrap();
        assert_eq!(index.index_of_name("Twin"), Some(near));
        // same name, still linked to each other
        assert!(index.neighbours(near).iter().any(|n| n.index == far));
    }

    #[test]
    fn enumerate_from_isolated_reference() {
        let index = CatalogIndex::build(
            vec![
                star("0", 0.0, 0.0, 0.0, "Sol"),
                star("1", 0.0, 0.0, 3.0, "Distant"),
            ],
            CatalogConfig::new(2.0, 4.0).unwrap(),
        );
        let paths = index.enumerate_all_paths().unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 1);
        assert_eq!(paths[0][0].label(), "Sol");
    }
}
