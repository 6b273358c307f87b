use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use starpaths::graph::explorer::explore_path;
use starpaths::{distance, CatalogConfig, CatalogIndex, StarRecord, VisitPolicy};

const TOLERANCE: f64 = 1e-9;

fn arb_catalog() -> impl Strategy<Value = (Vec<StarRecord>, f64)> {
    (
        prop::collection::vec((0.0f64..360.0, -90.0f64..90.0, 0.01f64..3.0), 1..7),
        0.5f64..2.5,
    )
        .prop_map(|(coords, jump)| {
            let mut stars = vec![StarRecord::new("0", 0.0, 0.0, 0.0).unwrap().with_proper("Sol")];
            stars.extend(coords.into_iter().enumerate().map(|(i, (ra, dec, dist))| {
                StarRecord::new((i + 1).to_string(), ra, dec, dist).unwrap()
            }));
            (stars, jump)
        })
}

fn reachable(index: &CatalogIndex, origin: usize) -> HashSet<usize> {
    let mut seen = HashSet::from([origin]);
    let mut queue = VecDeque::from([origin]);
    while let Some(star) = queue.pop_front() {
        for n in index.neighbours(star) {
            if seen.insert(n.index) {
                queue.push_back(n.index);
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn neighbour_lists_match_jump_range((stars, jump) in arb_catalog()) {
        let index = CatalogIndex::build(stars, CatalogConfig::new(jump, 4.0).unwrap());
        let stars = index.stars();
        for i in 0..index.len() {
            let listed: HashSet<usize> = index.neighbours(i).iter().map(|n| n.index).collect();
            prop_assert!(!listed.contains(&i));
            for j in 0..index.len() {
                if i == j {
                    continue;
                }
                let d = distance(&stars[i], &stars[j]);
                if listed.contains(&j) {
                    prop_assert!(d <= jump + TOLERANCE);
                } else {
                    prop_assert!(d > jump - TOLERANCE);
                }
            }
        }
    }

    #[test]
    fn found_paths_are_valid_and_complete((stars, jump) in arb_catalog()) {
        let index = CatalogIndex::build(stars, CatalogConfig::new(jump, 4.0).unwrap());
        for origin in 0..index.len() {
            let reach = reachable(&index, origin);
            for target in 0..index.len() {
                let path = explore_path(&index, origin, target, VisitPolicy::CopyOnBranch);
                prop_assert_eq!(
                    &path,
                    &explore_path(&index, origin, target, VisitPolicy::Backtrack)
                );
                prop_assert_eq!(path.is_some(), reach.contains(&target));

                if let Some(path) = path {
                    prop_assert_eq!(path.first(), Some(&origin));
                    prop_assert_eq!(path.last(), Some(&target));
                    let unique: HashSet<&usize> = path.iter().collect();
                    prop_assert_eq!(unique.len(), path.len());
                    for pair in path.windows(2) {
                        prop_assert!(index.neighbours(pair[0]).iter().any(|n| n.index == pair[1]));
                    }
                }
            }
        }
    }
}
