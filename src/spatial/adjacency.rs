use serde::{Deserialize, Serialize};

use crate::spatial::distance::distance;
use crate::star::StarRecord;

/// A star reachable in one jump, with the jump length in parsecs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Neighbour {
    /// Index of the neighbour in the catalog's star list.
    pub index: usize,
    pub distance: f64,
}

/// Stars within `jump_range_pc` of `stars[origin]`, in catalog order.
///
/// The origin is excluded by position, so distinct stars that happen to
/// share a display name still see each other. When the origin is the
/// reference star and sits at the catalog's zero point, its neighbours'
/// `dist` column is used directly.
pub(crate) fn neighbours_within(
    stars: &[StarRecord],
    origin: usize,
    jump_range_pc: f64,
    reference_name: &str,
) -> Vec<Neighbour> {
    let origin_star = &stars[origin];
    // `dist` is measured from the zero point, so it is a jump length only from there
    let from_reference = origin_star.dist == 0.0
        && origin_star.display_name().as_deref() == Some(reference_name);

    stars
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != origin)
        .filter_map(|(index, star)| {
            let d = if from_reference {
                star.dist
            } else {
                distance(origin_star, star)
            };
            (d <= jump_range_pc).then_some(Neighbour { index, distance: d })
        })
        .collect()
}
