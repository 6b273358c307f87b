//! Depth-first path search over a [`CatalogIndex`]'s precomputed neighbours.
//!
//! Both searches keep their own frame stack instead of recursing, so path
//! length is bounded by memory rather than the call stack. Neighbours are
//! tried in catalog order and a star is skipped only while it is on the
//! active path; a star abandoned by one branch may be revisited by another.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::EnumerationLimits;
use crate::graph::catalog::CatalogIndex;

/// How the set of stars on the active path is maintained.
///
/// Both policies visit the same stars in the same order and return the same
/// paths; they differ in memory and copying cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitPolicy {
    /// One shared set, marked on descent and cleared on backtrack.
    #[default]
    Backtrack,
    /// Every descent works on its own copy of the parent's set.
    CopyOnBranch,
}

trait Visited {
    fn enter(&mut self, star: usize);
    fn leave(&mut self, star: usize);
    fn contains(&self, star: usize) -> bool;
}

struct SharedMarks {
    marks: Vec<bool>,
}

impl SharedMarks {
    fn new(len: usize) -> Self {
        SharedMarks {
            marks: vec![false; len],
        }
    }
}

impl Visited for SharedMarks {
    fn enter(&mut self, star: usize) {
        self.marks[star] = true;
    }

    fn leave(&mut self, star: usize) {
        self.marks[star] = false;
    }

    fn contains(&self, star: usize) -> bool {
        self.marks[star]
    }
}

#[derive(Default)]
struct BranchCopies {
    sets: Vec<HashSet<usize>>,
}

impl Visited for BranchCopies {
    fn enter(&mut self, star: usize) {
        let mut set = self.sets.last().cloned().unwrap_or_default();
        set.insert(star);
        self.sets.push(set);
    }

    fn leave(&mut self, _star: usize) {
        self.sets.pop();
    }

    fn contains(&self, star: usize) -> bool {
        self.sets.last().is_some_and(|set| set.contains(&star))
    }
}

struct Frame {
    star: usize,
    /// Next position to try in this star's neighbour list.
    cursor: usize,
    descended: bool,
}

impl Frame {
    fn new(star: usize) -> Self {
        Frame {
            star,
            cursor: 0,
            descended: false,
        }
    }
}

/// Advance `frame` to its next neighbour that is not on the active path.
fn next_unvisited<V: Visited>(
    index: &CatalogIndex,
    frame: &mut Frame,
    visited: &V,
) -> Option<usize> {
    let neighbours = index.neighbours(frame.star);
    let offset = neighbours[frame.cursor..]
        .iter()
        .position(|n| !visited.contains(n.index))?;
    let next = neighbours[frame.cursor + offset].index;
    frame.cursor += offset + 1;
    Some(next)
}

/// First path from `origin` to `target` in neighbour order, as star indices.
///
/// Returns `None` when `target` is unreachable. Proving that can take time
/// exponential in the size of `origin`'s connected component.
pub fn explore_path(
    index: &CatalogIndex,
    origin: usize,
    target: usize,
    policy: VisitPolicy,
) -> Option<Vec<usize>> {
    match policy {
        VisitPolicy::Backtrack => search(index, origin, target, SharedMarks::new(index.len())),
        VisitPolicy::CopyOnBranch => search(index, origin, target, BranchCopies::default()),
    }
}

fn search<V: Visited>(
    index: &CatalogIndex,
    origin: usize,
    target: usize,
    mut visited: V,
) -> Option<Vec<usize>> {
    if origin == target {
        return Some(vec![origin]);
    }

    visited.enter(origin);
    let mut stack = vec![Frame::new(origin)];

    while let Some(frame) = stack.last_mut() {
        match next_unvisited(index, frame, &visited) {
            Some(next) if next == target => {
                let mut path: Vec<usize> = stack.iter().map(|f| f.star).collect();
                path.push(target);
                return Some(path);
            }
            Some(next) => {
                visited.enter(next);
                stack.push(Frame::new(next));
            }
            None => {
                if let Some(done) = stack.pop() {
                    visited.leave(done.star);
                }
            }
        }
    }

    None
}

/// Every branch from `start` that runs into a star with no neighbours.
///
/// `limits` can cut branches at a depth, stop after a number of recorded
/// paths, or also record branches that only end because all neighbours are
/// already on the path. Paths are returned in discovery order.
pub fn star_paths(
    index: &CatalogIndex,
    start: usize,
    limits: &EnumerationLimits,
    policy: VisitPolicy,
) -> Vec<Vec<usize>> {
    match policy {
        VisitPolicy::Backtrack => enumerate(index, start, limits, SharedMarks::new(index.len())),
        VisitPolicy::CopyOnBranch => enumerate(index, start, limits, BranchCopies::default()),
    }
}

fn enumerate<V: Visited>(
    index: &CatalogIndex,
    start: usize,
    limits: &EnumerationLimits,
    mut visited: V,
) -> Vec<Vec<usize>> {
    let mut paths: Vec<Vec<usize>> = Vec::new();
    let mut path: Vec<usize> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut pending = Some(start);
    let full = |paths: &Vec<Vec<usize>>| limits.max_paths.is_some_and(|max| paths.len() >= max);

    if full(&paths) {
        return paths;
    }

    loop {
        if let Some(star) = pending.take() {
            visited.enter(star);
            path.push(star);
            let at_depth = limits.max_depth.is_some_and(|max| path.len() >= max);
            if index.neighbours(star).is_empty() || at_depth {
                paths.push(path.clone());
                if full(&paths) {
                    break;
                }
                path.pop();
                visited.leave(star);
            } else {
                stack.push(Frame::new(star));
            }
        }

        let Some(frame) = stack.last_mut() else {
            break;
        };
        match next_unvisited(index, frame, &visited) {
            Some(next) => {
                frame.descended = true;
                pending = Some(next);
            }
            None => {
                let exhausted = !frame.descended;
                let star = frame.star;
                stack.pop();
                if exhausted && limits.record_exhausted {
                    paths.push(path.clone());
                    if full(&paths) {
                        break;
                    }
                }
                path.pop();
                visited.leave(star);
            }
        }
    }

    paths
}
