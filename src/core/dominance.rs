//! Pairwise dominance between points.
//!
//! Predicates work on criteria slices so they are not tied to the two-criteria
//! [`Point`]. All criteria are maximized. Vectors of different lengths are
//! incomparable and never dominate each other.

use crate::domain::model::{DominationMap, Point, Relation};

/// Signature shared by the dominance predicates: does `a` dominate `b`?
pub type DominancePredicate = fn(&[i64], &[i64]) -> bool;

/// Weakly better on every criterion and strictly better on at least one.
pub fn pareto_dominates<T: PartialOrd>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    let weakly_all = a.iter().zip(b).all(|(x, y)| x >= y);
    let strictly_any = a.iter().zip(b).any(|(x, y)| x > y);
    weakly_all && strictly_any
}

/// Strictly better on every criterion.
pub fn slater_dominates<T: PartialOrd>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    a.iter().zip(b).all(|(x, y)| x > y)
}

impl Relation {
    pub fn predicate(&self) -> DominancePredicate {
        match self {
            Relation::Pareto => pareto_dominates::<i64>,
            Relation::Slater => slater_dominates::<i64>,
        }
    }

    pub fn dominates(&self, a: &Point, b: &Point) -> bool {
        (self.predicate())(&a.criteria(), &b.criteria())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominanceAnalysis {
    pub pareto: DominationMap,
    pub slater: DominationMap,
}

/// Evaluates both relations over every ordered pair of distinct points.
///
/// Ids must be unique; a repeated id aliases the domination sets of the
/// points sharing it.
pub fn analyze(points: &[Point]) -> DominanceAnalysis {
    let pareto = analyze_relation(points, Relation::Pareto);
    let slater = analyze_relation(points, Relation::Slater);

    tracing::debug!(
        "Compared {} ordered pairs across {} points",
        points.len() * points.len().saturating_sub(1),
        points.len()
    );

    DominanceAnalysis { pareto, slater }
}

pub fn analyze_relation(points: &[Point], relation: Relation) -> DominationMap {
    analyze_with(points, relation.predicate())
}

/// Builds a domination map for an arbitrary predicate over criteria vectors.
pub fn analyze_with(points: &[Point], predicate: DominancePredicate) -> DominationMap {
    let mut map = DominationMap::with_keys(points);
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate() {
            if i != j && predicate(&a.criteria(), &b.criteria()) {
                map.insert(b.id, a.id);
            }
        }
    }
    map
}
