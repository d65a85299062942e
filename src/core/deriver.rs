use crate::domain::model::{Point, PointId};
use crate::utils::error::{AnalysisError, Result};
use std::collections::HashSet;

/// Reduces a finite sample to its last two integer digits: `|trunc(v)| mod 100`.
pub fn reduce_sample(value: f64) -> u8 {
    (value.trunc().abs() % 100.0) as u8
}

pub fn derive_point(value: f64, ordinal: u32) -> Point {
    let n = reduce_sample(value);
    Point {
        id: PointId::new(ordinal),
        q1: n / 10,
        q2: n % 10,
        n,
    }
}

/// Maps samples to points in input order, assigning `A<start_ordinal + index>`.
pub fn derive_points(samples: &[f64], start_ordinal: u32) -> Result<Vec<Point>> {
    if start_ordinal == 0 {
        return Err(AnalysisError::InvalidOrdinal {
            ordinal: start_ordinal,
        });
    }

    let last = u64::from(start_ordinal) + samples.len() as u64;
    if !samples.is_empty() && last - 1 > u64::from(u32::MAX) {
        return Err(AnalysisError::OrdinalOverflow {
            start: start_ordinal,
            len: samples.len(),
        });
    }

    let mut points = Vec::with_capacity(samples.len());
    for (index, &value) in samples.iter().enumerate() {
        if !value.is_finite() {
            return Err(AnalysisError::NonFiniteSample { index, value });
        }

        // Bounds checked above.
        let point = derive_point(value, start_ordinal + index as u32);
        if f64::from(point.n) != value {
            tracing::debug!("Sample {} normalized to {} for {}", value, point.n, point.id);
        }
        points.push(point);
    }

    ensure_unique_ids(&points)?;
    Ok(points)
}

/// Single linear pass rejecting the first repeated id.
pub fn ensure_unique_ids(points: &[Point]) -> Result<()> {
    let mut seen = HashSet::with_capacity(points.len());
    for point in points {
        if !seen.insert(point.id) {
            return Err(AnalysisError::DuplicateId {
                id: point.id.to_string(),
            });
        }
    }
    Ok(())
}
