use crate::core::deriver::{derive_points, ensure_unique_ids};
use crate::core::dominance::analyze;
use crate::core::front::extract_front;
use crate::domain::model::{BlockAnalysis, BlockInput, Point, Relation};
use crate::utils::error::Result;

/// Derives points from the block's samples and runs the full analysis.
pub fn analyze_block(input: &BlockInput) -> Result<BlockAnalysis> {
    let points = derive_points(&input.samples, input.start_ordinal)?;
    tracing::debug!(
        "Derived {} points for '{}' starting at A{}",
        points.len(),
        input.label,
        input.start_ordinal
    );
    Ok(analyze_derived(&input.label, points))
}

/// Runs the analysis over points built elsewhere. Ids must be unique.
pub fn analyze_points(label: &str, points: Vec<Point>) -> Result<BlockAnalysis> {
    ensure_unique_ids(&points)?;
    Ok(analyze_derived(label, points))
}

fn analyze_derived(label: &str, points: Vec<Point>) -> BlockAnalysis {
    let dominance = analyze(&points);
    let pareto_front = extract_front(&dominance.pareto, Relation::Pareto);
    let slater_front = extract_front(&dominance.slater, Relation::Slater);

    tracing::debug!(
        "'{}': Pareto front {} of {}, Slater front {} of {}",
        label,
        pareto_front.len(),
        points.len(),
        slater_front.len(),
        points.len()
    );

    BlockAnalysis {
        label: label.to_string(),
        points,
        pareto_map: dominance.pareto,
        slater_map: dominance.slater,
        pareto_front,
        slater_front,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deriver::derive_point;
    use crate::domain::model::PointId;
    use crate::utils::error::AnalysisError;

    fn block(samples: &[f64], start: u32) -> BlockInput {
        BlockInput {
            label: "Row1".to_string(),
            samples: samples.to_vec(),
            start_ordinal: start,
        }
    }

    #[test]
    fn test_analyze_block_reference_scenario() {
        let analysis = analyze_block(&block(&[52.0, 21.0, 93.0], 1)).unwrap();

        assert_eq!(analysis.label, "Row1");
        assert_eq!(analysis.points.len(), 3);
        assert_eq!(analysis.front(Relation::Pareto).joined(), "A3");
        assert_eq!(analysis.front(Relation::Slater).joined(), "A3");
        assert_eq!(analysis.last_ordinal(), Some(3));
        assert_eq!(analysis.point(PointId::new(2)).map(|p| p.n), Some(21));
    }

    #[test]
    fn test_single_point_is_its_own_front() {
        let analysis = analyze_block(&block(&[47.0], 5)).unwrap();
        assert_eq!(analysis.pareto_front.joined(), "A5");
        assert_eq!(analysis.slater_front.joined(), "A5");
    }

    #[test]
    fn test_empty_block() {
        let analysis = analyze_block(&block(&[], 1)).unwrap();
        assert!(analysis.pareto_map.is_empty());
        assert!(analysis.slater_map.is_empty());
        assert!(analysis.pareto_front.is_empty());
        assert!(analysis.slater_front.is_empty());
        assert_eq!(analysis.last_ordinal(), None);
    }

    #[test]
    fn test_analyze_points_rejects_duplicate_ids() {
        let points = vec![derive_point(52.0, 1), derive_point(21.0, 1)];
        let err = analyze_points("dup", points).unwrap_err();
        assert!(matches!(err, AnalysisError::DuplicateId { .. }));
    }

    #[test]
    fn test_analyze_block_propagates_malformed_input() {
        assert!(analyze_block(&block(&[f64::NAN], 1)).is_err());
        assert!(analyze_block(&block(&[1.0], 0)).is_err());
    }
}
