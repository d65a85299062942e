use crate::domain::model::{join_ids, BlockAnalysis, PointId, Relation};
use crate::utils::error::{AnalysisError, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PointRow {
    id: String,
    q1: u8,
    q2: u8,
    n: u8,
    pareto_dominated_by: String,
    slater_dominated_by: String,
    pareto_front: bool,
    slater_front: bool,
}

fn dominators(analysis: &BlockAnalysis, relation: Relation, id: PointId) -> String {
    analysis
        .map(relation)
        .dominators(id)
        .map(join_ids)
        .unwrap_or_default()
}

/// One row per point, in derivation order. Dominator lists are `", "`-joined.
pub fn points_csv(analysis: &BlockAnalysis) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for point in &analysis.points {
        writer.serialize(PointRow {
            id: point.id.to_string(),
            q1: point.q1,
            q2: point.q2,
            n: point.n,
            pareto_dominated_by: dominators(analysis, Relation::Pareto, point.id),
            slater_dominated_by: dominators(analysis, Relation::Slater, point.id),
            pareto_front: analysis.pareto_front.contains(point.id),
            slater_front: analysis.slater_front.contains(point.id),
        })?;
    }
    writer
        .into_inner()
        .map_err(|e| AnalysisError::IoError(e.into_error()))
}

pub fn analysis_json(analysis: &BlockAnalysis) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(analysis)?)
}
