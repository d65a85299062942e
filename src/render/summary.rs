use crate::domain::model::BlockSummary;

/// Short console summary of a block's two fronts.
pub fn console_summary(block: &BlockSummary) -> String {
    format!(
        "\n=== {}: summary ===\nPareto:  {}\nSlater: {}",
        block.label,
        block.pareto_front.joined(),
        block.slater_front.joined()
    )
}
