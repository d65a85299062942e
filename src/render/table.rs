use super::escape_html;
use crate::domain::model::{join_ids, BlockAnalysis, Point, Relation};

const TABLE_CSS: &str = r#"
  <style>
    body{font-family:system-ui,Segoe UI,Arial; padding:24px}
    h1{margin:0 0 8px}
    h2{margin:32px 0 12px}
    .tbl{border-collapse:collapse; width:100%; margin:8px 0 24px; table-layout:fixed}
    .tbl caption{font-weight:600; text-align:left; margin-bottom:8px}
    .tbl th,.tbl td{border:1px solid #999; padding:6px 8px; vertical-align:middle; word-wrap:break-word}
    .tbl thead th{background:#eee}
    .crit{width:160px; text-align:center; font-weight:600}
    .alts{text-align:center; font-weight:600}
    .muted{color:#666}
    .pagebreak{page-break-after:always}
  </style>"#;

/// Renders the criteria and domination tables of a block, `group_size`
/// alternatives per table. A `group_size` of zero is treated as one.
pub fn render_tables(analysis: &BlockAnalysis, group_size: usize) -> String {
    let title = escape_html(&analysis.label);
    let mut html = String::new();
    html.push_str(&format!(
        "<!doctype html><html lang=\"en\"><head>\n    <meta charset=\"utf-8\"><title>{title} — Tables 1.1 and 1.2</title>\n    {TABLE_CSS}\n  </head><body>\n  <h1>{title} — Tables 1.1 and 1.2</h1>"
    ));

    let groups: Vec<&[Point]> = analysis.points.chunks(group_size.max(1)).collect();
    for (index, group) in groups.iter().enumerate() {
        render_group(&mut html, analysis, group, index);
        if index + 1 != groups.len() {
            html.push_str("\n    <div class=\"pagebreak\"></div>");
        }
    }

    html.push_str("</body></html>");
    html
}

fn render_group(html: &mut String, analysis: &BlockAnalysis, group: &[Point], index: usize) {
    let (Some(first), Some(last)) = (group.first(), group.last()) else {
        return;
    };

    let id_cells: String = group.iter().map(|p| format!("<th>{}</th>", p.id)).collect();
    let head_row = format!(
        "<tr><th rowspan=\"2\" class=\"crit\">Criteria</th><th colspan=\"{}\" class=\"alts\">Alternatives</th></tr><tr>{}</tr>",
        group.len(),
        id_cells
    );
    let row_q1 = criteria_row("Q1", group.iter().map(|p| p.q1));
    let row_q2 = criteria_row("Q2", group.iter().map(|p| p.q2));
    let row_pareto = dominators_row(analysis, group, Relation::Pareto);
    let row_slater = dominators_row(analysis, group, Relation::Slater);

    html.push_str(&format!(
        r#"
    <h2>Alternatives {first_id}–{last_id} (group {number})</h2>

    <table class="tbl">
      <caption>Table 1.1 — Alternatives in the criteria space</caption>
      <thead>{head_row}</thead>
      <tbody>{row_q1}{row_q2}</tbody>
    </table>

    <table class="tbl">
      <caption>Table 1.2 — Dominance between alternatives</caption>
      <thead>{head_row}</thead>
      <tbody>
        {row_q1}
        {row_q2}
        {row_pareto}
        {row_slater}
      </tbody>
    </table>
"#,
        first_id = first.id,
        last_id = last.id,
        number = index + 1,
    ));
}

fn criteria_row(name: &str, values: impl Iterator<Item = u8>) -> String {
    let cells: String = values.map(|v| format!("<td>{}</td>", v)).collect();
    format!("<tr><th>{}</th>{}</tr>", name, cells)
}

fn dominators_row(analysis: &BlockAnalysis, group: &[Point], relation: Relation) -> String {
    let map = analysis.map(relation);
    let cells: String = group
        .iter()
        .map(|p| match map.dominators(p.id) {
            Some(set) if !set.is_empty() => format!("<td>{}</td>", escape_html(&join_ids(set))),
            _ => "<td><span class='muted'>—</span></td>".to_string(),
        })
        .collect();
    format!("<tr><th>Dominated<br>by {}</th>{}</tr>", relation.title(), cells)
}
