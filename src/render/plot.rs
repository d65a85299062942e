use super::escape_html;
use crate::domain::model::{
    BlockAnalysis, LabelMode, LineMode, PlotOptions, Point, PointId, Relation,
};
use crate::utils::error::Result;
use std::collections::{BTreeSet, HashMap};
use std::f64::consts::TAU;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Display coordinates for each point. Points sharing the same `(q1, q2)` are
/// spread evenly on a circle of radius `jitter` around it, in input order, so
/// the output is reproducible. A non-finite or non-positive `jitter` leaves
/// every point in place.
pub fn jittered_coordinates(points: &[Point], jitter: f64) -> Vec<(f64, f64)> {
    let mut totals: HashMap<(u8, u8), usize> = HashMap::new();
    for p in points {
        *totals.entry((p.q1, p.q2)).or_default() += 1;
    }

    let mut seen: HashMap<(u8, u8), usize> = HashMap::new();
    points
        .iter()
        .map(|p| {
            let key = (p.q1, p.q2);
            let (x, y) = (f64::from(p.q1), f64::from(p.q2));
            let total = totals[&key];
            if total < 2 || !jitter.is_finite() || jitter <= 0.0 {
                return (x, y);
            }
            let rank = seen.entry(key).or_default();
            let angle = TAU * (*rank as f64) / (total as f64);
            *rank += 1;
            (x + jitter * angle.cos(), y + jitter * angle.sin())
        })
        .collect()
}

/// Polyline through the distinct front coordinates, ordered by q1 ascending
/// then q2 descending. Empty when fewer than two distinct coordinates remain.
pub fn front_line(points: &[Point], front: &[PointId], mode: LineMode) -> (Vec<u8>, Vec<u8>) {
    let mut coords: Vec<(u8, u8)> = points
        .iter()
        .filter(|p| front.contains(&p.id))
        .map(|p| (p.q1, p.q2))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    coords.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    if coords.len() < 2 {
        return (Vec::new(), Vec::new());
    }

    match mode {
        LineMode::None => (Vec::new(), Vec::new()),
        LineMode::Direct => coords.into_iter().unzip(),
        LineMode::Step => {
            let mut xs = vec![coords[0].0];
            let mut ys = vec![coords[0].1];
            for pair in coords.windows(2) {
                let (prev, next) = (pair[0], pair[1]);
                xs.push(next.0);
                ys.push(prev.1);
                xs.push(next.0);
                ys.push(next.1);
            }
            (xs, ys)
        }
    }
}

/// Plotly scatter of every point with the relation's front highlighted.
pub fn render_plot(
    analysis: &BlockAnalysis,
    relation: Relation,
    options: &PlotOptions,
) -> Result<String> {
    let points = &analysis.points;
    let front = analysis.front(relation);
    let title = format!("{}: {} front", analysis.label, relation.title());

    let coords = jittered_coordinates(points, options.jitter);
    let jx: Vec<f64> = coords.iter().map(|c| c.0).collect();
    let jy: Vec<f64> = coords.iter().map(|c| c.1).collect();
    let labels: Vec<String> = points.iter().map(|p| p.id.to_string()).collect();
    let mask: Vec<bool> = points.iter().map(|p| front.contains(p.id)).collect();
    let custom: Vec<[u8; 2]> = points.iter().map(|p| [p.q1, p.q2]).collect();
    let (line_x, line_y) = front_line(points, &front.members, options.line_mode);
    let line_shape = match options.line_mode {
        LineMode::Step => "hv",
        _ => "linear",
    };
    let label_mode = match options.label_mode {
        LabelMode::Front => "front",
        LabelMode::All => "all",
        LabelMode::None => "none",
    };

    Ok(format!(
        r#"<!doctype html>
<html lang="en"><head>
  <meta charset="utf-8"/><title>{html_title}</title>
  <script src="{PLOTLY_CDN}"></script>
  <style>body{{margin:0;padding:0;font-family:system-ui,Segoe UI,Arial}}</style>
</head><body>
  <div id="chart" style="width:960px;height:720px;margin:24px auto;"></div>
  <script>
    const jx  = {jx};
    const jy  = {jy};
    const labs= {labels};
    const mask= {mask};
    const custom = {custom};
    const lineX = {line_x};
    const lineY = {line_y};
    const labelMode = {label_mode};

    const allTrace = {{
      x: jx, y: jy,
      mode: (labelMode === 'all') ? 'markers+text' : 'markers',
      text: labs,
      textposition: 'top left',
      textfont: {{ size: 10 }},
      marker: {{ size: 7, opacity: 0.8, line: {{ width: 0.5 }} }},
      name: 'All alternatives',
      hovertemplate: '<b>%{{text}}</b><br>Q1=%{{customdata[0]}}<br>Q2=%{{customdata[1]}}<extra></extra>',
      customdata: custom,
      cliponaxis: false
    }};

    const frontTrace = {{
      x: jx.filter((_,i)=>mask[i]),
      y: jy.filter((_,i)=>mask[i]),
      text: labs.filter((_,i)=>mask[i]),
      textposition: 'top center',
      textfont: {{ size: 12 }},
      mode: (labelMode === 'none') ? 'markers' : 'markers+text',
      marker: {{ size: 11, symbol: 'diamond', opacity: 0.95, line: {{ width: 1 }} }},
      name: 'Front',
      hovertemplate: '<b>%{{text}}</b><br>Q1=%{{customdata[0]}}<br>Q2=%{{customdata[1]}}<extra></extra>',
      customdata: custom.filter((_,i)=>mask[i]),
      cliponaxis: false
    }};

    const lineTrace = (lineX.length > 0) ? {{
      x: lineX, y: lineY,
      mode: 'lines',
      line: {{ width: 2, shape: {line_shape} }},
      name: 'Front line'
    }} : null;

    const traces = lineTrace ? [allTrace, frontTrace, lineTrace] : [allTrace, frontTrace];

    Plotly.newPlot('chart', traces, {{
      title: {js_title},
      hovermode: 'closest',
      margin: {{l:60, r:20, t:60, b:60}},
      xaxis: {{ title: 'Q1 (maximize)', rangemode: 'tozero', dtick: 1, gridcolor: 'rgba(0,0,0,0.1)' }},
      yaxis: {{ title: 'Q2 (maximize)', rangemode: 'tozero', dtick: 1, gridcolor: 'rgba(0,0,0,0.1)' }},
      legend: {{ orientation: 'h', x: 0.5, xanchor: 'center' }}
    }}, {{displaylogo:false}});
  </script>
</body></html>"#,
        html_title = escape_html(&title),
        jx = serde_json::to_string(&jx)?,
        jy = serde_json::to_string(&jy)?,
        labels = serde_json::to_string(&labels)?,
        mask = serde_json::to_string(&mask)?,
        custom = serde_json::to_string(&custom)?,
        line_x = serde_json::to_string(&line_x)?,
        line_y = serde_json::to_string(&line_y)?,
        label_mode = serde_json::to_string(label_mode)?,
        line_shape = serde_json::to_string(line_shape)?,
        js_title = script_safe(&serde_json::to_string(&title)?),
    ))
}

/// Keeps a JSON literal from closing the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
