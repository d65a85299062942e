use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Identifier of a point, rendered as `A<ordinal>`.
///
/// Ordering is by the numeric ordinal, so `A2 < A10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(u32);

impl PointId {
    pub const PREFIX: char = 'A';

    pub fn new(ordinal: u32) -> Self {
        Self(ordinal)
    }

    pub fn ordinal(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePointIdError(String);

impl fmt::Display for ParsePointIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid point id '{}'", self.0)
    }
}

impl std::error::Error for ParsePointIdError {}

impl FromStr for PointId {
    type Err = ParsePointIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| ParsePointIdError(s.to_string()))?;
        digits
            .parse::<u32>()
            .map(PointId)
            .map_err(|_| ParsePointIdError(s.to_string()))
    }
}

impl Serialize for PointId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PointId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A labeled alternative in the two-criteria space. Both criteria are maximized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub q1: u8,
    pub q2: u8,
    /// Two-digit magnitude the criteria were taken from.
    pub n: u8,
}

impl Point {
    pub fn criteria(&self) -> [i64; 2] {
        [i64::from(self.q1), i64::from(self.q2)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Pareto,
    Slater,
}

impl Relation {
    pub const ALL: [Relation; 2] = [Relation::Pareto, Relation::Slater];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Pareto => "pareto",
            Relation::Slater => "slater",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Relation::Pareto => "Pareto",
            Relation::Slater => "Slater",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// For one relation: every point id mapped to the ids that dominate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DominationMap(BTreeMap<PointId, BTreeSet<PointId>>);

impl DominationMap {
    pub(crate) fn with_keys<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        Self(points.into_iter().map(|p| (p.id, BTreeSet::new())).collect())
    }

    pub(crate) fn insert(&mut self, dominated: PointId, dominator: PointId) {
        self.0.entry(dominated).or_default().insert(dominator);
    }

    pub fn dominators(&self, id: PointId) -> Option<&BTreeSet<PointId>> {
        self.0.get(&id)
    }

    pub fn is_dominated_by(&self, id: PointId, by: PointId) -> bool {
        self.0.get(&id).is_some_and(|set| set.contains(&by))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PointId, &BTreeSet<PointId>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Non-dominated ids under one relation, ascending by ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Front {
    pub relation: Relation,
    pub members: Vec<PointId>,
}

impl Front {
    pub fn contains(&self, id: PointId) -> bool {
        self.members.binary_search(&id).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// `A3, A7` or `—` when the front is empty.
    pub fn joined(&self) -> String {
        if self.members.is_empty() {
            return "—".to_string();
        }
        join_ids(&self.members)
    }
}

pub fn join_ids<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a PointId>,
{
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Samples for one analysis block together with the ordinal its ids start at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInput {
    pub label: String,
    pub samples: Vec<f64>,
    pub start_ordinal: u32,
}

/// Everything the engine produces for one block. Read-only for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAnalysis {
    pub label: String,
    pub points: Vec<Point>,
    pub pareto_map: DominationMap,
    pub slater_map: DominationMap,
    pub pareto_front: Front,
    pub slater_front: Front,
}

impl BlockAnalysis {
    pub fn map(&self, relation: Relation) -> &DominationMap {
        match relation {
            Relation::Pareto => &self.pareto_map,
            Relation::Slater => &self.slater_map,
        }
    }

    pub fn front(&self, relation: Relation) -> &Front {
        match relation {
            Relation::Pareto => &self.pareto_front,
            Relation::Slater => &self.slater_front,
        }
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn last_ordinal(&self) -> Option<u32> {
        self.points.iter().map(|p| p.id.ordinal()).max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    #[default]
    Front,
    All,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    #[default]
    Direct,
    Step,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    #[serde(default)]
    pub label_mode: LabelMode,
    #[serde(default)]
    pub line_mode: LineMode,
    #[serde(default = "PlotOptions::default_jitter")]
    pub jitter: f64,
}

impl PlotOptions {
    fn default_jitter() -> f64 {
        0.12
    }
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            label_mode: LabelMode::default(),
            line_mode: LineMode::default(),
            jitter: Self::default_jitter(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Csv,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Html, OutputFormat::Csv, OutputFormat::Json];
}

/// A rendered report file waiting to be handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Table { html: String },
    Plot { relation: Relation, html: String },
    Data { file_name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReport {
    pub analysis: BlockAnalysis,
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub label: String,
    pub points: usize,
    pub pareto_front: Front,
    pub slater_front: Front,
}

impl From<&BlockAnalysis> for BlockSummary {
    fn from(analysis: &BlockAnalysis) -> Self {
        Self {
            label: analysis.label.clone(),
            points: analysis.points.len(),
            pareto_front: analysis.pareto_front.clone(),
            slater_front: analysis.slater_front.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub blocks: Vec<BlockSummary>,
    pub artifacts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id_orders_numerically() {
        let mut ids: Vec<PointId> = ["A10", "A2", "A1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        assert_eq!(join_ids(&ids), "A1, A2, A10");
    }

    #[test]
    fn test_point_id_rejects_malformed() {
        assert!("B1".parse::<PointId>().is_err());
        assert!("A".parse::<PointId>().is_err());
        assert!("A-1".parse::<PointId>().is_err());
        assert!("A1x".parse::<PointId>().is_err());
        assert_eq!("A42".parse::<PointId>().unwrap().ordinal(), 42);
    }

    #[test]
    fn test_point_id_serializes_as_token() {
        let json = serde_json::to_string(&PointId::new(7)).unwrap();
        assert_eq!(json, "\"A7\"");
        let back: PointId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PointId::new(7));
    }

    #[test]
    fn test_empty_front_joins_to_dash() {
        let front = Front {
            relation: Relation::Slater,
            members: vec![],
        };
        assert_eq!(front.joined(), "—");
    }
}
