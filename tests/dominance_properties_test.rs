use dominance_fronts::core::deriver::derive_points;
use dominance_fronts::core::dominance::{analyze, pareto_dominates, slater_dominates};
use dominance_fronts::{analyze_block, BlockAnalysis, BlockInput, Relation};

/// Small xorshift generator so the sample sets are reproducible.
struct SampleGen(u64);

impl SampleGen {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn samples(&mut self, len: usize) -> Vec<f64> {
        (0..len)
            .map(|_| (self.next() % 2000) as f64 - 1000.0)
            .collect()
    }
}

fn block(label: &str, samples: Vec<f64>, start_ordinal: u32) -> BlockAnalysis {
    analyze_block(&BlockInput {
        label: label.to_string(),
        samples,
        start_ordinal,
    })
    .unwrap()
}

fn random_blocks() -> Vec<BlockAnalysis> {
    let mut gen = SampleGen(0x9E37_79B9_7F4A_7C15);
    (0..40)
        .map(|i| {
            let len = (gen.next() % 60) as usize;
            block(&format!("R{}", i), gen.samples(len), 1)
        })
        .collect()
}

fn ordinals(front: &dominance_fronts::Front) -> Vec<u32> {
    front.members.iter().map(|id| id.ordinal()).collect()
}

#[test]
fn test_no_point_dominates_itself() {
    for analysis in random_blocks() {
        for relation in Relation::ALL {
            for (id, dominators) in analysis.map(relation).iter() {
                assert!(!dominators.contains(id), "{} dominates itself", id);
            }
        }
    }
}

#[test]
fn test_slater_dominance_implies_pareto_dominance() {
    for analysis in random_blocks() {
        for a in &analysis.points {
            for b in &analysis.points {
                if slater_dominates(&a.criteria(), &b.criteria()) {
                    assert!(pareto_dominates(&a.criteria(), &b.criteria()));
                }
            }
            let pareto = analysis.pareto_map.dominators(a.id).unwrap();
            let slater = analysis.slater_map.dominators(a.id).unwrap();
            assert!(slater.is_subset(pareto));
        }
    }
}

#[test]
fn test_mapping_matches_predicates() {
    for analysis in random_blocks() {
        for relation in Relation::ALL {
            let map = analysis.map(relation);
            assert_eq!(map.len(), analysis.points.len());
            for a in &analysis.points {
                for b in &analysis.points {
                    let expected = a.id != b.id && relation.dominates(a, b);
                    assert_eq!(map.is_dominated_by(b.id, a.id), expected);
                }
            }
        }
    }
}

#[test]
fn test_pareto_front_is_subset_of_slater_front() {
    for analysis in random_blocks() {
        for id in &analysis.pareto_front.members {
            assert!(analysis.slater_front.contains(*id));
        }
        if !analysis.points.is_empty() {
            assert!(!analysis.pareto_front.is_empty());
        }
    }
}

#[test]
fn test_fronts_strictly_ascending_for_any_permutation() {
    let base = vec![52.0, 21.0, 93.0, 90.0, 89.0, 9.0, 31.0, 73.0, 64.0, 35.0, 48.0, 95.0];
    let mut gen = SampleGen(42);

    for _ in 0..20 {
        let mut samples = base.clone();
        for i in (1..samples.len()).rev() {
            let j = (gen.next() % (i as u64 + 1)) as usize;
            samples.swap(i, j);
        }

        let analysis = block("perm", samples, 1);
        for relation in Relation::ALL {
            let members = ordinals(analysis.front(relation));
            assert!(members.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let mut gen = SampleGen(7);
    let samples = gen.samples(50);

    let first = block("det", samples.clone(), 3);
    let second = block("det", samples, 3);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_reference_scenario() {
    let points = derive_points(&[52.0, 21.0, 93.0], 1).unwrap();
    let dominance = analyze(&points);
    let dominated_by = |map: &dominance_fronts::DominationMap, ordinal: u32| -> Vec<String> {
        map.dominators(dominance_fronts::PointId::new(ordinal))
            .unwrap()
            .iter()
            .map(|id| id.to_string())
            .collect()
    };

    assert_eq!(dominated_by(&dominance.pareto, 1), vec!["A3"]);
    assert_eq!(dominated_by(&dominance.pareto, 2), vec!["A1", "A3"]);
    assert!(dominated_by(&dominance.pareto, 3).is_empty());
    assert_eq!(dominated_by(&dominance.slater, 1), vec!["A3"]);
    assert_eq!(dominated_by(&dominance.slater, 2), vec!["A1", "A3"]);
    assert!(dominated_by(&dominance.slater, 3).is_empty());

    let analysis = block("Row", vec![52.0, 21.0, 93.0], 1);
    assert_eq!(analysis.pareto_front.joined(), "A3");
    assert_eq!(analysis.slater_front.joined(), "A3");
}

#[test]
fn test_sample_rows() {
    let row1 = vec![
        52.0, 21.0, 93.0, 90.0, 89.0, 9.0, 31.0, 73.0, 64.0, 35.0, 48.0, 95.0, 77.0, 13.0, 33.0,
        98.0, 49.0, 55.0, 55.0, 93.0,
    ];
    let analysis = block("Row1", row1, 1);

    assert_eq!(ordinals(&analysis.pareto_front), vec![5, 16]);
    assert_eq!(
        ordinals(&analysis.slater_front),
        vec![3, 4, 5, 6, 12, 16, 17, 20]
    );

    let row3 = vec![
        42.0, 24.0, 59.0, 19.0, 89.0, 44.0, 69.0, 38.0, 51.0, 76.0, 83.0, 19.0, 33.0, 43.0, 4.0,
        56.0, 81.0, 75.0, 66.0, 11.0,
    ];
    let analysis = block("Row3", row3, 41);
    assert_eq!(ordinals(&analysis.pareto_front), vec![45]);
    assert_eq!(
        ordinals(&analysis.slater_front),
        vec![43, 44, 45, 47, 51, 52, 57]
    );
}

#[test]
fn test_single_and_empty_sets() {
    let single = block("one", vec![47.0], 9);
    assert_eq!(single.pareto_front.joined(), "A9");
    assert_eq!(single.slater_front.joined(), "A9");

    let empty = block("none", Vec::new(), 1);
    assert!(empty.pareto_map.is_empty());
    assert!(empty.slater_map.is_empty());
    assert!(empty.pareto_front.is_empty());
    assert!(empty.slater_front.is_empty());
}
