//! Bench layout: asset preparation and handle resolution

use common::scene_graph::{LocalBounds, NodeId, NodeSchema, SceneGraph, Transform};
use glam::{Quat, Vec3};

/// Logical parts of the bench
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    LeftBeaker,
    RightBeaker,
    LeftCandle,
    RightCandle,
    LeftRing,
    RightRing,
    /// The two oxygen-supply parts regrouped under one node
    Oxygen,
}

pub const ALL_PARTS: [Part; 7] = [
    Part::LeftBeaker,
    Part::RightBeaker,
    Part::LeftCandle,
    Part::RightCandle,
    Part::LeftRing,
    Part::RightRing,
    Part::Oxygen,
];

pub const LEFT_BEAKER: &str = "left_beaker";
pub const RIGHT_BEAKER: &str = "right_beaker";
pub const RIGHT_CANDLE: &str = "right_candle";
pub const LEFT_CANDLE: &str = "left_candle";
pub const RIGHT_RING: &str = "right_ring";
pub const LEFT_RING: &str = "left_ring";
pub const OXYGEN_TANK: &str = "oxygen_part_1";
pub const OXYGEN_TUBE: &str = "oxygen_part_2";
pub const OXYGEN_GROUP: &str = "oxygen_supply";

/// Child order of the candle asset once the stand (child 0) is removed
pub fn bench_schema() -> NodeSchema {
    NodeSchema::new(
        1,
        &[
            (LEFT_BEAKER, 0),
            (RIGHT_BEAKER, 1),
            (RIGHT_CANDLE, 2),
            (LEFT_CANDLE, 3),
            (RIGHT_RING, 4),
            (LEFT_RING, 5),
            (OXYGEN_TANK, 6),
            (OXYGEN_TUBE, 7),
        ],
    )
}

/// Root placement applied to the loaded asset
pub fn bench_root_transform() -> Transform {
    Transform {
        translation: Vec3::new(0.0, -5.0, 0.0),
        rotation: Quat::IDENTITY,
        scale: Vec3::splat(5.0),
    }
}

const GLASS: [f32; 4] = [0.75, 0.88, 0.95, 0.35];
const WAX: [f32; 4] = [0.95, 0.93, 0.85, 1.0];
const METAL: [f32; 4] = [0.55, 0.57, 0.6, 1.0];
const TANK: [f32; 4] = [0.25, 0.45, 0.8, 1.0];
const WOOD: [f32; 4] = [0.55, 0.4, 0.28, 1.0];

fn add_hanging(graph: &mut SceneGraph, name: &str, at: Vec3, min: Vec3, max: Vec3, color: [f32; 4]) -> NodeId {
    let root = graph.root();
    let id = graph.add(root, name, Transform::from_translation(at));
    if let Some(node) = graph.node_mut(id) {
        node.bounds = Some(LocalBounds { min, max });
        node.color = color;
    }
    id
}

/// Stand-in for the candle asset with the same child order.
///
/// Beaker origins sit at the rim's top so their y is the lift height.
pub fn build_bench() -> SceneGraph {
    let mut graph = SceneGraph::new("candle_experiment");
    let root = graph.root();

    graph.add_box(root, "stand", Vec3::new(0.0, 0.98, 0.0), Vec3::new(0.4, 0.02, 0.15), WOOD);
    add_hanging(
        &mut graph,
        LEFT_BEAKER,
        Vec3::new(-0.114, 1.22, 0.0),
        Vec3::new(-0.045, -0.2, -0.045),
        Vec3::new(0.045, 0.0, 0.045),
        GLASS,
    );
    add_hanging(
        &mut graph,
        RIGHT_BEAKER,
        Vec3::new(0.082, 1.16, 0.0),
        Vec3::new(-0.045, -0.15, -0.045),
        Vec3::new(0.045, 0.0, 0.045),
        GLASS,
    );
    graph.add_box(root, RIGHT_CANDLE, Vec3::new(0.082, 1.04, 0.0), Vec3::new(0.015, 0.04, 0.015), WAX);
    graph.add_box(root, LEFT_CANDLE, Vec3::new(-0.114, 1.04, 0.0), Vec3::new(0.015, 0.04, 0.015), WAX);
    graph.add_box(root, RIGHT_RING, Vec3::new(0.082, 1.04, 0.0), Vec3::new(0.05, 0.008, 0.05), METAL);
    graph.add_box(root, LEFT_RING, Vec3::new(-0.114, 1.05, 0.0), Vec3::new(0.05, 0.008, 0.05), METAL);
    graph.add_box(root, OXYGEN_TANK, Vec3::new(0.2, 1.08, 0.0), Vec3::new(0.03, 0.08, 0.03), TANK);
    graph.add_box(root, OXYGEN_TUBE, Vec3::new(0.14, 1.1, 0.0), Vec3::new(0.03, 0.006, 0.006), METAL);

    graph
}

/// Resolved nodes of the prepared bench
#[derive(Debug, Clone, Default)]
pub struct BenchNodes {
    pub left_beaker: Option<NodeId>,
    pub right_beaker: Option<NodeId>,
    pub left_candle: Option<NodeId>,
    pub right_candle: Option<NodeId>,
    pub left_ring: Option<NodeId>,
    pub right_ring: Option<NodeId>,
    pub oxygen: Option<NodeId>,
}

impl BenchNodes {
    pub fn get(&self, part: Part) -> Option<NodeId> {
        match part {
            Part::LeftBeaker => self.left_beaker,
            Part::RightBeaker => self.right_beaker,
            Part::LeftCandle => self.left_candle,
            Part::RightCandle => self.right_candle,
            Part::LeftRing => self.left_ring,
            Part::RightRing => self.right_ring,
            Part::Oxygen => self.oxygen,
        }
    }
}

/// Strip the stand, resolve every part and regroup the oxygen supply.
///
/// Resolution happens before regrouping, while the schema indices still
/// match the asset's child order.
pub fn prepare_bench(graph: &mut SceneGraph, oxygen_start_x: f32) -> BenchNodes {
    let root = graph.root();
    if let Some(stand) = graph.remove_child_at(root, 0) {
        log::debug!("removed stand node {:?}", stand);
    }

    let schema = bench_schema();
    schema.validate(graph, root);
    let resolve = |name: &str| {
        let id = schema.resolve(graph, root, name);
        if id.is_none() {
            log::warn!("bench part '{}' not found", name);
        }
        id
    };

    let mut nodes = BenchNodes {
        left_beaker: resolve(LEFT_BEAKER),
        right_beaker: resolve(RIGHT_BEAKER),
        left_candle: resolve(LEFT_CANDLE),
        right_candle: resolve(RIGHT_CANDLE),
        left_ring: resolve(LEFT_RING),
        right_ring: resolve(RIGHT_RING),
        oxygen: None,
    };
    let tank = resolve(OXYGEN_TANK);
    let tube = resolve(OXYGEN_TUBE);

    if let (Some(tank), Some(tube)) = (tank, tube) {
        let group = graph.add(root, OXYGEN_GROUP, Transform::IDENTITY);
        graph.reparent(tank, group);
        graph.reparent(tube, group);
        if let Some(node) = graph.node_mut(group) {
            node.transform.translation.x = oxygen_start_x;
        }
        nodes.oxygen = Some(group);
    }

    if let Some(node) = graph.node_mut(root) {
        node.transform = bench_root_transform();
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedural_bench_matches_schema() {
        let mut graph = build_bench();
        let root = graph.root();
        graph.remove_child_at(root, 0);
        assert!(bench_schema().missing(&graph, root).is_empty());
    }

    #[test]
    fn test_prepare_removes_stand_and_groups_oxygen() {
        let mut graph = build_bench();
        let nodes = prepare_bench(&mut graph, 0.3);

        assert!(graph.find_by_name("stand").is_none());
        for part in ALL_PARTS {
            assert!(nodes.get(part).is_some(), "{:?} unresolved", part);
        }

        let group = nodes.oxygen.unwrap();
        let node = graph.node(group).unwrap();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.transform.translation.x, 0.3);
    }

    #[test]
    fn test_index_fallback_for_unnamed_asset() {
        let mut graph = build_bench();
        let ids: Vec<NodeId> = graph.node(graph.root()).unwrap().children().to_vec();
        for (i, id) in ids.iter().enumerate() {
            graph.node_mut(*id).unwrap().name = format!("mesh_{}", i);
        }

        let nodes = prepare_bench(&mut graph, 0.3);
        // Child 1 of the raw asset is the left beaker
        assert_eq!(nodes.left_beaker, Some(ids[1]));
        assert_eq!(nodes.left_ring, Some(ids[6]));
    }
}
