//! Arm folding and extending, driven by one animation clip
//!
//! The clip's first half extends the arm and its second half folds it. Each
//! action plays its half and pauses at the end. Two muscle captions trail
//! their muscles and swap wording and highlight with the action.

use common::clip::ClipPlayer;
use common::renderer::FrameBuilder;
use common::scene_graph::{NodeId, SceneGraph, Transform};
use glam::{Quat, Vec3};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmAction {
    Extend,
    Fold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Muscle {
    Biceps,
    Triceps,
}

impl Muscle {
    pub const ALL: [Muscle; 2] = [Muscle::Biceps, Muscle::Triceps];

    fn index(self) -> usize {
        match self {
            Muscle::Biceps => 0,
            Muscle::Triceps => 1,
        }
    }

    fn node_name(self) -> &'static str {
        match self {
            Muscle::Biceps => BICEPS,
            Muscle::Triceps => TRICEPS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArmTuning {
    /// Used when the asset carries no clip
    pub clip_seconds: f32,
    pub folded_degrees: f32,
    pub straight_degrees: f32,
    /// Fraction of the remaining distance a caption closes each frame
    pub label_follow: f32,
    pub biceps_label_offset: [f32; 3],
    pub triceps_label_offset: [f32; 3],
}

impl Default for ArmTuning {
    fn default() -> Self {
        Self {
            clip_seconds: 2.0,
            folded_degrees: 140.0,
            straight_degrees: 8.0,
            label_follow: 0.1,
            biceps_label_offset: [-0.05, 0.23, -0.05],
            triceps_label_offset: [-0.005, -0.2, 0.03],
        }
    }
}

const UPPER_ARM: &str = "upper_arm";
const BICEPS: &str = "biceps";
const TRICEPS: &str = "triceps";
const ELBOW: &str = "elbow";
const FOREARM_LENGTH: f32 = 0.3;

const CONTRACT_COLOR: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
const RELAX_COLOR: [f32; 4] = [0.2, 0.4, 0.9, 1.0];

/// Upper arm with both muscles and an elbow joint
pub fn build_arm() -> SceneGraph {
    let mut graph = SceneGraph::new("arm_rig");
    let root = graph.root();
    let skin = [0.93, 0.78, 0.68, 1.0];

    let upper = graph.add(root, UPPER_ARM, Transform::IDENTITY);
    graph.add_box(upper, "humerus", Vec3::new(0.15, 0.0, 0.0), Vec3::new(0.15, 0.03, 0.03), skin);
    graph.add_box(upper, BICEPS, Vec3::new(0.15, 0.045, 0.0), Vec3::new(0.08, 0.02, 0.03), RELAX_COLOR);
    graph.add_box(upper, TRICEPS, Vec3::new(0.15, -0.045, 0.0), Vec3::new(0.08, 0.02, 0.03), RELAX_COLOR);
    graph.add(upper, ELBOW, Transform::from_translation(Vec3::new(0.3, 0.0, 0.0)));
    graph.add_box(root, "shoulder", Vec3::new(-0.02, 0.0, 0.0), Vec3::splat(0.045), skin);

    graph.clips.push(common::scene_graph::ClipInfo {
        name: "arm_movement".to_string(),
        duration: ArmTuning::default().clip_seconds,
    });
    graph
}

/// 0 when fully folded, 1 when straight. The clip folds at both ends and is
/// straight at its midpoint.
pub fn straightness(phase: f32) -> f32 {
    1.0 - (2.0 * phase.clamp(0.0, 1.0) - 1.0).abs()
}

#[derive(Debug, Clone, Copy)]
struct MuscleLabel {
    node: Option<NodeId>,
    offset: Vec3,
    position: Vec3,
}

pub struct ArmMotion {
    tuning: ArmTuning,
    graph: SceneGraph,
    clip: ClipPlayer,
    action: ArmAction,
    elbow: Option<NodeId>,
    labels: [MuscleLabel; 2],
}

impl ArmMotion {
    pub fn new(graph: SceneGraph, tuning: ArmTuning) -> Self {
        let duration = graph.clips.first().map(|c| c.duration).unwrap_or(tuning.clip_seconds);
        let elbow = graph.find_by_name(ELBOW);
        if elbow.is_none() {
            log::warn!("arm asset has no '{}' node; the forearm will not move", ELBOW);
        }

        let offsets = [tuning.biceps_label_offset, tuning.triceps_label_offset];
        let labels = Muscle::ALL.map(|muscle| {
            let node = graph.find_by_name(muscle.node_name());
            let offset = Vec3::from(offsets[muscle.index()]);
            let anchor = node.and_then(|id| graph.world_bounds(id)).map(|b| b.center()).unwrap_or(Vec3::ZERO);
            MuscleLabel {
                node,
                offset,
                position: anchor + offset,
            }
        });

        let mut arm = Self {
            tuning,
            graph,
            clip: ClipPlayer::new(duration),
            action: ArmAction::Fold,
            elbow,
            labels,
        };
        arm.apply_pose();
        arm.set_action(ArmAction::Fold);
        arm
    }

    pub fn action(&self) -> ArmAction {
        self.action
    }

    pub fn clip(&self) -> &ClipPlayer {
        &self.clip
    }

    /// Elbow bend in degrees for the current clip time
    pub fn elbow_degrees(&self) -> f32 {
        let s = straightness(self.clip.phase());
        self.tuning.folded_degrees + (self.tuning.straight_degrees - self.tuning.folded_degrees) * s
    }

    /// Play the clip half belonging to `action` and pause at its end
    pub fn set_action(&mut self, action: ArmAction) {
        let half = self.clip.duration() / 2.0;
        match action {
            ArmAction::Extend => self.clip.play_segment(0.0, half),
            ArmAction::Fold => self.clip.play_segment(half, self.clip.duration()),
        }
        self.action = action;
        self.apply_highlight();
        log::info!("arm action: {:?}", action);
    }

    /// The contracting muscle is highlighted red, the relaxing one blue
    pub fn highlight(&self, muscle: Muscle) -> [f32; 4] {
        if self.contracts(muscle) {
            CONTRACT_COLOR
        } else {
            RELAX_COLOR
        }
    }

    pub fn label_text(&self, muscle: Muscle) -> &'static str {
        if self.contracts(muscle) {
            "The muscle contracts"
        } else {
            "The muscle relaxes"
        }
    }

    pub fn label_position(&self, muscle: Muscle) -> Vec3 {
        self.labels[muscle.index()].position
    }

    /// Where a caption is heading: its muscle's center plus the caption offset
    pub fn label_target(&self, muscle: Muscle) -> Option<Vec3> {
        let label = &self.labels[muscle.index()];
        let anchor = label.node.and_then(|id| self.graph.world_bounds(id))?.center();
        Some(anchor + label.offset)
    }

    fn contracts(&self, muscle: Muscle) -> bool {
        matches!(
            (self.action, muscle),
            (ArmAction::Fold, Muscle::Biceps) | (ArmAction::Extend, Muscle::Triceps)
        )
    }

    pub fn update(&mut self, dt: f32) {
        if self.clip.advance(dt) {
            log::debug!("arm clip paused at {:.2}s", self.clip.time());
        }
        self.apply_pose();

        for muscle in Muscle::ALL {
            if let Some(target) = self.label_target(muscle) {
                let label = &mut self.labels[muscle.index()];
                label.position = label.position.lerp(target, self.tuning.label_follow);
            }
        }
    }

    fn apply_pose(&mut self) {
        let bend = self.elbow_degrees().to_radians();
        let s = straightness(self.clip.phase());
        if let Some(node) = self.elbow.and_then(|id| self.graph.node_mut(id)) {
            node.transform.rotation = Quat::from_rotation_z(bend);
        }

        // The biceps bulges as the arm folds, the triceps as it straightens
        let bulges = [1.0 + 0.8 * (1.0 - s), 1.0 + 0.8 * s];
        for muscle in Muscle::ALL {
            if let Some(node) = self.labels[muscle.index()].node.and_then(|id| self.graph.node_mut(id)) {
                node.transform.scale = Vec3::new(1.0, bulges[muscle.index()], 1.0);
            }
        }
    }

    fn apply_highlight(&mut self) {
        for muscle in Muscle::ALL {
            let color = self.highlight(muscle);
            if let Some(node) = self.labels[muscle.index()].node.and_then(|id| self.graph.node_mut(id)) {
                node.color = color;
            }
        }
    }

    pub fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.push_scene(&self.graph);

        // Forearm as a row of spheres so it reads correctly at any bend
        if let Some(elbow) = self.elbow {
            let matrix = self.graph.world_matrix(elbow);
            let skin = [0.93, 0.78, 0.68, 1.0];
            for i in 0..=10 {
                let along = FOREARM_LENGTH * i as f32 / 10.0;
                let radius = 0.032 - 0.008 * i as f32 / 10.0;
                frame.push_sphere(matrix.transform_point3(Vec3::new(along, 0.0, 0.0)), radius, skin);
            }
            frame.push_sphere(matrix.transform_point3(Vec3::new(FOREARM_LENGTH + 0.04, 0.0, 0.0)), 0.04, skin);
        }

        for muscle in Muscle::ALL {
            let label = &self.labels[muscle.index()];
            if let Some(bounds) = label.node.and_then(|id| self.graph.world_bounds(id)) {
                frame.push_line(bounds.center(), label.position, [0.05, 0.05, 0.05, 1.0]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(arm: &mut ArmMotion) {
        for _ in 0..200 {
            arm.update(1.0 / 60.0);
        }
    }

    #[test]
    fn test_straightness_profile() {
        assert_eq!(straightness(0.0), 0.0);
        assert_eq!(straightness(0.5), 1.0);
        assert_eq!(straightness(1.0), 0.0);
        assert!((straightness(0.25) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_extend_pauses_at_half() {
        let mut arm = ArmMotion::new(build_arm(), ArmTuning::default());
        settle(&mut arm);
        arm.set_action(ArmAction::Extend);
        assert_eq!(arm.clip().time(), 0.0);

        settle(&mut arm);
        assert!(!arm.clip().is_playing());
        assert_eq!(arm.clip().time(), arm.clip().duration() / 2.0);
        assert!((arm.elbow_degrees() - ArmTuning::default().straight_degrees).abs() < 1e-4);
    }

    #[test]
    fn test_fold_pauses_at_end() {
        let mut arm = ArmMotion::new(build_arm(), ArmTuning::default());
        assert_eq!(arm.action(), ArmAction::Fold);
        assert_eq!(arm.clip().time(), arm.clip().duration() / 2.0);

        settle(&mut arm);
        assert!(!arm.clip().is_playing());
        assert_eq!(arm.clip().time(), arm.clip().duration());
        assert!((arm.elbow_degrees() - ArmTuning::default().folded_degrees).abs() < 1e-4);
    }

    #[test]
    fn test_texts_and_highlights_swap() {
        let mut arm = ArmMotion::new(build_arm(), ArmTuning::default());
        assert_eq!(arm.highlight(Muscle::Biceps), CONTRACT_COLOR);
        assert_eq!(arm.highlight(Muscle::Triceps), RELAX_COLOR);
        let folded_text = arm.label_text(Muscle::Biceps);

        arm.set_action(ArmAction::Extend);
        assert_eq!(arm.highlight(Muscle::Biceps), RELAX_COLOR);
        assert_eq!(arm.highlight(Muscle::Triceps), CONTRACT_COLOR);
        assert_ne!(arm.label_text(Muscle::Biceps), folded_text);
        assert_eq!(arm.label_text(Muscle::Triceps), folded_text);
    }

    #[test]
    fn test_label_closes_a_tenth_per_frame() {
        let mut arm = ArmMotion::new(build_arm(), ArmTuning::default());
        arm.update(0.5);
        let before = arm.label_position(Muscle::Triceps);
        arm.update(0.0);
        let target = arm.label_target(Muscle::Triceps).unwrap();
        let after = arm.label_position(Muscle::Triceps);
        let expected = before + (target - before) * 0.1;
        assert!((after - expected).length() < 1e-5);
    }

    #[test]
    fn test_labels_converge_once_paused() {
        let mut arm = ArmMotion::new(build_arm(), ArmTuning::default());
        settle(&mut arm);
        for muscle in Muscle::ALL {
            let target = arm.label_target(muscle).unwrap();
            assert!((arm.label_position(muscle) - target).length() < 1e-3);
        }
    }

    #[test]
    fn test_clip_duration_comes_from_asset() {
        let mut graph = build_arm();
        graph.clips[0].duration = 4.0;
        let arm = ArmMotion::new(graph, ArmTuning::default());
        assert_eq!(arm.clip().duration(), 4.0);
    }
}
