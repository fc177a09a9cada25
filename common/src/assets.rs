//! Asset loading and caching

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use glam::{Quat, Vec3};

use crate::scene_graph::{ClipInfo, LocalBounds, NodeId, SceneGraph, Transform};

/// Get-or-load cache keyed by asset identifier.
///
/// Owned by the application; dropping it frees everything it holds.
#[derive(Debug)]
pub struct AssetCache<V> {
    entries: HashMap<String, V>,
}

impl<V> AssetCache<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the cached value, running `load` only on the first request.
    /// A failed load is not cached.
    pub fn get_or_load<F>(&mut self, key: &str, load: F) -> Result<&V>
    where
        F: FnOnce(&str) -> Result<V>,
    {
        if !self.entries.contains_key(key) {
            let value = load(key)?;
            log::debug!("asset cached: {}", key);
            self.entries.insert(key.to_string(), value);
        }
        self.entries
            .get(key)
            .with_context(|| format!("asset '{}' vanished from cache", key))
    }

    pub fn evict(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<V> Default for AssetCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a glTF document into a [`SceneGraph`].
///
/// Root nodes of the default scene become children of the graph root in
/// document order, so index-based fallbacks see the same order as the
/// exporter wrote.
pub fn load_gltf_scene(path: impl AsRef<Path>) -> Result<SceneGraph> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {:?}", path);

    let gltf = gltf::Gltf::open(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .with_context(|| format!("glTF file has no scenes: {:?}", path))?;

    let mut graph = SceneGraph::new(scene.name().unwrap_or("scene"));
    let root = graph.root();
    for node in scene.nodes() {
        add_gltf_node(&mut graph, root, &node);
    }

    for (index, animation) in gltf.animations().enumerate() {
        let duration = animation
            .channels()
            .filter_map(|channel| {
                channel
                    .sampler()
                    .input()
                    .max()
                    .and_then(|max| max.as_array().and_then(|values| values.first().cloned()))
                    .and_then(|value| value.as_f64())
            })
            .fold(0.0f64, f64::max) as f32;
        let name = animation
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("clip_{}", index));
        graph.clips.push(ClipInfo { name, duration });
    }

    log::info!(
        "glTF loaded: {} nodes, {} clips",
        graph.len().saturating_sub(1),
        graph.clips.len()
    );
    Ok(graph)
}

fn add_gltf_node(graph: &mut SceneGraph, parent: NodeId, node: &gltf::Node) {
    let (translation, rotation, scale) = node.transform().decomposed();
    let transform = Transform {
        translation: Vec3::from_array(translation),
        rotation: Quat::from_array(rotation),
        scale: Vec3::from_array(scale),
    };

    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));
    let id = graph.add(parent, &name, transform);

    if let Some(mesh) = node.mesh() {
        let bounds = mesh
            .primitives()
            .map(|primitive| {
                let bb = primitive.bounding_box();
                LocalBounds {
                    min: Vec3::from_array(bb.min),
                    max: Vec3::from_array(bb.max),
                }
            })
            .reduce(|a, b| a.union(&b));
        if let Some(graph_node) = graph.node_mut(id) {
            graph_node.bounds = bounds;
        }
    }

    for child in node.children() {
        add_gltf_node(graph, id, &child);
    }
}

/// Load the asset at `path` if it exists, otherwise build the procedural
/// stand-in. Either way the caller gets a graph with the same child order.
pub fn load_or_build(path: Option<&Path>, build: impl FnOnce() -> SceneGraph) -> SceneGraph {
    match path {
        Some(path) => match load_gltf_scene(path) {
            Ok(graph) => graph,
            Err(err) => {
                log::warn!("{:#}; using procedural scene", err);
                build()
            }
        },
        None => build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_cache_loads_once() {
        let calls = Cell::new(0);
        let mut cache: AssetCache<String> = AssetCache::new();
        for _ in 0..3 {
            let value = cache
                .get_or_load("models/candle.gltf", |key| {
                    calls.set(calls.get() + 1);
                    Ok(key.to_uppercase())
                })
                .unwrap();
            assert_eq!(value, "MODELS/CANDLE.GLTF");
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut cache: AssetCache<u32> = AssetCache::new();
        assert!(cache.get_or_load("a", |_| anyhow::bail!("offline")).is_err());
        assert!(!cache.contains("a"));
        assert_eq!(*cache.get_or_load("a", |_| Ok(7)).unwrap(), 7);
    }

    #[test]
    fn test_missing_gltf_is_an_error() {
        assert!(load_gltf_scene("does/not/exist.gltf").is_err());
    }

    #[test]
    fn test_load_or_build_falls_back() {
        let graph = load_or_build(Some(Path::new("does/not/exist.gltf")), || SceneGraph::new("stand-in"));
        assert_eq!(graph.node(graph.root()).unwrap().name, "stand-in");
    }
}
