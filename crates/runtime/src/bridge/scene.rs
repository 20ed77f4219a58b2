//! Host scene contract and an in-memory scene.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use discen_core::LocalTransformData;

/// Scene side of the transform synchronization protocol.
///
/// The scenario is authoritative; the scene renders it and may move
/// elements, which the context pulls back on request.
pub trait SceneSync: Send + Sync {
    /// Current transform of `id` in the scene, if the scene has it.
    fn pull_transform(&self, id: &str) -> Option<LocalTransformData>;

    /// Places `id` at `transform`.
    fn push_transform(&self, id: &str, transform: &LocalTransformData);

    /// Places `id` between `from` and `to`. Implementations follow
    /// [`LocalTransformData::lerp_handoff`] when the parents differ.
    fn lerp_transform(
        &self,
        id: &str,
        from: &LocalTransformData,
        to: &LocalTransformData,
        trim: f32,
    );

    /// Every element has just been pushed.
    fn scene_resynced(&self) {}

    /// The scenario asks the host to send its scene state back.
    fn scenario_resync_requested(&self) {}
}

/// Scene kept in a map, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct MirrorScene {
    transforms: RwLock<HashMap<String, LocalTransformData>>,
    resyncs: AtomicUsize,
    resync_requests: AtomicUsize,
}

impl MirrorScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self, id: &str) -> Option<LocalTransformData> {
        self.transforms
            .read()
            .ok()
            .and_then(|transforms| transforms.get(id).cloned())
    }

    /// Moves an element as the host would, without involving the scenario.
    pub fn place(&self, id: &str, transform: LocalTransformData) {
        if let Ok(mut transforms) = self.transforms.write() {
            transforms.insert(id.to_owned(), transform);
        }
    }

    pub fn remove(&self, id: &str) -> Option<LocalTransformData> {
        self.transforms
            .write()
            .ok()
            .and_then(|mut transforms| transforms.remove(id))
    }

    pub fn len(&self) -> usize {
        self.transforms.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn resync_count(&self) -> usize {
        self.resyncs.load(Ordering::Relaxed)
    }

    pub fn resync_request_count(&self) -> usize {
        self.resync_requests.load(Ordering::Relaxed)
    }
}

impl SceneSync for MirrorScene {
    fn pull_transform(&self, id: &str) -> Option<LocalTransformData> {
        self.transform(id)
    }

    fn push_transform(&self, id: &str, transform: &LocalTransformData) {
        self.place(id, transform.clone());
    }

    fn lerp_transform(
        &self,
        id: &str,
        from: &LocalTransformData,
        to: &LocalTransformData,
        trim: f32,
    ) {
        self.place(id, LocalTransformData::lerp_handoff(from, to, trim));
    }

    fn scene_resynced(&self) {
        self.resyncs.fetch_add(1, Ordering::Relaxed);
    }

    fn scenario_resync_requested(&self) {
        self.resync_requests.fetch_add(1, Ordering::Relaxed);
    }
}
