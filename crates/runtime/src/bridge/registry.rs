//! Listener registry and delivery bookkeeping.

use std::sync::Arc;

use discen_core::LocalTransformData;

use super::{DisplayMessage, MessageSink, SceneSync, SimulationEvent, SimulationListener};

/// Outcome of one emission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Delivery {
    Delivered,
    NoListener,
}

impl Delivery {
    pub fn is_delivered(self) -> bool {
        self == Delivery::Delivered
    }
}

/// Listeners registered on the context builder.
///
/// Registered listeners receive nothing until activated: scene and message
/// listeners by `initialize`, the simulation listener by
/// `initialize_simulation`.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    sink: Option<Arc<dyn MessageSink>>,
    scene: Option<Arc<dyn SceneSync>>,
    simulation: Option<Arc<dyn SimulationListener>>,
    active: bool,
    simulation_active: bool,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sink(&mut self, sink: Arc<dyn MessageSink>) {
        self.sink = Some(sink);
    }

    pub fn set_scene(&mut self, scene: Arc<dyn SceneSync>) {
        self.scene = Some(scene);
    }

    pub fn set_simulation(&mut self, listener: Arc<dyn SimulationListener>) {
        self.simulation = Some(listener);
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn activate_simulation(&mut self) {
        self.active = true;
        self.simulation_active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.simulation_active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_simulation_active(&self) -> bool {
        self.simulation_active
    }

    /// Active scene listener.
    pub fn scene(&self) -> Option<&Arc<dyn SceneSync>> {
        self.scene.as_ref().filter(|_| self.active)
    }

    pub fn has_scene(&self) -> bool {
        self.scene().is_some()
    }

    pub fn display_message(&self, message: &DisplayMessage) -> Delivery {
        match self.sink.as_ref().filter(|_| self.active) {
            Some(sink) => {
                sink.display_message(message);
                Delivery::Delivered
            }
            None => Delivery::NoListener,
        }
    }

    pub fn push_transform(&self, id: &str, transform: &LocalTransformData) -> Delivery {
        match self.scene() {
            Some(scene) => {
                scene.push_transform(id, transform);
                Delivery::Delivered
            }
            None => Delivery::NoListener,
        }
    }

    pub fn lerp_transform(
        &self,
        id: &str,
        from: &LocalTransformData,
        to: &LocalTransformData,
        trim: f32,
    ) -> Delivery {
        match self.scene() {
            Some(scene) => {
                scene.lerp_transform(id, from, to, trim);
                Delivery::Delivered
            }
            None => Delivery::NoListener,
        }
    }

    pub fn scene_resynced(&self) -> Delivery {
        match self.scene() {
            Some(scene) => {
                scene.scene_resynced();
                Delivery::Delivered
            }
            None => Delivery::NoListener,
        }
    }

    pub fn scenario_resync_requested(&self) -> Delivery {
        match self.scene() {
            Some(scene) => {
                scene.scenario_resync_requested();
                Delivery::Delivered
            }
            None => Delivery::NoListener,
        }
    }

    pub fn simulation_event(&self, event: SimulationEvent) -> Delivery {
        match self.simulation.as_ref().filter(|_| self.simulation_active) {
            Some(listener) => {
                listener.on_event(event);
                Delivery::Delivered
            }
            None => Delivery::NoListener,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{LogLevel, MirrorScene, TracingSink};

    #[test]
    fn test_listeners_wait_for_activation() {
        let scene = Arc::new(MirrorScene::new());
        let mut registry = ListenerRegistry::new();
        registry.set_scene(scene.clone());
        registry.set_sink(Arc::new(TracingSink));

        let t = LocalTransformData::identity();
        assert_eq!(registry.push_transform("a", &t), Delivery::NoListener);
        assert!(scene.is_empty());

        registry.activate();
        assert_eq!(registry.push_transform("a", &t), Delivery::Delivered);
        assert_eq!(scene.len(), 1);

        let message = DisplayMessage::new(LogLevel::Log, "hello", "test");
        assert!(registry.display_message(&message).is_delivered());
        assert_eq!(
            registry.simulation_event(SimulationEvent::Play),
            Delivery::NoListener
        );
    }
}
