use blockscape_core::{AppEvent, EventBus, EventCategory, EventFilter, SceneEvent};
use blockscape_operations::OperationManagerConfig;
use blockscape_scene::{Scene, SceneConfig};
use std::sync::{Arc, Mutex};

/// 100 x 100 canvas, catchment 0.05 (radius 5), hit radius 2.
pub fn config() -> SceneConfig {
    SceneConfig {
        canvas_width: 100.0,
        canvas_height: 100.0,
        hit_radius: 2.0,
        default_catchment_area: 0.05,
    }
}

pub struct Harness {
    pub scene: Arc<Scene>,
    pub bus: Arc<EventBus>,
    events: Arc<Mutex<Vec<SceneEvent>>>,
}

impl Harness {
    pub fn new() -> Self {
        let bus = Arc::new(EventBus::new());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Scene]),
            move |event| {
                if let AppEvent::Scene(e) = event {
                    sink.lock().unwrap().push(e);
                }
            },
        );
        let scene = Scene::new(config(), OperationManagerConfig::default(), bus.clone());
        Self { scene, bus, events }
    }

    /// Scene events published since the last call.
    pub fn take_events(&self) -> Vec<SceneEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Attach/detach events published since the last call.
    pub fn take_transitions(&self) -> Vec<SceneEvent> {
        self.take_events()
            .into_iter()
            .filter(|e| matches!(e, SceneEvent::Attached { .. } | SceneEvent::Detached { .. }))
            .collect()
    }
}
