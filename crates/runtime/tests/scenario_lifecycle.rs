//! Scenario persistence, lifecycle and simulation playback through the context.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use discen_core::{
    AssetData, AssetSourceType, ElementData, EntityData, LocalTransformData, ScenarioError,
    Timeline, Vector3D,
};
use discen_runtime::{
    LifecycleState, MirrorScene, RuntimeConfig, RuntimeError, ScenarioContext, SimulationEvent,
    SimulationListener, SimulationPlayer,
};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingListener {
    events: Mutex<Vec<SimulationEvent>>,
}

impl RecordingListener {
    fn take(&self) -> Vec<SimulationEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl SimulationListener for RecordingListener {
    fn on_event(&self, event: SimulationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../scenario/content/data")
}

fn at(x: f32, y: f32, z: f32) -> LocalTransformData {
    LocalTransformData::identity().with_origin(Vector3D::new(x, y, z))
}

fn sample_elements() -> Vec<ElementData> {
    vec![
        ElementData::new(
            EntityData::new("shelf")
                .with_type("Shelf")
                .with_asset(AssetData::new(AssetSourceType::Project, "props/shelf.glb")),
            at(0.0, 0.0, 0.0),
        ),
        ElementData::new(
            EntityData::new("parcel").with_type("Parcel"),
            at(0.1, 0.2, 0.8).with_parent("shelf"),
        ),
    ]
}

fn context_in(dir: &TempDir) -> ScenarioContext {
    let config = RuntimeConfig::default().with_project_dir(dir.path());
    let mut ctx = ScenarioContext::builder().config(config).build();
    ctx.initialize();
    ctx
}

#[test]
fn test_save_then_load_reproduces_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context_in(&temp_dir);
    ctx.add_elements(sample_elements()).unwrap();
    ctx.add_entity(EntityData::new("aisle").with_category("layout"))
        .unwrap();
    assert_eq!(ctx.lifecycle(), LifecycleState::ScenarioLoaded);

    ctx.save_scenario("scenarios/saved.json").unwrap();
    assert!(temp_dir.path().join("scenarios/saved.json").exists());

    let mut other = context_in(&temp_dir);
    other.load_scenario("scenarios/saved.json").unwrap();
    assert_eq!(other.scenario(), ctx.scenario());

    let parcel = other.element("parcel").unwrap();
    assert_eq!(parcel.local_transform.parent(), Some("shelf"));
    assert_eq!(other.element("shelf").unwrap().entity.asset.uri, "props/shelf.glb");
    assert_eq!(other.entities().unwrap().len(), 3);
}

#[test]
fn test_failed_load_leaves_scenario_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context_in(&temp_dir);
    ctx.add_elements(sample_elements()).unwrap();
    let before = ctx.scenario().clone();

    fs::write(temp_dir.path().join("broken.json"), "{ \"version\": 1, ").unwrap();
    assert!(matches!(
        ctx.load_scenario("broken.json"),
        Err(RuntimeError::Repository(_))
    ));

    // Parses, but the parent does not exist.
    fs::write(
        temp_dir.path().join("orphan.json"),
        r#"{ "version": 1, "elements": [ { "identifier": "a",
             "local_transform": { "right_axis": { "right": 1.0, "forward": 0.0, "up": 0.0 },
               "forward_axis": { "right": 0.0, "forward": 1.0, "up": 0.0 },
               "up_axis": { "right": 0.0, "forward": 0.0, "up": 1.0 },
               "origin": { "right": 0.0, "forward": 0.0, "up": 0.0 },
               "scale": { "right": 1.0, "forward": 1.0, "up": 1.0 },
               "parent_id": "nowhere" } } ] }"#,
    )
    .unwrap();
    assert!(matches!(
        ctx.load_scenario("orphan.json"),
        Err(RuntimeError::Scenario(ScenarioError::UnknownParent { .. }))
    ));

    fs::write(
        temp_dir.path().join("future.json"),
        r#"{ "version": 99, "entities": [], "elements": [] }"#,
    )
    .unwrap();
    assert!(ctx.load_scenario("future.json").is_err());

    assert!(ctx.load_scenario("missing.json").is_err());
    assert_eq!(ctx.scenario(), &before);
}

#[test]
fn test_json_round_trip_and_resync() {
    let temp_dir = TempDir::new().unwrap();
    let scene = Arc::new(MirrorScene::new());
    let mut ctx = ScenarioContext::builder()
        .config(RuntimeConfig::default().with_project_dir(temp_dir.path()))
        .scene(scene.clone())
        .build();
    ctx.initialize();
    ctx.add_elements(sample_elements()).unwrap();

    let json = ctx.scenario_json().unwrap();
    ctx.clear_scenario().unwrap();
    assert_eq!(ctx.lifecycle(), LifecycleState::ScenarioEmpty);
    assert!(ctx.elements().unwrap().is_empty());

    let resyncs = scene.resync_count();
    ctx.set_scenario_json(&json).unwrap();
    assert_eq!(ctx.elements().unwrap().len(), 2);
    assert_eq!(scene.resync_count(), resyncs + 1);
    assert_eq!(
        scene.transform("parcel").map(|t| t.origin),
        Some(Vector3D::new(0.1, 0.2, 0.8))
    );
}

#[test]
fn test_delete_missing_element_leaves_set_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context_in(&temp_dir);
    ctx.add_elements(sample_elements()).unwrap();
    let before = ctx.elements().unwrap();

    assert!(matches!(
        ctx.delete_element("ghost"),
        Err(RuntimeError::Scenario(ScenarioError::NotFound { .. }))
    ));
    assert_eq!(ctx.elements().unwrap(), before);
}

#[test]
fn test_delete_keeps_children_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let scene = Arc::new(MirrorScene::new());
    let mut ctx = ScenarioContext::builder()
        .config(RuntimeConfig::default().with_project_dir(temp_dir.path()))
        .scene(scene.clone())
        .build();
    ctx.initialize();
    ctx.add_elements(vec![
        ElementData::new(EntityData::new("shelf"), at(2.0, 0.0, 0.0)),
        ElementData::new(EntityData::new("parcel"), at(0.0, 0.0, 1.0).with_parent("shelf")),
    ])
    .unwrap();
    let world = ctx.element_location("parcel").unwrap();

    ctx.delete_element("shelf").unwrap();
    assert_eq!(ctx.element_location("parcel").unwrap(), world);
    assert_eq!(scene.transform("parcel").unwrap().parent(), None);
}

#[test]
fn test_bundled_warehouse_scenario_loads() {
    let mut ctx = ScenarioContext::builder()
        .config(RuntimeConfig::default().with_project_dir(data_dir()))
        .build();
    ctx.initialize();
    ctx.load_scenario("scenarios/warehouse.json").unwrap();

    let ids: Vec<String> = ctx
        .elements()
        .unwrap()
        .into_iter()
        .map(|e| e.entity.identifier)
        .collect();
    assert_eq!(ids, vec!["parcel", "robot", "shelf", "table"]);
    assert_eq!(ctx.entity_configuration("robot").unwrap(), "{\"speed\":1.5}");
}

#[test]
fn test_deinitialize_drops_content() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context_in(&temp_dir);
    ctx.add_elements(sample_elements()).unwrap();

    ctx.deinitialize();
    assert!(ctx.scenario().is_empty());
    assert!(matches!(ctx.elements(), Err(RuntimeError::NotInitialized)));
}

#[test]
fn test_simulation_playback_emits_events() {
    let scene = Arc::new(MirrorScene::new());
    let listener = Arc::new(RecordingListener::default());
    let mut ctx = ScenarioContext::builder()
        .config(RuntimeConfig::default().with_project_dir(data_dir()))
        .scene(scene.clone())
        .simulation_listener(listener.clone())
        .build();
    ctx.initialize_simulation();
    ctx.load_scenario("scenarios/warehouse.json").unwrap();

    ctx.load_simulation("simulations/delivery.ron").unwrap();
    assert!(ctx.valid_simulation());
    assert!(!ctx.simulation_started());
    assert_eq!(listener.take(), vec![SimulationEvent::Loaded]);

    ctx.play_simulation().unwrap();
    assert!(ctx.simulation_started());
    assert!(ctx.update_simulation(2.0).unwrap());
    assert_eq!(
        listener.take(),
        vec![
            SimulationEvent::Play,
            SimulationEvent::Updated,
            SimulationEvent::TimeChanged(0.5),
        ]
    );
    // Between t=1 and t=4 the parcel rides on the robot.
    assert_eq!(scene.transform("parcel").unwrap().parent(), Some("robot"));

    ctx.pause_simulation().unwrap();
    assert!(!ctx.update_simulation(1.0).unwrap());
    ctx.play_simulation().unwrap();
    ctx.update_simulation(5.0).unwrap();
    assert_eq!(
        listener.take(),
        vec![
            SimulationEvent::Pause,
            SimulationEvent::Play,
            SimulationEvent::Updated,
            SimulationEvent::TimeChanged(1.0),
            SimulationEvent::Stop,
        ]
    );
    assert_eq!(scene.transform("parcel").unwrap().parent(), Some("table"));
    assert_eq!(ctx.simulation_progress().unwrap(), 1.0);

    ctx.set_simulation_progress(0.0).unwrap();
    assert_eq!(scene.transform("parcel").unwrap().parent(), Some("shelf"));
    assert!(ctx.set_simulation_progress(2.0).is_err());
}

#[test]
fn test_simulation_document_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = ScenarioContext::builder()
        .config(RuntimeConfig::default().with_project_dir(temp_dir.path()))
        .build();
    ctx.initialize_simulation();

    let mut timeline = Timeline::new(2.0).unwrap();
    timeline.add_keyframe("cart", 0.0, at(0.0, 0.0, 0.0)).unwrap();
    timeline.add_keyframe("cart", 2.0, at(4.0, 0.0, 0.0)).unwrap();
    let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 31)
        .unwrap()
        .and_hms_opt(23, 59, 59)
        .unwrap();
    ctx.set_simulation(SimulationPlayer::new(timeline, Some(start)))
        .unwrap();
    ctx.save_simulation("sim.json").unwrap();

    ctx.clear_simulation().unwrap();
    assert!(!ctx.valid_simulation());

    ctx.load_simulation("sim.json").unwrap();
    ctx.play_simulation().unwrap();
    ctx.update_simulation(1.0).unwrap();
    assert_eq!(
        ctx.simulation_datetime_string().unwrap().as_deref(),
        Some("2025-02-01 00:00:00")
    );
}
