//! Transform synchronization between the scenario and a scene.

use std::sync::{Arc, Mutex};

use discen_core::{ElementData, EntityData, LocalTransformData, ScenarioError, Vector3D};
use discen_runtime::{
    DisplayMessage, LogLevel, MessageSink, MirrorScene, RuntimeError, ScenarioContext, SceneSync,
};

#[derive(Default)]
struct RecordingSink {
    messages: Mutex<Vec<DisplayMessage>>,
}

impl RecordingSink {
    fn warnings(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.level == LogLevel::Warning)
            .map(|m| m.message.clone())
            .collect()
    }
}

impl MessageSink for RecordingSink {
    fn display_message(&self, message: &DisplayMessage) {
        self.messages.lock().unwrap().push(message.clone());
    }
}

fn at(x: f32, y: f32, z: f32) -> LocalTransformData {
    LocalTransformData::identity().with_origin(Vector3D::new(x, y, z))
}

fn element(id: &str, transform: LocalTransformData) -> ElementData {
    ElementData::new(EntityData::new(id), transform)
}

fn context_with_scene() -> (ScenarioContext, Arc<MirrorScene>, Arc<RecordingSink>) {
    let scene = Arc::new(MirrorScene::new());
    let sink = Arc::new(RecordingSink::default());
    let mut ctx = ScenarioContext::builder()
        .scene(scene.clone())
        .message_sink(sink.clone())
        .build();
    ctx.initialize();
    ctx.add_elements(vec![
        element("shelf", at(0.0, 0.0, 0.0)),
        element("table", at(6.0, 2.0, 0.0)),
        element("parcel", at(0.0, 0.0, 0.8).with_parent("shelf")),
    ])
    .unwrap();
    (ctx, scene, sink)
}

#[test]
fn test_push_then_pull_returns_same_transform() {
    let (mut ctx, scene, _) = context_with_scene();
    let moved = at(1.5, -2.0, 0.25).with_parent("table");

    ctx.sync_scene_from_scenario("parcel", moved.clone()).unwrap();
    assert_eq!(scene.transform("parcel"), Some(moved.clone()));

    let pulled = ctx.sync_element_from_scene("parcel").unwrap();
    assert_eq!(pulled, moved);
    assert_eq!(ctx.scenario().transform("parcel").unwrap(), &moved);

    // Pushing the same transform again changes nothing.
    ctx.sync_scene_from_scenario("parcel", moved.clone()).unwrap();
    assert_eq!(scene.transform("parcel"), Some(moved));
}

#[test]
fn test_pull_reads_host_side_moves() {
    let (mut ctx, scene, _) = context_with_scene();
    scene.place("table", at(7.0, 2.0, 0.0));

    let pulled = ctx.sync_element_from_scene("table").unwrap();
    assert_eq!(pulled.origin, Vector3D::new(7.0, 2.0, 0.0));
    assert_eq!(
        ctx.element_location("table").unwrap(),
        Vector3D::new(7.0, 2.0, 0.0)
    );
}

#[test]
fn test_lerp_endpoints_keep_their_parents() {
    let (ctx, scene, _) = context_with_scene();
    let on_shelf = at(0.0, 0.0, 0.8).with_parent("shelf");
    let on_table = at(0.0, 0.0, 0.75).with_parent("table");

    ctx.lerp_transform("parcel", &on_shelf, &on_table, 0.0).unwrap();
    assert!(scene.transform("parcel").unwrap().approx_eq(&on_shelf, 1e-6));

    ctx.lerp_transform("parcel", &on_shelf, &on_table, 0.5).unwrap();
    let mid = scene.transform("parcel").unwrap();
    assert_eq!(mid.parent(), Some("shelf"));

    ctx.lerp_transform("parcel", &on_shelf, &on_table, 1.0).unwrap();
    assert_eq!(scene.transform("parcel"), Some(on_table));
}

#[test]
fn test_lerp_rejects_bad_trim() {
    let (ctx, _, sink) = context_with_scene();
    let a = at(0.0, 0.0, 0.0);

    for trim in [f32::NAN, -0.1, 1.5, f32::INFINITY] {
        assert!(matches!(
            ctx.lerp_transform("parcel", &a, &a, trim),
            Err(RuntimeError::InvalidTrim { .. })
        ));
    }
    assert_eq!(sink.warnings().len(), 4);
}

#[test]
fn test_lerp_rejects_non_finite_endpoints() {
    let (ctx, scene, sink) = context_with_scene();
    let before = scene.transform("parcel");
    let good = at(0.0, 0.0, 0.8).with_parent("shelf");
    let bad = at(f32::NAN, 0.0, 0.0).with_parent("table");

    for (from, to) in [(&good, &bad), (&bad, &good)] {
        assert!(matches!(
            ctx.lerp_transform("parcel", from, to, 0.5),
            Err(RuntimeError::Scenario(ScenarioError::NonFiniteTransform { .. }))
        ));
    }
    assert_eq!(scene.transform("parcel"), before);
    assert_eq!(sink.warnings().len(), 2);
}

#[test]
fn test_unknown_element_is_recoverable_and_reported() {
    let (mut ctx, _, sink) = context_with_scene();

    let err = ctx.sync_element_from_scene("ghost").unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Scenario(ScenarioError::NotFound { .. })
    ));
    assert!(
        ctx.sync_scene_from_scenario("ghost", at(0.0, 0.0, 0.0))
            .is_err()
    );

    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("ghost"));
}

#[test]
fn test_missing_scene_is_reported_without_side_effects() {
    let mut ctx = ScenarioContext::builder().build();
    ctx.initialize();
    ctx.add_element(element("crate", at(1.0, 0.0, 0.0))).unwrap();

    let err = ctx
        .sync_scene_from_scenario("crate", at(9.0, 0.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::NoListener { callback: "scene" }));
    assert_eq!(
        ctx.scenario().transform("crate").unwrap(),
        &at(1.0, 0.0, 0.0)
    );
    assert!(matches!(ctx.sync_scene(), Err(RuntimeError::NoListener { .. })));
}

#[test]
fn test_full_resync_in_both_directions() {
    let (mut ctx, scene, _) = context_with_scene();
    assert_eq!(scene.len(), 3);

    assert_eq!(ctx.sync_scene().unwrap(), 3);
    assert_eq!(scene.resync_count(), 1);

    scene.place("shelf", at(0.0, 3.0, 0.0));
    scene.remove("table");
    assert_eq!(ctx.sync_scenario().unwrap(), 2);
    assert_eq!(
        ctx.scenario().transform("shelf").unwrap().origin,
        Vector3D::new(0.0, 3.0, 0.0)
    );
    assert_eq!(
        ctx.scenario().transform("table").unwrap(),
        &at(6.0, 2.0, 0.0)
    );

    ctx.request_scenario_resync().unwrap();
    assert_eq!(scene.resync_request_count(), 1);
}

#[test]
fn test_scenario_pull_is_atomic() {
    let (mut ctx, scene, _) = context_with_scene();
    let before = ctx.scenario().clone();

    scene.place("shelf", at(0.0, 5.0, 0.0));
    // An unknown parent on the last element rejects the whole pull.
    scene.place("table", at(0.0, 0.0, 0.0).with_parent("ghost"));
    assert!(ctx.sync_scenario().is_err());
    assert_eq!(ctx.scenario(), &before);
}

#[test]
fn test_scene_listener_is_silent_until_initialize() {
    let scene = Arc::new(MirrorScene::new());
    let mut ctx = ScenarioContext::builder().scene(scene.clone()).build();
    assert!(
        ctx.add_element(element("crate", at(0.0, 0.0, 0.0)))
            .is_err()
    );
    assert!(scene.pull_transform("crate").is_none());

    ctx.initialize();
    ctx.add_element(element("crate", at(0.0, 0.0, 0.0))).unwrap();
    assert!(scene.pull_transform("crate").is_some());
}

fn assert_scene_matches_scenario(ctx: &ScenarioContext, scene: &MirrorScene, id: &str) {
    assert_eq!(
        scene.transform(id).as_ref(),
        Some(ctx.scenario().transform(id).unwrap()),
        "scene copy of {id} diverged"
    );
}

#[test]
fn test_deleting_a_parent_element_updates_children_in_scene() {
    let (mut ctx, scene, _) = context_with_scene();
    ctx.sync_scene_from_scenario("shelf", at(3.0, 0.0, 0.0))
        .unwrap();

    ctx.delete_element("shelf").unwrap();

    let parcel = ctx.scenario().transform("parcel").unwrap();
    assert_eq!(parcel.parent(), None);
    assert!(parcel.origin.approx_eq(Vector3D::new(3.0, 0.0, 0.8), 1e-6));
    assert_scene_matches_scenario(&ctx, &scene, "parcel");
}

#[test]
fn test_deleting_a_parent_entity_updates_children_in_scene() {
    let (mut ctx, scene, _) = context_with_scene();
    ctx.sync_scene_from_scenario("shelf", at(3.0, 0.0, 0.0))
        .unwrap();

    let removed = ctx.delete_entity("shelf").unwrap();
    assert_eq!(removed.identifier, "shelf");
    assert!(!ctx.scenario().contains("shelf"));

    let parcel = ctx.scenario().transform("parcel").unwrap();
    assert_eq!(parcel.parent(), None);
    assert!(parcel.origin.approx_eq(Vector3D::new(3.0, 0.0, 0.8), 1e-6));
    assert_scene_matches_scenario(&ctx, &scene, "parcel");
    assert_scene_matches_scenario(&ctx, &scene, "table");
}

#[test]
fn test_deleting_a_plain_entity_leaves_scene_alone() {
    let (mut ctx, scene, _) = context_with_scene();
    ctx.add_entity(EntityData::new("aisle")).unwrap();

    ctx.delete_entity("aisle").unwrap();
    assert!(!ctx.scenario().contains("aisle"));
    assert_eq!(scene.len(), 3);
    assert!(ctx.delete_entity("aisle").is_err());
}
