use azrael_config::OrchestratorConfig;
use azrael_core::{BodyPatch, Command, TemplateId};
use azrael_core::BodyId;
use azrael_orchestrator::Orchestrator;
use azrael_queue::CommandOutcome;
use azrael_store::{InMemoryStore, StateStore};
use azrael_worker::{InProcessPool, WorkerError, WorkerPool, WorkerReply, WorkerRequest};
use azrael_math::Vec3;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn test_config() -> OrchestratorConfig {
    OrchestratorConfig {
        tick_period_secs: 1.0,
        max_substeps: 8,
        pool_size: 2,
        ..OrchestratorConfig::default()
    }
}

fn new_orchestrator(
    config: OrchestratorConfig,
) -> (Orchestrator<InMemoryStore, InProcessPool>, azrael_queue::CommandProducer, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let (producer, consumer) = azrael_queue::bounded(config.command_queue_capacity);
    let workers = Arc::new(InProcessPool::new(config.pool_size));
    let orchestrator = Orchestrator::new(Arc::clone(&store), consumer, workers, config);
    (orchestrator, producer, store)
}

async fn spawn(
    orchestrator: &mut Orchestrator<InMemoryStore, InProcessPool>,
    producer: &azrael_queue::CommandProducer,
    template: &str,
    overrides: BodyPatch,
) -> BodyId {
    let rx = producer
        .enqueue(Command::Spawn { template: TemplateId::new(template), overrides })
        .expect("queue has room");
    orchestrator.tick_once().await;
    match rx.await.expect("spawn reply arrives") {
        CommandOutcome::Applied { spawned: Some(id) } => id,
        other => panic!("expected a spawned body id, got {other:?}"),
    }
}

#[tokio::test]
async fn free_flight_moves_in_a_straight_line() {
    let (mut orchestrator, producer, store) = new_orchestrator(test_config());
    let id = spawn(
        &mut orchestrator,
        &producer,
        "unit_sphere",
        BodyPatch {
            position: Some([0.0, 50.0, 0.0]),
            v_lin: Some([2.0, 0.0, 0.0]),
            ..BodyPatch::default()
        },
    )
    .await;

    orchestrator.tick_once().await;

    let body = &store.get(&[id])[&id];
    assert!((body.position[0] - 2.0).abs() < 1e-2, "body should drift 2m in x: {body:?}");
}

#[tokio::test]
async fn booster_thrust_accelerates_the_body() {
    let (mut orchestrator, producer, store) = new_orchestrator(test_config());
    let id = spawn(&mut orchestrator, &producer, "unit_sphere", BodyPatch::default()).await;

    // Mount an inert booster directly through the store — mounting a new
    // actuator isn't itself a command; SetForce only adjusts an existing
    // booster's magnitude, which is what this test exercises.
    let mut body = store.get(&[id])[&id].clone();
    body.boosters.push(azrael_core::Booster::new([0.0, 0.0, 0.0], Vec3::new(1.0, 0.0, 0.0), 0.0));
    let expected = body.version;
    let mount = store.commit_batch(BTreeMap::from([(id, body)]), &BTreeMap::from([(id, expected)]));
    assert_eq!(mount.committed, vec![id]);

    let rx = producer
        .enqueue(Command::SetForce { body_id: id, booster_index: 0, force: 20.0 })
        .expect("queue has room");
    orchestrator.tick_once().await;
    assert_eq!(rx.await.expect("reply"), CommandOutcome::Applied { spawned: None });

    let after = &store.get(&[id])[&id];
    assert!(after.v_lin[0] > 0.5, "booster thrust should accelerate the body: {after:?}");
}

#[tokio::test]
async fn two_spheres_bounce_apart_on_collision() {
    let (mut orchestrator, producer, store) = new_orchestrator(test_config());
    let a = spawn(
        &mut orchestrator,
        &producer,
        "unit_sphere",
        BodyPatch { position: Some([-0.9, 0.0, 0.0]), v_lin: Some([1.0, 0.0, 0.0]), ..BodyPatch::default() },
    )
    .await;
    let b = spawn(
        &mut orchestrator,
        &producer,
        "unit_sphere",
        BodyPatch { position: Some([0.9, 0.0, 0.0]), v_lin: Some([-1.0, 0.0, 0.0]), ..BodyPatch::default() },
    )
    .await;

    let report = orchestrator.tick_once().await;
    assert!(!report.contacts.is_empty(), "a contact should have been detected");

    let body_a = &store.get(&[a])[&a];
    let body_b = &store.get(&[b])[&b];
    assert!(body_a.v_lin[0] < 0.0, "body a should bounce back: {body_a:?}");
    assert!(body_b.v_lin[0] > 0.0, "body b should bounce back: {body_b:?}");
}

#[tokio::test]
async fn sphere_settles_on_static_plane_and_eventually_sleeps() {
    let mut config = test_config();
    config.tick_period_secs = 0.05;
    config.sleep.consecutive_ticks = 3;
    config.sleep.linear_epsilon = 0.05;
    let (mut orchestrator, producer, store) = new_orchestrator(config);

    let _plane = spawn(&mut orchestrator, &producer, "ground_plane", BodyPatch::default()).await;
    let ball = spawn(
        &mut orchestrator,
        &producer,
        "unit_sphere",
        BodyPatch { position: Some([0.0, 1.05, 0.0]), ..BodyPatch::default() },
    )
    .await;

    let mut fell_asleep = false;
    for _ in 0..200 {
        orchestrator.tick_once().await;
        if store.get(&[ball])[&ball].sleeping {
            fell_asleep = true;
            break;
        }
    }

    assert!(fell_asleep, "ball resting on a static plane should eventually sleep");
    let body = &store.get(&[ball])[&ball];
    assert!(body.position[1] >= 1.0 - 0.1, "ball should rest above the plane, not sink through: {body:?}");
}

#[tokio::test]
async fn static_body_never_moves_without_a_direct_command() {
    let (mut orchestrator, producer, store) = new_orchestrator(test_config());
    let id = spawn(&mut orchestrator, &producer, "ground_plane", BodyPatch::default()).await;
    let before = store.get(&[id])[&id].clone();

    orchestrator.tick_once().await;
    orchestrator.tick_once().await;

    let after = &store.get(&[id])[&id];
    assert_eq!(before.position, after.position);
    assert_eq!(before.orientation, after.orientation);
}

#[tokio::test]
async fn force_grid_push_accelerates_a_resting_body() {
    let (mut orchestrator, producer, store) = new_orchestrator(test_config());
    orchestrator.force_grid_mut().set_region(
        Vec3::new(-10.0, -10.0, -10.0),
        Vec3::new(10.0, 10.0, 10.0),
        Vec3::new(0.0, 5.0, 0.0),
    );

    let id = spawn(&mut orchestrator, &producer, "unit_sphere", BodyPatch::default()).await;
    orchestrator.tick_once().await;

    let body = &store.get(&[id])[&id];
    assert!(body.v_lin[1] > 0.1, "ambient push should accelerate the body upward: {body:?}");
}

#[tokio::test]
async fn commands_enqueued_between_ticks_apply_on_the_following_tick() {
    let (mut orchestrator, producer, store) = new_orchestrator(test_config());
    let id = spawn(&mut orchestrator, &producer, "unit_sphere", BodyPatch::default()).await;

    let rx = producer
        .enqueue(Command::ApplyImpulse { body_id: id, linear: [3.0, 0.0, 0.0], angular: [0.0, 0.0, 0.0] })
        .expect("queue has room");
    let report = orchestrator.tick_once().await;
    assert_eq!(report.commands_applied, 1);
    assert_eq!(rx.await.expect("reply"), CommandOutcome::Applied { spawned: None });

    let body = &store.get(&[id])[&id];
    assert!((body.v_lin[0] - 3.0).abs() < 1e-4, "impulse should land before physics integrates it: {body:?}");
}

#[tokio::test]
async fn an_empty_tick_commits_and_dispatches_nothing() {
    let (mut orchestrator, _producer, _store) = new_orchestrator(test_config());
    let report = orchestrator.tick_once().await;
    assert_eq!(report.islands_dispatched, 0);
    assert_eq!(report.bodies_committed, 0);
    assert_eq!(report.commands_applied, 0);
}

/// Wraps [`InProcessPool`], racing a `SetBody`-shaped CAS write against the
/// first island it dispatches. Mirrors exactly what `Command::SetBody`'s own
/// `cas_retry` path would commit — this orchestrator never overlaps ticks,
/// so the only way to observe a command landing while an island's reply is
/// still in flight is to land it from inside the pool that island was
/// dispatched to.
struct ConflictInjectingPool {
    inner: InProcessPool,
    store: Arc<InMemoryStore>,
    target: BodyId,
    injected: AtomicBool,
}

#[async_trait::async_trait]
impl WorkerPool for ConflictInjectingPool {
    async fn submit(&self, request: WorkerRequest, timeout: Duration) -> Result<WorkerReply, WorkerError> {
        if !self.injected.swap(true, Ordering::SeqCst) {
            if let Some(current) = self.store.get(&[self.target]).remove(&self.target) {
                let mut raced = current.clone();
                raced.position = [100.0, 0.0, 0.0];
                let expected = current.version;
                self.store.commit_batch(
                    BTreeMap::from([(self.target, raced)]),
                    &BTreeMap::from([(self.target, expected)]),
                );
            }
        }
        self.inner.submit(request, timeout).await
    }
}

#[tokio::test]
async fn a_command_racing_a_physics_reply_wins_the_cas_and_the_stale_reply_is_discarded() {
    let mut config = test_config();
    config.pool_size = 1;
    let store = Arc::new(InMemoryStore::new());

    let mut body = azrael_core::TemplateRegistry::with_builtins()
        .instantiate(&TemplateId::new("unit_sphere"))
        .expect("unit_sphere is built in");
    body.position = [0.0, 50.0, 0.0];
    body.v_lin = [2.0, 0.0, 0.0];
    let id = store.add(body);

    let (_producer, consumer) = azrael_queue::bounded(config.command_queue_capacity);
    let workers = Arc::new(ConflictInjectingPool {
        inner: InProcessPool::new(config.pool_size),
        store: Arc::clone(&store),
        target: id,
        injected: AtomicBool::new(false),
    });
    let mut orchestrator = Orchestrator::new(Arc::clone(&store), consumer, workers, config);

    let report = orchestrator.tick_once().await;
    assert_eq!(report.bodies_conflicted, 1, "the racing command should win via a CAS conflict on the physics merge: {report:?}");
    assert_eq!(report.bodies_committed, 0);

    let after = &store.get(&[id])[&id];
    assert_eq!(after.position, [100.0, 0.0, 0.0], "the command's write must win; the stale physics reply is discarded");
}
