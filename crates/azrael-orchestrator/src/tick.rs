//! The tick orchestrator: phases A through G of one simulation step.

use crate::{force, geometry};
use azrael_core::{AabbData, Body, BodyId, BodyPatch, Command, CommandError, TemplateRegistry};
use azrael_config::OrchestratorConfig;
use azrael_forcegrid::ForceGrid;
use azrael_geom::broad::{AabbTree, BroadPhase};
use azrael_geom::partition_islands;
use azrael_math::Vec3;
use azrael_queue::{CommandConsumer, CommandOutcome};
use azrael_store::StateStore;
use azrael_worker::{BodySnapshot, WorkerPool, WorkerRequest};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Maps a [`BodyId`] to the `usize` proxy id broadphase and island
/// partitioning operate on. Saturates rather than panics on platforms where
/// `usize` is narrower than `u64`.
fn body_index(id: BodyId) -> usize {
    usize::try_from(id.value()).unwrap_or(usize::MAX)
}

/// Summary of one completed tick, returned for observability and tests.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// The tick nonce assigned to this tick (Phase A onward).
    pub nonce: u64,
    /// Commands that applied successfully in Phase A.
    pub commands_applied: usize,
    /// Commands rejected in Phase A (not found, invalid payload).
    pub commands_rejected: usize,
    /// Commands that lost the CAS race after exhausting retries.
    pub commands_conflicted: usize,
    /// Islands dispatched to the worker pool in Phase E.
    pub islands_dispatched: usize,
    /// Islands whose reply never arrived before the global deadline.
    pub islands_failed: usize,
    /// Bodies whose physics update committed in Phase F.
    pub bodies_committed: usize,
    /// Bodies whose physics update lost the CAS race in Phase F.
    pub bodies_conflicted: usize,
    /// Contacts detected this tick, forwarded as informational records.
    pub contacts: Vec<azrael_core::ContactPair>,
    /// `true` if this tick's own processing exceeded `tick_period_secs`.
    pub overran: bool,
}

/// Drives the command queue, state store, force grid, and worker pool
/// through one tick at a time.
///
/// Exactly one orchestrator instance should run against a given
/// [`StateStore`]; `tick_once` is not reentrant (it mutates `tick_nonce`)
/// but nothing prevents constructing several against independent stores,
/// e.g. in tests.
pub struct Orchestrator<S, W> {
    store: Arc<S>,
    consumer: CommandConsumer,
    templates: TemplateRegistry,
    workers: Arc<W>,
    grid: ForceGrid,
    config: OrchestratorConfig,
    tick_nonce: u64,
}

impl<S, W> Orchestrator<S, W>
where
    S: StateStore + 'static,
    W: WorkerPool + 'static,
{
    /// Builds an orchestrator from its component ports.
    #[must_use]
    pub fn new(store: Arc<S>, consumer: CommandConsumer, workers: Arc<W>, config: OrchestratorConfig) -> Self {
        let grid = ForceGrid::from_config(&config.force_grid);
        Self {
            store,
            consumer,
            templates: TemplateRegistry::with_builtins(),
            workers,
            grid,
            config,
            tick_nonce: 0,
        }
    }

    /// Direct access to the ambient force grid, e.g. for a façade to paint
    /// wind zones or terrain forces outside of the command stream.
    pub fn force_grid_mut(&mut self) -> &mut ForceGrid {
        &mut self.grid
    }

    /// Answers every command still waiting in the queue with
    /// [`CommandOutcome::Shutdown`] without applying them, then drops them.
    ///
    /// Called once by the hosting process on a graceful shutdown, after the
    /// tick loop has stopped calling `tick_once`.
    pub fn drain_pending_as_shutdown(&mut self) {
        for queued in self.consumer.drain() {
            let _ = queued.reply.send(CommandOutcome::Shutdown);
        }
    }

    /// Runs the tick loop forever at `config.tick_period_secs`.
    ///
    /// Ticks never overlap: the next `tick_once` only starts once the
    /// previous one (including its worker dispatch) has returned.
    pub async fn run(&mut self) -> ! {
        let tick_period = Duration::from_secs_f64(self.config.tick_period_secs);
        let mut interval = tokio::time::interval(tick_period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        info!(?tick_period, "orchestrator started");
        loop {
            interval.tick().await;
            let report = self.tick_once().await;
            if report.overran {
                warn!(nonce = report.nonce, "tick overran its period");
            } else {
                debug!(nonce = report.nonce, applied = report.commands_applied, "tick complete");
            }
        }
    }

    /// Advances the simulation by exactly one tick, phases A through G.
    pub async fn tick_once(&mut self) -> TickReport {
        let tick_start = Instant::now();
        self.tick_nonce += 1;
        let nonce = self.tick_nonce;
        let mut report = TickReport { nonce, ..TickReport::default() };

        // Phase A — command intake.
        for queued in self.consumer.drain() {
            let outcome = self.apply_command(queued.command);
            match &outcome {
                CommandOutcome::Applied { .. } => report.commands_applied += 1,
                CommandOutcome::Rejected(_) => report.commands_rejected += 1,
                CommandOutcome::Conflict => report.commands_conflicted += 1,
                CommandOutcome::Shutdown => {}
            }
            let _ = queued.reply.send(outcome);
        }

        // Phase B — world load.
        let world = self.store.get_all();

        // Phase C — force accumulation.
        let mut external_forces = BTreeMap::new();
        for (id, body) in &world {
            if body.inv_mass > 0.0 && !body.sleeping && !body.shape.is_empty() {
                external_forces.insert(*id, force::accumulate(body, &self.grid));
            }
        }

        // Phase D — broadphase and islands.
        let id_lookup: BTreeMap<usize, BodyId> = world.keys().map(|id| (body_index(*id), *id)).collect();

        let mut broad = AabbTree::new();
        for (id, body) in &world {
            if let Some(aabb) = geometry::world_aabb(body) {
                broad.upsert(body_index(*id), aabb);
            }
        }
        let pairs = broad.pairs();

        let active: BTreeSet<usize> = world
            .iter()
            .filter(|(_, body)| body.inv_mass > 0.0 && !body.sleeping && !body.shape.is_empty())
            .map(|(id, _)| body_index(*id))
            .collect();

        let mut static_neighbors: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        for &(a, b) in &pairs {
            let a_active = active.contains(&a);
            let b_active = active.contains(&b);
            if a_active && !b_active {
                static_neighbors.entry(a).or_default().insert(b);
            }
            if b_active && !a_active {
                static_neighbors.entry(b).or_default().insert(a);
            }
        }

        let islands = partition_islands(active.iter().copied(), &pairs);

        // Phase E — dispatch, bounded by a global deadline.
        let worker_timeout = Duration::from_secs_f64(self.config.worker_timeout_secs);
        let global_deadline = Duration::from_secs_f64(self.config.deadline_secs());
        let dt = self.config.tick_period_secs as f32;

        let mut joinset = JoinSet::new();
        for island in &islands {
            if island.len() > self.config.max_island_size {
                warn!(size = island.len(), max = self.config.max_island_size, "oversized island dispatched whole");
            }
            let mut bodies = Vec::with_capacity(island.len());
            let mut ext = BTreeMap::new();
            for &member in island {
                let Some(&body_id) = id_lookup.get(&member) else { continue };
                let Some(body) = world.get(&body_id) else { continue };
                bodies.push(to_snapshot(body_id, body, false));
                if let Some(f) = external_forces.get(&body_id) {
                    ext.insert(body_id, *f);
                }
            }
            let mut statics = BTreeSet::new();
            for member in island {
                if let Some(neighbors) = static_neighbors.get(member) {
                    statics.extend(neighbors.iter().copied());
                }
            }
            for member in statics {
                let Some(&body_id) = id_lookup.get(&member) else { continue };
                let Some(body) = world.get(&body_id) else { continue };
                bodies.push(to_snapshot(body_id, body, true));
            }

            let island_id = island.first().map_or(0, |&m| m as u64);
            let request = WorkerRequest {
                island_id,
                tick_nonce: nonce,
                dt,
                max_substeps: self.config.max_substeps,
                bodies,
                external_forces: ext,
            };
            report.islands_dispatched += 1;
            let workers = Arc::clone(&self.workers);
            joinset.spawn(async move { workers.submit(request, worker_timeout).await });
        }

        let mut replies = Vec::new();
        let deadline_sleep = tokio::time::sleep(global_deadline);
        tokio::pin!(deadline_sleep);
        loop {
            tokio::select! {
                joined = joinset.join_next() => {
                    match joined {
                        None => break,
                        Some(Ok(Ok(reply))) if reply.tick_nonce == nonce => replies.push(reply),
                        Some(Ok(Ok(_stale))) => {}
                        Some(Ok(Err(worker_err))) => {
                            warn!(%worker_err, "island solve failed");
                            report.islands_failed += 1;
                        }
                        Some(Err(join_err)) => {
                            warn!(%join_err, "island task panicked");
                            report.islands_failed += 1;
                        }
                    }
                }
                () = &mut deadline_sleep => {
                    report.islands_failed += joinset.len();
                    joinset.abort_all();
                    warn!(?global_deadline, "tick dispatch deadline exceeded, aborting outstanding islands");
                    break;
                }
            }
        }

        // Phase F — merge & commit.
        let contact_ids: BTreeSet<BodyId> = replies
            .iter()
            .flat_map(|reply| reply.contacts.iter().flat_map(|c| [c.a, c.b]))
            .collect();

        let mut writes = BTreeMap::new();
        let mut expected_versions = BTreeMap::new();
        for reply in &replies {
            report.contacts.extend(reply.contacts.iter().copied());
            for update in &reply.bodies {
                let Some(original) = world.get(&update.id) else { continue };
                if original.version != update.version {
                    report.bodies_conflicted += 1;
                    continue;
                }
                let mut new_body = original.clone();
                new_body.position = update.position;
                new_body.orientation = update.orientation;
                new_body.v_lin = update.v_lin;
                new_body.v_ang = update.v_ang;
                new_body.renormalize_orientation(self.config.quaternion_renorm_eps);
                new_body.aabb = geometry::world_aabb(&new_body).map(to_aabb_data);

                // Phase G — sleep bookkeeping, folded in while we still hold `new_body`.
                if contact_ids.contains(&update.id) {
                    new_body.sleeping = false;
                    new_body.sleep_ticks = 0;
                } else if new_body.is_at_rest(self.config.sleep.linear_epsilon, self.config.sleep.angular_epsilon) {
                    new_body.sleep_ticks = new_body.sleep_ticks.saturating_add(1);
                    if new_body.sleep_ticks >= self.config.sleep.consecutive_ticks {
                        new_body.sleeping = true;
                    }
                } else {
                    new_body.sleep_ticks = 0;
                    new_body.sleeping = false;
                }

                writes.insert(update.id, new_body);
                expected_versions.insert(update.id, update.version);
            }
        }

        let commit = self.store.commit_batch(writes, &expected_versions);
        report.bodies_committed += commit.committed.len();
        report.bodies_conflicted += commit.conflicted.len();

        report.overran = tick_start.elapsed() > Duration::from_secs_f64(self.config.tick_period_secs);
        report
    }

    fn apply_command(&self, command: Command) -> CommandOutcome {
        match command {
            Command::Spawn { template, overrides } => match self.templates.instantiate(&template) {
                Some(mut body) => {
                    apply_patch(&mut body, &overrides);
                    body.aabb = geometry::world_aabb(&body).map(to_aabb_data);
                    let id = self.store.add(body);
                    CommandOutcome::Applied { spawned: Some(id) }
                }
                None => CommandOutcome::Rejected(CommandError::Validation(format!(
                    "unknown template {}",
                    template.as_str()
                ))),
            },
            Command::Remove { body_id } => {
                self.store.remove(&[body_id]);
                CommandOutcome::Applied { spawned: None }
            }
            Command::SetBody { body_id, patch } => {
                self.cas_retry(body_id, |body| {
                    apply_patch(body, &patch);
                    Ok(())
                })
            }
            Command::SetForce { body_id, booster_index, force } => self.cas_retry(body_id, |body| {
                let booster = body
                    .boosters
                    .get_mut(booster_index)
                    .ok_or(CommandError::InvalidBoosterIndex { body: body_id, index: booster_index })?;
                booster.force = force;
                Ok(())
            }),
            Command::ApplyImpulse { body_id, linear, angular } => self.cas_retry(body_id, |body| {
                let inv_mass = body.inv_mass;
                body.v_lin = Vec3::from(body.v_lin).add(&Vec3::from(linear).scale(inv_mass)).to_array();
                body.v_ang = Vec3::from(body.v_ang).add(&Vec3::from(angular).scale(inv_mass)).to_array();
                Ok(())
            }),
        }
    }

    fn cas_retry<F>(&self, body_id: BodyId, mut mutate: F) -> CommandOutcome
    where
        F: FnMut(&mut Body) -> Result<(), CommandError>,
    {
        for _ in 0..=self.config.command_retry_limit {
            let current = self.store.get(&[body_id]);
            let Some(body) = current.get(&body_id) else {
                return CommandOutcome::Rejected(CommandError::NotFound(body_id));
            };
            let mut new_body = body.clone();
            if let Err(err) = mutate(&mut new_body) {
                return CommandOutcome::Rejected(err);
            }
            new_body.aabb = geometry::world_aabb(&new_body).map(to_aabb_data);
            new_body.sleeping = false;
            new_body.sleep_ticks = 0;
            let expected = body.version;
            let outcome = self
                .store
                .commit_batch(BTreeMap::from([(body_id, new_body)]), &BTreeMap::from([(body_id, expected)]));
            if outcome.committed.contains(&body_id) {
                return CommandOutcome::Applied { spawned: None };
            }
        }
        CommandOutcome::Conflict
    }
}

fn to_aabb_data(aabb: azrael_geom::Aabb) -> AabbData {
    AabbData { min: aabb.min().to_array(), max: aabb.max().to_array() }
}

fn apply_patch(body: &mut Body, patch: &BodyPatch) {
    if let Some(position) = patch.position {
        body.position = position;
    }
    if let Some(orientation) = patch.orientation {
        body.orientation = azrael_math::Quat::from(orientation).normalize().to_array();
    }
    if let Some(v_lin) = patch.v_lin {
        body.v_lin = v_lin;
    }
    if let Some(v_ang) = patch.v_ang {
        body.v_ang = v_ang;
    }
    if let Some(inv_mass) = patch.inv_mass {
        body.inv_mass = inv_mass;
    }
    if let Some(restitution) = patch.restitution {
        body.restitution = restitution;
    }
    if let Some(friction) = patch.friction {
        body.friction = friction;
    }
}

fn to_snapshot(id: BodyId, body: &Body, force_static: bool) -> BodySnapshot {
    BodySnapshot {
        id,
        version: body.version,
        position: body.position,
        orientation: body.orientation,
        v_lin: body.v_lin,
        v_ang: body.v_ang,
        inv_mass: if force_static { 0.0 } else { body.inv_mass },
        restitution: body.restitution,
        friction: body.friction,
        linear_damping: body.linear_damping,
        angular_damping: body.angular_damping,
        shape: body.shape.clone(),
        scale: body.scale,
    }
}
