//! Deferred jobs: validation and payment at scheduling time, completion on the
//! first sweep at or after the job's duration.
//!
//! No timers live in memory. A job is a pending record stamped with its start
//! time; each sweep compares elapsed ticks against the kind's duration.

use super::combat::{AttackResolution, resolve_attack};
use super::context::TickContext;
use super::espionage::{MissionOutcome, resolve_mission};
use super::npc::traits::{TraitEvent, nudge};
use crate::content::GameConfig;
use crate::error::CommandError;
use crate::model::{
    AttackId, Cost, Entity, EntityId, Job, JobId, JobKind, JobPayload, JobStatus, scale_cost,
};
use crate::store::RecordStore;

/// Tally of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub completed: usize,
    pub invalid: usize,
}

impl std::ops::AddAssign for SweepReport {
    fn add_assign(&mut self, other: Self) {
        self.completed += other.completed;
        self.invalid += other.invalid;
    }
}

/// Ticks a job of this payload must wait. `None` for content that no longer exists.
pub fn job_duration(content: &GameConfig, payload: &JobPayload) -> Option<u64> {
    match payload {
        JobPayload::Training { .. } => Some(content.training.ticks),
        JobPayload::Construction { building } => content.building(building).map(|b| b.build_ticks),
        JobPayload::Espionage { action, .. } => Some(content.espionage.action(*action).ticks),
        JobPayload::SpyTraining { .. } => Some(content.espionage.spy_training_ticks),
    }
}

fn owner_of<'s>(store: &'s dyn RecordStore, owner: EntityId) -> Result<&'s Entity, CommandError> {
    store.entity(owner).ok_or(CommandError::UnknownEntity(owner))
}

fn owner_of_mut<'s>(
    store: &'s mut dyn RecordStore,
    owner: EntityId,
) -> Result<&'s mut Entity, CommandError> {
    store.entity_mut(owner).ok_or(CommandError::UnknownEntity(owner))
}

fn queued_amount(store: &dyn RecordStore, owner: EntityId, kind: JobKind) -> u32 {
    store
        .pending_jobs_for(owner, kind)
        .iter()
        .map(|job| match &job.payload {
            JobPayload::Training { amount } | JobPayload::SpyTraining { amount } => *amount,
            _ => 1,
        })
        .fold(0u32, u32::saturating_add)
}

/// False when the sum exceeds the cap or does not fit in a `u32` at all.
fn fits_under_cap(parts: [u32; 3], cap: u32) -> bool {
    parts
        .into_iter()
        .try_fold(0u32, u32::checked_add)
        .is_some_and(|total| total <= cap)
}

/// Validate, pay for and enqueue a job. On error nothing was mutated.
pub fn schedule(
    ctx: &mut TickContext<'_>,
    owner: EntityId,
    payload: JobPayload,
) -> Result<JobId, CommandError> {
    match &payload {
        JobPayload::Training { amount } => reserve_training(ctx, owner, *amount)?,
        JobPayload::Construction { building } => reserve_construction(ctx, owner, building)?,
        JobPayload::Espionage { action, target } => {
            let cost = ctx.content.espionage.action(*action).cost.clone();
            reserve_mission(ctx, owner, *target, &cost)?
        }
        JobPayload::SpyTraining { amount } => reserve_spy_training(ctx, owner, *amount)?,
    }

    let kind = payload.kind();
    let duration = job_duration(ctx.content, &payload).unwrap_or(0);
    let id = ctx.store.insert_job(owner, payload, ctx.now);
    if let Some(entity) = ctx.store.entity_mut(owner) {
        entity.last_active = ctx.now;
    }
    tracing::debug!(category = "JOBS", owner, job = id, kind = %kind, ticks = duration, "job queued");
    Ok(id)
}

fn reserve_training(ctx: &mut TickContext<'_>, owner: EntityId, amount: u32) -> Result<(), CommandError> {
    if amount == 0 {
        return Err(CommandError::NonPositiveAmount);
    }
    let cfg = &ctx.content.training;
    let queued = queued_amount(ctx.store, owner, JobKind::Training);
    let deployed: u32 = ctx
        .store
        .pending_attacks()
        .iter()
        .filter(|a| a.attacker == owner)
        .map(|a| a.troops)
        .fold(0u32, u32::saturating_add);
    let entity = owner_of(ctx.store, owner)?;

    let current = entity.troops.saturating_add(deployed);
    if !fits_under_cap([current, queued, amount], entity.max_troops) {
        return Err(CommandError::Capacity {
            current,
            queued,
            requested: amount,
            cap: entity.max_troops,
        });
    }
    let population = amount.checked_mul(cfg.population_per_troop).unwrap_or(u32::MAX);
    if entity.population < population {
        return Err(CommandError::Population {
            needed: population,
            held: entity.population,
        });
    }
    let cost = scale_cost(&cfg.troop_cost, f64::from(amount));
    entity.resources.check(&cost)?;

    let entity = owner_of_mut(ctx.store, owner)?;
    entity.resources.consume(&cost)?;
    entity.population -= population;
    Ok(())
}

fn reserve_construction(
    ctx: &mut TickContext<'_>,
    owner: EntityId,
    building: &str,
) -> Result<(), CommandError> {
    let def = ctx
        .content
        .building(building)
        .ok_or_else(|| CommandError::UnknownBuilding(building.to_string()))?;
    let queued = ctx
        .store
        .pending_jobs_for(owner, JobKind::Construction)
        .iter()
        .filter(|j| matches!(&j.payload, JobPayload::Construction { building: b } if b == building))
        .count() as u32;
    let entity = owner_of(ctx.store, owner)?;
    if let Some(max) = def.max_level {
        if entity.building_level(building) + queued >= max {
            return Err(CommandError::MaxLevel(building.to_string()));
        }
    }
    entity.resources.check(&def.cost)?;
    owner_of_mut(ctx.store, owner)?.resources.consume(&def.cost)?;
    Ok(())
}

fn reserve_mission(
    ctx: &mut TickContext<'_>,
    owner: EntityId,
    target: EntityId,
    cost: &Cost,
) -> Result<(), CommandError> {
    if owner == target {
        return Err(CommandError::SelfTarget);
    }
    owner_of(ctx.store, target)?;
    let entity = owner_of(ctx.store, owner)?;
    if entity.spies == 0 {
        return Err(CommandError::NoSpies);
    }
    entity.resources.check(cost)?;

    let entity = owner_of_mut(ctx.store, owner)?;
    entity.resources.consume(cost)?;
    entity.spies -= 1;
    Ok(())
}

fn reserve_spy_training(ctx: &mut TickContext<'_>, owner: EntityId, amount: u32) -> Result<(), CommandError> {
    if amount == 0 {
        return Err(CommandError::NonPositiveAmount);
    }
    let cfg = &ctx.content.espionage;
    // spies away on missions still count against the cap
    let queued = queued_amount(ctx.store, owner, JobKind::SpyTraining)
        .saturating_add(queued_amount(ctx.store, owner, JobKind::Espionage));
    let entity = owner_of(ctx.store, owner)?;
    let cap = entity
        .building_level(&cfg.academy_building)
        .saturating_mul(cfg.spies_per_academy_level);
    if !fits_under_cap([entity.spies, queued, amount], cap) {
        return Err(CommandError::Capacity {
            current: entity.spies,
            queued,
            requested: amount,
            cap,
        });
    }
    let cost = scale_cost(&cfg.spy_cost, f64::from(amount));
    entity.resources.check(&cost)?;
    owner_of_mut(ctx.store, owner)?.resources.consume(&cost)?;
    Ok(())
}

/// Send troops from the garrison against an entity at war with the attacker.
pub fn schedule_attack(
    ctx: &mut TickContext<'_>,
    attacker: EntityId,
    defender: EntityId,
    troops: u32,
) -> Result<AttackId, CommandError> {
    if attacker == defender {
        return Err(CommandError::SelfTarget);
    }
    if troops == 0 {
        return Err(CommandError::NonPositiveAmount);
    }
    let defender_name = owner_of(ctx.store, defender)?.name.clone();
    let entity = owner_of(ctx.store, attacker)?;
    let attacker_name = entity.name.clone();
    if ctx.store.active_war(attacker, defender).is_none() {
        return Err(CommandError::NotAtWar(defender));
    }
    if entity.troops < troops {
        return Err(CommandError::Troops {
            needed: troops,
            held: entity.troops,
        });
    }

    let entity = owner_of_mut(ctx.store, attacker)?;
    entity.troops -= troops;
    entity.last_active = ctx.now;
    let id = ctx.store.insert_attack(attacker, defender, troops, ctx.now);

    let content = ctx.content;
    if let Some(target) = ctx.store.entity_mut(defender) {
        nudge(target, TraitEvent::Attacked, content);
    }
    ctx.notify(
        attacker,
        &format!("{troops} troops are marching on {defender_name}."),
    );
    ctx.notify(
        defender,
        &format!("{attacker_name} is marching on you with {troops} troops!"),
    );
    tracing::info!(category = "WAR", attacker = %attacker_name, defender = %defender_name, troops, "attack launched");
    Ok(id)
}

/// Resolve every pending job of `kind` whose duration has elapsed.
///
/// A job moves out of `Pending` before its effect applies, so a job is never
/// applied twice and never both completed and cancelled.
pub fn sweep_due(ctx: &mut TickContext<'_>, kind: JobKind) -> SweepReport {
    if kind == JobKind::Attack {
        return sweep_attacks(ctx);
    }

    let mut report = SweepReport::default();
    for job in ctx.store.pending_jobs(kind) {
        let Some(duration) = job_duration(ctx.content, &job.payload) else {
            if ctx.store.transition_job(job.id, JobStatus::Invalid) {
                report.invalid += 1;
                tracing::warn!(category = "JOBS", job = job.id, "job references unknown content");
            }
            continue;
        };
        if ctx.ticks_since(job.start) < duration {
            continue;
        }
        if !references_exist(ctx.store, &job) {
            if ctx.store.transition_job(job.id, JobStatus::Invalid) {
                report.invalid += 1;
                refund_stranded_spy(ctx.store, &job);
                tracing::warn!(category = "JOBS", job = job.id, owner = job.owner, "job references a missing entity");
            }
            continue;
        }
        if !ctx.store.transition_job(job.id, JobStatus::Completed) {
            continue;
        }
        complete(ctx, &job);
        report.completed += 1;
    }
    report
}

fn references_exist(store: &dyn RecordStore, job: &Job) -> bool {
    let target_ok = match job.payload {
        JobPayload::Espionage { target, .. } => store.entity(target).is_some(),
        _ => true,
    };
    target_ok && store.entity(job.owner).is_some()
}

/// A mission whose target vanished sends its spy home.
fn refund_stranded_spy(store: &mut dyn RecordStore, job: &Job) {
    if let JobPayload::Espionage { .. } = job.payload {
        if let Some(owner) = store.entity_mut(job.owner) {
            owner.spies += 1;
        }
    }
}

fn complete(ctx: &mut TickContext<'_>, job: &Job) {
    match &job.payload {
        JobPayload::Training { amount } => {
            if let Some(entity) = ctx.store.entity_mut(job.owner) {
                entity.troops += amount;
            }
            ctx.notify(job.owner, &format!("{amount} troops finished training."));
            tracing::debug!(category = "TRAIN", owner = job.owner, amount, "training complete");
        }
        JobPayload::Construction { building } => {
            let mut level = 0;
            if let Some(entity) = ctx.store.entity_mut(job.owner) {
                let slot = entity.buildings.entry(building.clone()).or_insert(0);
                *slot += 1;
                level = *slot;
            }
            ctx.notify(job.owner, &format!("{building} reached level {level}."));
            tracing::debug!(category = "BUILD", owner = job.owner, building = %building, level, "construction complete");
        }
        JobPayload::Espionage { action, target } => {
            let outcome = resolve_mission(ctx, job.owner, *action, *target);
            if outcome == MissionOutcome::Failed {
                tracing::debug!(category = "ESPIONAGE", owner = job.owner, "spy lost");
            }
        }
        JobPayload::SpyTraining { amount } => {
            if let Some(entity) = ctx.store.entity_mut(job.owner) {
                entity.spies += amount;
            }
            ctx.notify(job.owner, &format!("{amount} spies finished training."));
        }
    }
}

fn sweep_attacks(ctx: &mut TickContext<'_>) -> SweepReport {
    let mut report = SweepReport::default();
    let travel = ctx.content.combat.travel_ticks;
    for record in ctx.store.pending_attacks() {
        if ctx.ticks_since(record.start) < travel {
            continue;
        }
        match resolve_attack(ctx, record.id) {
            AttackResolution::Resolved(_) => report.completed += 1,
            AttackResolution::Invalid => report.invalid += 1,
            AttackResolution::Skipped => {}
        }
    }
    report
}
