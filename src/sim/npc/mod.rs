//! Autonomous factions: personality-driven action rolls, trait evolution and
//! market heuristics.
//!
//! Every action goes through the same scheduler, diplomacy and market calls a
//! player command uses, so an NPC is bound by the same costs and caps. Any
//! rejection is a silent no-op and the turn moves on.

pub mod build;
pub mod cycles;
pub mod espionage;
pub mod military;
pub mod trading;
pub mod traits;

use rand::seq::IndexedRandom;
use rand::Rng;

use self::build::choose_best_building;
use self::cycles::advance_cycle;
use self::traits::{TraitEvent, decay_all, nudge, personality_feedback, seed_state};
use self::trading::{TradeCooldowns, balance_economy, trade_on_market};
use super::context::TickContext;
use super::diplomacy::enemies_of;
use super::economy::found_city;
use super::scheduler::schedule;
use crate::model::{
    AttackId, EntityId, EntityKind, JobId, JobPayload, Personality, SpyAction, TradeRecord, WarId,
};
use crate::store::RecordStore;

/// Something an NPC did on its turn.
#[derive(Debug, Clone, PartialEq)]
pub enum NpcAction {
    Build { building: String, job: JobId },
    Train { amount: u32, job: JobId },
    DeclareWar { target: EntityId, war: WarId },
    Attack { target: EntityId, troops: u32, attack: AttackId },
    MakePeace { target: EntityId, forced: bool },
    TrainSpies { amount: u32, job: JobId },
    Mission { action: SpyAction, target: EntityId },
    Trade(TradeRecord),
}

/// Tally of one NPC phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NpcTickReport {
    pub awake: usize,
    pub asleep: usize,
    pub actions: Vec<(EntityId, NpcAction)>,
}

fn unused_name(store: &dyn RecordStore, names: &[String], index: usize) -> String {
    if let Some(free) = names.iter().find(|n| store.entity_by_name(n).is_none()) {
        return free.clone();
    }
    let stem = names
        .get(index % names.len().max(1))
        .map_or("Faction", String::as_str);
    let mut suffix = index + 1;
    loop {
        let candidate = format!("{stem} {suffix}");
        if store.entity_by_name(&candidate).is_none() {
            return candidate;
        }
        suffix += 1;
    }
}

/// Create NPCs until the configured count exists. Returns the new ids.
pub fn ensure_npcs(ctx: &mut TickContext<'_>) -> Vec<EntityId> {
    let content = ctx.content;
    let existing = ctx.store.npc_ids().len();
    let wanted = content.npc.count as usize;

    let mut created = Vec::new();
    for index in existing..wanted {
        let name = unused_name(ctx.store, &content.npc.names, index);
        let personality = Personality::ALL
            .choose(ctx.rng)
            .copied()
            .unwrap_or(Personality::Opportunist);
        let id = found_city(ctx.store, content, EntityKind::Npc, &name, ctx.now);
        if let Some(entity) = ctx.store.entity_mut(id) {
            entity.npc = Some(seed_state(personality, content));
        }
        tracing::info!(category = "WORLD", npc = %name, %personality, "npc created");
        created.push(id);
    }
    created
}

/// One NPC's turn: independent build/attack/peace rolls, then espionage,
/// economy balancing and the market.
pub fn take_turn(
    ctx: &mut TickContext<'_>,
    id: EntityId,
    cooldowns: &mut TradeCooldowns,
) -> Vec<NpcAction> {
    let content = ctx.content;
    let npc_cfg = &content.npc;
    let Some(entity) = ctx.store.entity_mut(id) else {
        return Vec::new();
    };
    let Some(npc) = entity.npc.as_mut() else {
        return Vec::new();
    };
    npc.traits.clamp(npc_cfg.trait_min, npc_cfg.trait_max);
    let traits = npc.traits;
    entity.last_active = ctx.now;
    if entity.resources.total() < npc_cfg.low_resource_threshold {
        nudge(entity, TraitEvent::LowResources, content);
    }

    let at_war = !enemies_of(ctx.store, id).is_empty();
    let wants_build = ctx.rng.random_bool(traits.build_chance);
    let wants_attack = ctx.rng.random_bool(traits.attack_chance);
    let wants_peace = ctx.rng.random_bool(traits.peace_chance);

    let mut actions = Vec::new();
    if let Some(action) = balance_economy(ctx, id) {
        actions.push(action);
    }

    if wants_build {
        let choice = ctx
            .store
            .entity(id)
            .and_then(|e| choose_best_building(e, content, at_war, ctx.rng));
        if let Some(building) = choice {
            let payload = JobPayload::Construction {
                building: building.clone(),
            };
            if let Ok(job) = schedule(ctx, id, payload) {
                actions.push(NpcAction::Build { building, job });
            }
        }
    }

    if wants_attack || at_war {
        actions.extend(military::train_troops(ctx, id, at_war));
    }
    if wants_attack {
        actions.extend(military::attack_or_war(ctx, id));
    }
    if wants_peace && at_war {
        actions.extend(military::make_peace(ctx, id));
    }

    let spy_cfg = &npc_cfg.espionage;
    if ctx.rng.random_bool(spy_cfg.train_chance) {
        actions.extend(espionage::train_spies(ctx, id));
    }
    let has_spies = ctx.store.entity(id).is_some_and(|e| e.spies > 0);
    if has_spies && ctx.rng.random_bool(spy_cfg.launch_chance) {
        actions.extend(espionage::launch_mission(ctx, id));
    }

    actions.extend(trade_on_market(ctx, id, cooldowns));
    actions
}

/// Run every awake NPC, apply performance feedback, and decay traits on
/// the configured interval.
pub fn run_npc_tick(
    ctx: &mut TickContext<'_>,
    cooldowns: &mut TradeCooldowns,
    tick: u64,
) -> NpcTickReport {
    let content = ctx.content;
    let tick_seconds = content.tick.tick_seconds;
    let mut report = NpcTickReport::default();

    for id in ctx.store.npc_ids() {
        let Some(npc) = ctx.store.entity_mut(id).and_then(|e| e.npc.as_mut()) else {
            continue;
        };
        let profile = content.profile(npc.personality);
        if !advance_cycle(npc, profile, ctx.now, tick_seconds, ctx.rng) {
            report.asleep += 1;
            continue;
        }
        report.awake += 1;

        let actions = take_turn(ctx, id, cooldowns);
        personality_feedback(ctx, id);
        if !actions.is_empty() {
            tracing::debug!(category = "AI", npc = id, count = actions.len(), "npc acted");
        }
        report.actions.extend(actions.into_iter().map(|a| (id, a)));
    }

    let interval = content.tick.trait_decay_interval_ticks;
    if interval > 0 && tick % interval == 0 {
        decay_all(ctx);
    }
    report
}
