//! War/peace state machine per unordered pair, plus the symmetric trust score.

use super::context::TickContext;
use crate::error::CommandError;
use crate::model::{EntityId, JobStatus, PairKey, WarId};
use crate::store::RecordStore;

/// What happened when a war ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeaceTerms {
    pub war: WarId,
    /// Peace came before the minimum war duration.
    pub forced: bool,
    pub cancelled_attacks: usize,
    pub refunded_troops: u32,
}

pub fn at_war(store: &dyn RecordStore, a: EntityId, b: EntityId) -> bool {
    store.active_war(a, b).is_some()
}

/// Every entity currently at war with `entity`.
pub fn enemies_of(store: &dyn RecordStore, entity: EntityId) -> Vec<EntityId> {
    store
        .active_wars_for(entity)
        .iter()
        .filter_map(|w| w.opponent_of(entity))
        .collect()
}

pub fn trust(store: &dyn RecordStore, a: EntityId, b: EntityId) -> i32 {
    store.relation(PairKey::new(a, b)).trust
}

/// Apply a symmetric trust delta. Returns the clamped result.
pub fn adjust_trust(store: &mut dyn RecordStore, a: EntityId, b: EntityId, delta: i32) -> i32 {
    store.relation_mut(PairKey::new(a, b)).adjust_trust(delta)
}

/// Admin override. Returns the clamped result.
pub fn set_trust(store: &mut dyn RecordStore, a: EntityId, b: EntityId, value: i32) -> i32 {
    store.relation_mut(PairKey::new(a, b)).set_trust(value)
}

pub fn declare_war(
    ctx: &mut TickContext<'_>,
    attacker: EntityId,
    defender: EntityId,
) -> Result<WarId, CommandError> {
    if attacker == defender {
        return Err(CommandError::SelfTarget);
    }
    for id in [attacker, defender] {
        if ctx.store.entity(id).is_none() {
            return Err(CommandError::UnknownEntity(id));
        }
    }
    if ctx.store.relation(PairKey::new(attacker, defender)).on_cooldown(ctx.now) {
        return Err(CommandError::WarCooldown(defender));
    }
    let war = ctx
        .store
        .insert_war(attacker, defender, ctx.now)
        .ok_or(CommandError::AlreadyAtWar(defender))?;

    let trust = adjust_trust(
        ctx.store,
        attacker,
        defender,
        -ctx.content.diplomacy.war_trust_penalty,
    );

    let attacker_name = ctx.entity_name(attacker);
    let defender_name = ctx.entity_name(defender);
    ctx.notify(attacker, &format!("You declared war on {defender_name}."));
    ctx.notify(defender, &format!("{attacker_name} has declared war on you!"));
    tracing::info!(
        category = "WAR",
        attacker = %attacker_name,
        defender = %defender_name,
        trust,
        "war declared"
    );
    Ok(war)
}

/// End the active war between `a` and `b`, cancelling and refunding every
/// pending attack between them.
pub fn end_war(
    ctx: &mut TickContext<'_>,
    a: EntityId,
    b: EntityId,
) -> Result<PeaceTerms, CommandError> {
    let Some(war) = ctx.store.active_war(a, b).cloned() else {
        return Err(CommandError::NotAtWar(b));
    };
    let content = ctx.content;
    let cfg = &content.diplomacy;
    let forced = ctx.ticks_since(war.start) < cfg.min_war_ticks;
    if !ctx.store.end_war(war.id, ctx.now, forced) {
        return Err(CommandError::NotAtWar(b));
    }

    let cooldown_until = ctx.after_ticks(cfg.forced_peace_cooldown_ticks);
    let relation = ctx.store.relation_mut(PairKey::new(a, b));
    relation.set_trust(0);
    if forced {
        relation.adjust_trust(-cfg.forced_peace_penalty);
        relation.war_cooldown_until = Some(cooldown_until);
    }

    let (cancelled_attacks, refunded_troops) = cancel_pending_attacks(ctx, a, b);

    let a_name = ctx.entity_name(a);
    let b_name = ctx.entity_name(b);
    let suffix = if forced { " (forced peace)" } else { "" };
    ctx.notify(a, &format!("Peace with {b_name} has been made{suffix}."));
    ctx.notify(b, &format!("{a_name} has made peace with you{suffix}."));
    tracing::info!(
        category = "WAR",
        a = %a_name,
        b = %b_name,
        forced,
        cancelled_attacks,
        refunded_troops,
        "war ended"
    );

    Ok(PeaceTerms {
        war: war.id,
        forced,
        cancelled_attacks,
        refunded_troops,
    })
}

/// Cancel pending attacks between the pair and return their troops home.
fn cancel_pending_attacks(ctx: &mut TickContext<'_>, a: EntityId, b: EntityId) -> (usize, u32) {
    let mut cancelled = 0;
    let mut refunded = 0;
    for record in ctx.store.pending_attacks_between(a, b) {
        if !ctx.store.transition_attack(record.id, JobStatus::Cancelled) {
            continue;
        }
        cancelled += 1;
        if let Some(attacker) = ctx.store.entity_mut(record.attacker) {
            attacker.troops += record.troops;
            refunded += record.troops;
        }
        ctx.notify(
            record.attacker,
            &format!("Your attack of {} troops was recalled.", record.troops),
        );
    }
    (cancelled, refunded)
}
