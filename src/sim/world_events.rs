//! Global world events with timed multipliers, and per-city random windfalls
//! and mishaps.

use rand::{Rng, RngCore};
use serde::Serialize;

use super::context::TickContext;
use crate::content::{EventEffects, WorldEventDef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveEvent {
    pub name: String,
    pub remaining_ticks: u64,
}

/// Per-process cache of running world events. Safe to lose on restart.
#[derive(Debug, Clone, Default)]
pub struct WorldEventState {
    active: Vec<ActiveEvent>,
}

impl WorldEventState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[ActiveEvent] {
        &self.active
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|e| e.name == name)
    }

    /// Age running events, then roll for at most one new event.
    /// Returns the name of the event that started, if any.
    pub fn advance(&mut self, defs: &[WorldEventDef], rng: &mut dyn RngCore) -> Option<String> {
        for event in &mut self.active {
            event.remaining_ticks = event.remaining_ticks.saturating_sub(1);
        }
        self.active.retain(|e| e.remaining_ticks > 0);

        for def in defs {
            if self.is_active(&def.name) || def.duration_ticks == 0 {
                continue;
            }
            if rng.random_bool(def.chance) {
                self.active.push(ActiveEvent {
                    name: def.name.clone(),
                    remaining_ticks: def.duration_ticks,
                });
                return Some(def.name.clone());
            }
        }
        None
    }

    /// Multiply together the effects of every running event.
    pub fn modifiers(&self, defs: &[WorldEventDef]) -> EventEffects {
        let mut combined = EventEffects::default();
        for def in defs.iter().filter(|d| self.is_active(&d.name)) {
            let fx = &def.effects;
            combined.global_price_mult *= fx.global_price_mult;
            combined.npc_trade_volume_mult *= fx.npc_trade_volume_mult;
            combined.npc_trade_rate_mult *= fx.npc_trade_rate_mult;
            for (resource, mult) in &fx.resource_price_mult {
                *combined
                    .resource_price_mult
                    .entry(resource.clone())
                    .or_insert(1.0) *= mult;
            }
        }
        combined
    }
}

/// Roll windfalls and mishaps for every entity.
pub fn roll_random_events(ctx: &mut TickContext<'_>) {
    let cfg = &ctx.content.random_events;
    for id in ctx.store.entity_ids() {
        let windfall = ctx.rng.random_bool(cfg.windfall_chance);
        let mishap = ctx.rng.random_bool(cfg.mishap_chance);
        if !windfall && !mishap {
            continue;
        }
        let gain = ctx.rng.random_range(cfg.windfall_min..=cfg.windfall_max);
        let loss = ctx.rng.random_range(cfg.mishap_min..=cfg.mishap_max);
        let Some(entity) = ctx.store.entity_mut(id) else {
            continue;
        };
        if windfall {
            entity.resources.add(&cfg.resource, gain);
            let text = format!("Fortune smiles: you found {gain:.0} {}.", cfg.resource);
            ctx.notifier.notify(id, &text);
        } else {
            let lost = entity.resources.take(&cfg.resource, loss);
            let text = format!("Misfortune: {lost:.0} {} was lost.", cfg.resource);
            ctx.notifier.notify(id, &text);
        }
        tracing::debug!(category = "EVENT", entity = id, windfall, "random event");
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn def(name: &str, chance: f64, duration_ticks: u64, volume: f64) -> WorldEventDef {
        WorldEventDef {
            name: name.into(),
            chance,
            duration_ticks,
            effects: EventEffects {
                npc_trade_volume_mult: volume,
                ..EventEffects::default()
            },
        }
    }

    #[test]
    fn at_most_one_event_starts_per_tick() {
        let defs = vec![def("boom", 1.0, 3, 1.5), def("bust", 1.0, 3, 0.5)];
        let mut state = WorldEventState::new();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(state.advance(&defs, &mut rng).as_deref(), Some("boom"));
        assert_eq!(state.active().len(), 1);
        assert_eq!(state.advance(&defs, &mut rng).as_deref(), Some("bust"));
        assert_eq!(state.active().len(), 2);
    }

    #[test]
    fn events_expire_after_duration() {
        let defs = vec![def("boom", 1.0, 2, 1.5)];
        let never = vec![def("boom", 0.0, 2, 1.5)];
        let mut state = WorldEventState::new();
        let mut rng = SmallRng::seed_from_u64(1);
        state.advance(&defs, &mut rng);
        state.advance(&never, &mut rng);
        assert!(state.is_active("boom"));
        state.advance(&never, &mut rng);
        assert!(!state.is_active("boom"));
    }

    #[test]
    fn modifiers_multiply() {
        let defs = vec![def("a", 1.0, 5, 1.5), def("b", 1.0, 5, 2.0)];
        let mut state = WorldEventState::new();
        let mut rng = SmallRng::seed_from_u64(1);
        state.advance(&defs, &mut rng);
        state.advance(&defs, &mut rng);
        let fx = state.modifiers(&defs);
        assert!((fx.npc_trade_volume_mult - 3.0).abs() < 1e-9);
        assert_eq!(fx.global_price_mult, 1.0);
    }
}
