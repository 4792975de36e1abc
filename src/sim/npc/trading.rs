//! NPC market heuristics and economy balancing.

use std::collections::BTreeMap;

use rand::Rng;

use super::NpcAction;
use super::traits::apply_trade_result;
use crate::content::{GameConfig, PersonalityProfile};
use crate::model::{EntityId, NpcState, Timestamp, TradeRecord};
use crate::sim::context::TickContext;
use crate::sim::market::{buy, current_price, sell};

/// Next instant each NPC may check the market. Lives only in the running
/// process; a restart lets every NPC trade on its first awake tick.
#[derive(Debug, Clone, Default)]
pub struct TradeCooldowns {
    next_check: BTreeMap<EntityId, Timestamp>,
}

impl TradeCooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_due(&self, id: EntityId, now: Timestamp) -> bool {
        self.next_check.get(&id).is_none_or(|&at| now >= at)
    }

    pub fn set(&mut self, id: EntityId, at: Timestamp) {
        self.next_check.insert(id, at);
    }
}

/// Price ratios (current / base) that trigger a buy or a sell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub buy_below: f64,
    pub sell_above: f64,
}

/// A bias above 1.0 makes the NPC buy only deeper dips and sell earlier;
/// greed pushes the sell threshold out.
pub fn thresholds(content: &GameConfig, profile: &PersonalityProfile, npc: &NpcState) -> Thresholds {
    let cfg = &content.npc.market;
    let bias = profile.trade_bias;
    Thresholds {
        buy_below: cfg.buy_below * (1.0 + (1.0 - bias)),
        sell_above: cfg.sell_above * bias * npc.greed,
    }
}

/// Check the market if the NPC's cooldown allows it, making at most one trade.
pub fn trade_on_market(
    ctx: &mut TickContext<'_>,
    id: EntityId,
    cooldowns: &mut TradeCooldowns,
) -> Option<NpcAction> {
    let content = ctx.content;
    let cfg = &content.npc.market;
    let npc = ctx.store.entity(id)?.npc.clone()?;
    let profile = content.profile(npc.personality);

    // busy markets pull NPCs in before their cooldown ends
    let rate = ctx.modifiers.npc_trade_rate_mult;
    let early = rate > 1.0 && ctx.rng.random_bool((rate - 1.0).min(1.0));
    if !cooldowns.is_due(id, ctx.now) && !early {
        return None;
    }
    let interval = ctx
        .rng
        .random_range(profile.trade_interval_min_ticks..=profile.trade_interval_max_ticks);
    cooldowns.set(id, ctx.after_ticks(interval));

    let limits = thresholds(content, profile, &npc);
    let volume = ctx.modifiers.npc_trade_volume_mult * npc.risk;
    let currency = &content.market.currency;

    for (resource, def) in &content.resources {
        if resource == currency {
            continue;
        }
        let Some(unit_price) = current_price(ctx.store, content, ctx.modifiers, resource) else {
            continue;
        };
        let ratio = unit_price / def.base_price;
        let entity = ctx.store.entity(id)?;
        let cash = entity.resources.get(currency);
        let held = entity.resources.get(resource);

        let trade = if ratio < limits.buy_below && cash > def.base_price * cfg.buy_reserve_mult {
            let qty = (ctx.rng.random_range(cfg.buy_min_qty..=cfg.buy_max_qty) * volume).floor();
            let qty = qty.min((cash / unit_price).floor());
            buy(ctx, id, resource, qty).ok()
        } else if ratio > limits.sell_above && held > cfg.sell_reserve {
            let qty = (held * cfg.sell_fraction * volume).floor().min(held);
            sell(ctx, id, resource, qty).ok()
        } else {
            None
        };

        if let Some(trade) = trade {
            settle_trade(ctx, &trade);
            return Some(NpcAction::Trade(trade));
        }
    }
    None
}

/// Feed a realized profit back into greed and risk.
fn settle_trade(ctx: &mut TickContext<'_>, trade: &TradeRecord) {
    let cfg = &ctx.content.npc.economic_traits;
    if let Some(npc) = ctx.store.entity_mut(trade.entity).and_then(|e| e.npc.as_mut()) {
        apply_trade_result(npc, trade.profit, cfg);
    }
    tracing::debug!(
        category = "MARKET",
        entity = trade.entity,
        resource = %trade.resource,
        side = %trade.side,
        profit = trade.profit,
        "npc trade settled"
    );
}

/// Keep food above the famine line; raise cash from surplus when short.
pub fn balance_economy(ctx: &mut TickContext<'_>, id: EntityId) -> Option<NpcAction> {
    let content = ctx.content;
    let cfg = &content.npc.economy;
    let currency = &content.market.currency;
    let entity = ctx.store.entity(id)?;

    if entity.resources.get(&cfg.food_resource) < cfg.food_low {
        let trade = buy(ctx, id, &cfg.food_resource, cfg.food_buy_qty).ok()?;
        settle_trade(ctx, &trade);
        return Some(NpcAction::Trade(trade));
    }

    if entity.resources.get(currency) >= cfg.currency_low {
        return None;
    }
    let surplus = entity
        .resources
        .iter()
        .filter(|&(resource, amount)| resource != currency.as_str() && amount > cfg.surplus_threshold)
        .map(|(resource, amount)| (resource.to_string(), amount))
        .next();
    let (resource, amount) = surplus?;
    let qty = ((amount - cfg.surplus_threshold) * cfg.surplus_sell_fraction).floor();
    let trade = sell(ctx, id, &resource, qty).ok()?;
    settle_trade(ctx, &trade);
    Some(NpcAction::Trade(trade))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Personality;
    use crate::sim::npc::traits::seed_state;

    #[test]
    fn economist_buys_deeper_dips_than_aggressor() {
        let content = GameConfig::standard();
        let econ = seed_state(Personality::Economist, &content);
        let aggr = seed_state(Personality::Aggressor, &content);
        let econ_t = thresholds(&content, content.profile(Personality::Economist), &econ);
        let aggr_t = thresholds(&content, content.profile(Personality::Aggressor), &aggr);
        assert!(econ_t.buy_below < aggr_t.buy_below);
        assert!(econ_t.sell_above > aggr_t.sell_above);
    }

    #[test]
    fn greed_raises_the_sell_threshold() {
        let content = GameConfig::standard();
        let profile = content.profile(Personality::Opportunist);
        let mut npc = seed_state(Personality::Opportunist, &content);
        let calm = thresholds(&content, profile, &npc);
        npc.greed = 1.4;
        assert!(thresholds(&content, profile, &npc).sell_above > calm.sell_above);
    }

    #[test]
    fn cooldown_blocks_until_due() {
        let mut cooldowns = TradeCooldowns::new();
        let t0 = Timestamp::from_secs(100);
        assert!(cooldowns.is_due(1, t0));
        cooldowns.set(1, t0.plus_secs(60));
        assert!(!cooldowns.is_due(1, t0.plus_secs(59)));
        assert!(cooldowns.is_due(1, t0.plus_secs(60)));
    }
}
