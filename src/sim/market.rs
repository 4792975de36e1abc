//! Supply-driven market pricing shared by player commands and NPCs.

use std::collections::BTreeMap;

use super::context::TickContext;
use crate::content::{EventEffects, GameConfig, MarketConfig, ResourceDef};
use crate::error::CommandError;
use crate::model::{Cost, EntityId, Timestamp, TradeRecord, TradeSide};
use crate::store::RecordStore;

/// Price of one unit at the given supply.
///
/// `base × (base_supply / max(supply, 1))^volatility`, scaled by active event
/// multipliers and clamped to `[base × floor, base × ceiling]`.
pub fn price(
    resource: &str,
    supply: f64,
    def: &ResourceDef,
    market: &MarketConfig,
    modifiers: &EventEffects,
) -> f64 {
    let scarcity = (def.base_supply / supply.max(1.0)).powf(def.volatility);
    let event_mult = modifiers.global_price_mult
        * modifiers
            .resource_price_mult
            .get(resource)
            .copied()
            .unwrap_or(1.0);
    (def.base_price * scarcity * event_mult).clamp(
        def.base_price * market.price_floor,
        def.base_price * market.price_ceiling,
    )
}

/// Current supply, starting from the configured base supply.
pub fn supply_of(store: &dyn RecordStore, content: &GameConfig, resource: &str) -> f64 {
    store
        .market_supply(resource)
        .or_else(|| content.resource(resource).map(|d| d.base_supply))
        .unwrap_or(0.0)
}

pub fn current_price(
    store: &dyn RecordStore,
    content: &GameConfig,
    modifiers: &EventEffects,
    resource: &str,
) -> Option<f64> {
    let def = content.resource(resource)?;
    let supply = supply_of(store, content, resource);
    Some(price(resource, supply, def, &content.market, modifiers))
}

/// Current price of every resource.
pub fn price_table(
    store: &dyn RecordStore,
    content: &GameConfig,
    modifiers: &EventEffects,
) -> BTreeMap<String, f64> {
    content
        .resources
        .keys()
        .filter_map(|r| current_price(store, content, modifiers, r).map(|p| (r.clone(), p)))
        .collect()
}

fn tradable<'c>(content: &'c GameConfig, resource: &str) -> Result<&'c ResourceDef, CommandError> {
    if resource == content.market.currency {
        return Err(CommandError::NotTradable(resource.to_string()));
    }
    content
        .resource(resource)
        .ok_or_else(|| CommandError::UnknownResource(resource.to_string()))
}

/// Buy `quantity` units at the current price. All-or-nothing.
pub fn buy(
    ctx: &mut TickContext<'_>,
    entity: EntityId,
    resource: &str,
    quantity: f64,
) -> Result<TradeRecord, CommandError> {
    let content = ctx.content;
    let def = tradable(content, resource)?;
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(CommandError::NonPositiveAmount);
    }
    let supply = supply_of(ctx.store, content, resource);
    if quantity > supply {
        return Err(CommandError::MarketSupply {
            resource: resource.to_string(),
            available: supply,
        });
    }
    let unit_price = price(resource, supply, def, &content.market, ctx.modifiers);
    let cost: Cost = [(content.market.currency.clone(), unit_price * quantity)]
        .into_iter()
        .collect();

    let buyer = ctx
        .store
        .entity_mut(entity)
        .ok_or(CommandError::UnknownEntity(entity))?;
    buyer.resources.consume(&cost)?;
    buyer.resources.add(resource, quantity);
    ctx.store.set_market_supply(resource, supply - quantity);

    Ok(record_trade(
        ctx,
        entity,
        resource,
        TradeSide::Buy,
        quantity,
        unit_price,
        (def.base_price - unit_price) * quantity,
    ))
}

/// Sell `quantity` units at the current price. All-or-nothing.
pub fn sell(
    ctx: &mut TickContext<'_>,
    entity: EntityId,
    resource: &str,
    quantity: f64,
) -> Result<TradeRecord, CommandError> {
    let content = ctx.content;
    let def = tradable(content, resource)?;
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(CommandError::NonPositiveAmount);
    }
    let supply = supply_of(ctx.store, content, resource);
    let unit_price = price(resource, supply, def, &content.market, ctx.modifiers);
    let goods: Cost = [(resource.to_string(), quantity)].into_iter().collect();

    let seller = ctx
        .store
        .entity_mut(entity)
        .ok_or(CommandError::UnknownEntity(entity))?;
    seller.resources.consume(&goods)?;
    seller
        .resources
        .add(&content.market.currency, unit_price * quantity);
    ctx.store.set_market_supply(resource, supply + quantity);

    Ok(record_trade(
        ctx,
        entity,
        resource,
        TradeSide::Sell,
        quantity,
        unit_price,
        (unit_price - def.base_price) * quantity,
    ))
}

/// Forget trades older than the profit window; nothing reads further back.
pub fn prune_trade_history(store: &mut dyn RecordStore, content: &GameConfig, now: Timestamp) -> usize {
    let window = content
        .npc
        .feedback
        .profit_window_ticks
        .saturating_mul(content.tick.tick_seconds);
    let cutoff = now.plus_secs(-i64::try_from(window).unwrap_or(i64::MAX));
    store.prune_trades(cutoff)
}

fn record_trade(
    ctx: &mut TickContext<'_>,
    entity: EntityId,
    resource: &str,
    side: TradeSide,
    quantity: f64,
    unit_price: f64,
    profit: f64,
) -> TradeRecord {
    let trade = TradeRecord {
        entity,
        resource: resource.to_string(),
        side,
        quantity,
        unit_price,
        profit,
        at: ctx.now,
    };
    ctx.store.record_trade(trade.clone());
    tracing::debug!(
        category = "MARKET",
        entity,
        resource,
        side = %side,
        quantity,
        unit_price,
        profit,
        "trade executed"
    );
    trade
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food() -> (ResourceDef, MarketConfig) {
        let content = GameConfig::standard();
        (content.resources["food"].clone(), content.market)
    }

    #[test]
    fn base_supply_yields_base_price() {
        let (def, market) = food();
        let p = price("food", def.base_supply, &def, &market, &EventEffects::default());
        assert!((p - def.base_price).abs() < 1e-9);
    }

    #[test]
    fn price_strictly_decreases_with_supply() {
        let (def, market) = food();
        let neutral = EventEffects::default();
        let mut last = f64::INFINITY;
        // stays inside the unclamped range for the standard food curve
        for supply in [400.0, 600.0, 900.0, 1_300.0, 2_000.0] {
            let p = price("food", supply, &def, &market, &neutral);
            assert!(p < last, "{p} !< {last} at supply {supply}");
            last = p;
        }
    }

    #[test]
    fn price_is_clamped() {
        let (def, market) = food();
        let neutral = EventEffects::default();
        let scarce = price("food", 0.0, &def, &market, &neutral);
        let glut = price("food", 1e9, &def, &market, &neutral);
        assert_eq!(scarce, def.base_price * market.price_ceiling);
        assert_eq!(glut, def.base_price * market.price_floor);
    }

    #[test]
    fn event_multipliers_apply_before_clamp() {
        let (def, market) = food();
        let mut mods = EventEffects::default();
        mods.resource_price_mult.insert("food".into(), 1.5);
        let p = price("food", def.base_supply, &def, &market, &mods);
        assert!((p - def.base_price * 1.5).abs() < 1e-9);
        mods.global_price_mult = 10.0;
        let p = price("food", def.base_supply, &def, &market, &mods);
        assert_eq!(p, def.base_price * market.price_ceiling);
    }
}
