use city_sim::model::*;
use city_sim::scenario::Scenario;
use city_sim::sim::{MissionOutcome, resolve_mission};

/// Scenario where every mission succeeds.
fn sure_spies() -> Scenario {
    let mut s = Scenario::new();
    let espionage = &mut s.content_mut().espionage;
    espionage.max_chance = 1.0;
    espionage.actions.steal.success_chance = 1.0;
    espionage.actions.sabotage.success_chance = 1.0;
    s
}

#[test]
fn successful_steal_moves_currency_to_the_thief() {
    let mut s = sure_spies();
    let thief = s.city("Ashford").resource("gold", 20.0).id();
    let victim = s.city("Blackwater").resource("gold", 1000.0).id();

    let outcome = s.run(|ctx| resolve_mission(ctx, thief, SpyAction::Steal, victim));

    assert_eq!(
        outcome,
        MissionOutcome::Stole {
            resource: "gold".into(),
            amount: 100.0
        }
    );
    assert_eq!(s.entity(thief).resources.get("gold"), 120.0);
    assert_eq!(s.entity(victim).resources.get("gold"), 900.0);
    // the spy comes home
    assert_eq!(s.entity(thief).spies, 1);
    assert_eq!(s.notifier().for_entity(victim).len(), 1);
}

#[test]
fn steal_falls_back_to_the_largest_holding() {
    let mut s = sure_spies();
    let thief = s.city("Ashford").id();
    let victim = s
        .city("Blackwater")
        .resource("wood", 300.0)
        .resource("food", 50.0)
        .id();

    let outcome = s.run(|ctx| resolve_mission(ctx, thief, SpyAction::Steal, victim));

    assert_eq!(
        outcome,
        MissionOutcome::Stole {
            resource: "wood".into(),
            amount: 30.0
        }
    );
    assert_eq!(s.entity(victim).resources.get("wood"), 270.0);
    assert_eq!(s.entity(victim).resources.get("food"), 50.0);
}

#[test]
fn sabotage_never_drops_a_level_below_zero() {
    let mut s = sure_spies();
    s.content_mut().espionage.sabotage_damage = 5;
    let saboteur = s.city("Ashford").id();
    let victim = s.city("Blackwater").building("Walls", 2).id();

    let outcome = s.run(|ctx| resolve_mission(ctx, saboteur, SpyAction::Sabotage, victim));

    assert_eq!(
        outcome,
        MissionOutcome::Sabotaged {
            building: Some("Walls".into())
        }
    );
    assert_eq!(s.entity(victim).building_level("Walls"), 0);

    // nothing left standing to hit
    let again = s.run(|ctx| resolve_mission(ctx, saboteur, SpyAction::Sabotage, victim));
    assert_eq!(again, MissionOutcome::Sabotaged { building: None });
    assert_eq!(s.entity(victim).building_level("Walls"), 0);
}

#[test]
fn sabotage_damages_one_level() {
    let mut s = sure_spies();
    let saboteur = s.city("Ashford").id();
    let victim = s.city("Blackwater").building("Farm", 3).id();

    s.run(|ctx| resolve_mission(ctx, saboteur, SpyAction::Sabotage, victim));

    assert_eq!(s.entity(victim).building_level("Farm"), 2);
}

#[test]
fn captured_spy_does_not_return() {
    let mut s = Scenario::new();
    s.content_mut().espionage.actions.steal.success_chance = 0.0;
    s.content_mut().espionage.min_chance = 0.0;
    let thief = s.city("Ashford").id();
    let victim = s.city("Blackwater").resource("gold", 1000.0).id();

    let outcome = s.run(|ctx| resolve_mission(ctx, thief, SpyAction::Steal, victim));

    assert_eq!(outcome, MissionOutcome::Failed);
    assert_eq!(s.entity(thief).spies, 0);
    assert_eq!(s.entity(victim).resources.get("gold"), 1000.0);
}
