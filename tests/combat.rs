mod common;

use city_sim::error::CommandError;
use city_sim::model::*;
use city_sim::scenario::Scenario;
use city_sim::sim::{schedule_attack, sweep_due};
use city_sim::store::RecordStore;

fn two_cities() -> (Scenario, EntityId, EntityId) {
    let mut s = Scenario::with_content(common::steady_content());
    let attacker = s
        .city("Ironhold")
        .troops(100)
        .max_troops(100)
        .id();
    let defender = s
        .city("Greyharbor")
        .troops(50)
        .resource("gold", 100.0)
        .resource("wood", 500.0)
        .id();
    s.war(attacker, defender);
    (s, attacker, defender)
}

#[test]
fn attack_requires_war() {
    let mut s = Scenario::new();
    let a = s.city("Ironhold").troops(10).id();
    let b = s.city("Greyharbor").id();
    let err = s.run(|ctx| schedule_attack(ctx, a, b, 5)).unwrap_err();
    assert_eq!(err, CommandError::NotAtWar(b));
    assert_eq!(s.entity(a).troops, 10);
}

#[test]
fn attack_cannot_exceed_garrison() {
    let (mut s, a, b) = two_cities();
    let err = s.run(|ctx| schedule_attack(ctx, a, b, 101)).unwrap_err();
    assert_eq!(
        err,
        CommandError::Troops {
            needed: 101,
            held: 100
        }
    );
}

#[test]
fn troops_leave_at_launch_and_wait_for_travel() {
    let (mut s, a, b) = two_cities();
    let attack = s.run(|ctx| schedule_attack(ctx, a, b, 100)).unwrap();
    assert_eq!(s.entity(a).troops, 0);

    s.advance_ticks(1);
    assert_eq!(s.run(|ctx| sweep_due(ctx, JobKind::Attack)).completed, 0);
    assert_eq!(s.store().attack(attack).unwrap().status, JobStatus::Pending);
}

#[test]
fn decisive_attack_resolves_with_casualties_and_loot() {
    let (mut s, a, b) = two_cities();
    let attack = s.run(|ctx| schedule_attack(ctx, a, b, 100)).unwrap();

    s.advance_ticks(2);
    let report = s.run(|ctx| sweep_due(ctx, JobKind::Attack));
    assert_eq!(report.completed, 1);

    let record = s.store().attack(attack).unwrap().clone();
    assert_eq!(record.status, JobStatus::Completed);
    let outcome = record.outcome.unwrap();
    assert_eq!(outcome.victor, Victor::Attacker);
    assert_eq!(outcome.attacker_losses, 14);
    assert_eq!(outcome.defender_losses, 28);
    assert_eq!(outcome.defender_troops, 50);
    // gold is preferred over the larger wood holding
    assert_eq!(outcome.loot_resource.as_deref(), Some("gold"));
    assert!((10.0..=30.0).contains(&outcome.loot_amount));

    let attacker = s.entity(a);
    let defender = s.entity(b);
    assert_eq!(attacker.troops, 86);
    assert_eq!(attacker.battles_won, 1);
    assert_eq!(defender.troops, 22);
    assert_eq!(defender.battles_won, 0);
    let gold = attacker.resources.get("gold") + defender.resources.get("gold");
    assert!((gold - 100.0).abs() < 1e-9);
    assert_eq!(defender.resources.get("wood"), 500.0);

    assert_eq!(s.notifier().for_entity(a).len(), 2);
    assert_eq!(s.notifier().for_entity(b).len(), 2);
}

#[test]
fn resolved_attack_is_not_swept_again() {
    let (mut s, a, b) = two_cities();
    s.run(|ctx| schedule_attack(ctx, a, b, 100)).unwrap();
    s.advance_ticks(2);
    s.run(|ctx| sweep_due(ctx, JobKind::Attack));
    let troops = s.entity(a).troops;

    s.advance_ticks(2);
    assert_eq!(s.run(|ctx| sweep_due(ctx, JobKind::Attack)).completed, 0);
    assert_eq!(s.entity(a).troops, troops);
}

#[test]
fn defender_win_credits_the_defender() {
    let mut s = Scenario::with_content(common::steady_content());
    let a = s.city("Ironhold").troops(20).id();
    let b = s.city("Greyharbor").troops(80).resource("gold", 100.0).id();
    s.war(a, b);
    let attack = s.run(|ctx| schedule_attack(ctx, a, b, 20)).unwrap();

    s.advance_ticks(2);
    s.run(|ctx| sweep_due(ctx, JobKind::Attack));

    let outcome = s.store().attack(attack).unwrap().outcome.clone().unwrap();
    assert_eq!(outcome.victor, Victor::Defender);
    assert!(outcome.loot_resource.is_none());
    assert_eq!(s.entity(b).battles_won, 1);
    assert_eq!(s.entity(b).resources.get("gold"), 100.0);
    assert_eq!(s.entity(a).troops, 20 - outcome.attacker_losses);
}
