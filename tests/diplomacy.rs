use city_sim::error::CommandError;
use city_sim::model::*;
use city_sim::scenario::Scenario;
use city_sim::sim::{at_war, declare_war, end_war, schedule_attack, trust};
use city_sim::store::RecordStore;

#[test]
fn declaring_war_costs_trust_and_notifies_both() {
    let mut s = Scenario::new();
    let a = s.city("Ironhold").id();
    let b = s.city("Greyharbor").id();

    s.run(|ctx| declare_war(ctx, a, b)).unwrap();

    assert!(at_war(s.store(), b, a));
    assert_eq!(trust(s.store(), a, b), -20);
    assert_eq!(
        s.notifier().for_entity(b),
        vec!["Ironhold has declared war on you!".to_string()]
    );
}

#[test]
fn one_active_war_per_pair() {
    let mut s = Scenario::new();
    let a = s.city("Ironhold").id();
    let b = s.city("Greyharbor").id();
    s.run(|ctx| declare_war(ctx, a, b)).unwrap();

    let err = s.run(|ctx| declare_war(ctx, b, a)).unwrap_err();
    assert_eq!(err, CommandError::AlreadyAtWar(a));
    assert_eq!(trust(s.store(), a, b), -20);
}

#[test]
fn cannot_declare_war_on_self_or_nobody() {
    let mut s = Scenario::new();
    let a = s.city("Ironhold").id();
    assert_eq!(
        s.run(|ctx| declare_war(ctx, a, a)).unwrap_err(),
        CommandError::SelfTarget
    );
    assert_eq!(
        s.run(|ctx| declare_war(ctx, a, 999)).unwrap_err(),
        CommandError::UnknownEntity(999)
    );
}

#[test]
fn peace_without_war_is_rejected() {
    let mut s = Scenario::new();
    let a = s.city("Ironhold").id();
    let b = s.city("Greyharbor").id();
    assert_eq!(
        s.run(|ctx| end_war(ctx, a, b)).unwrap_err(),
        CommandError::NotAtWar(b)
    );
}

#[test]
fn early_peace_is_forced_and_refunds_marching_troops() {
    let mut s = Scenario::new();
    let a = s.city("Ironhold").troops(30).id();
    let b = s.city("Greyharbor").troops(10).id();
    s.run(|ctx| declare_war(ctx, a, b)).unwrap();
    let attack = s.run(|ctx| schedule_attack(ctx, a, b, 25)).unwrap();
    assert_eq!(s.entity(a).troops, 5);

    s.advance_ticks(1);
    let terms = s.run(|ctx| end_war(ctx, b, a)).unwrap();

    assert!(terms.forced);
    assert_eq!(terms.cancelled_attacks, 1);
    assert_eq!(terms.refunded_troops, 25);
    assert_eq!(s.entity(a).troops, 30);
    assert_eq!(s.store().attack(attack).unwrap().status, JobStatus::Cancelled);
    assert!(!at_war(s.store(), a, b));
    // reset to neutral, then the forced-peace penalty
    assert_eq!(trust(s.store(), a, b), -15);
}

#[test]
fn forced_peace_blocks_war_until_the_cooldown_passes() {
    let mut s = Scenario::new();
    let a = s.city("Ironhold").id();
    let b = s.city("Greyharbor").id();
    s.run(|ctx| declare_war(ctx, a, b)).unwrap();
    s.run(|ctx| end_war(ctx, a, b)).unwrap();

    s.advance_ticks(19);
    assert_eq!(
        s.run(|ctx| declare_war(ctx, a, b)).unwrap_err(),
        CommandError::WarCooldown(b)
    );

    s.advance_ticks(1);
    assert!(s.run(|ctx| declare_war(ctx, a, b)).is_ok());
}

#[test]
fn peace_after_the_minimum_duration_is_clean() {
    let mut s = Scenario::new();
    let a = s.city("Ironhold").id();
    let b = s.city("Greyharbor").id();
    s.run(|ctx| declare_war(ctx, a, b)).unwrap();

    s.advance_ticks(10);
    let terms = s.run(|ctx| end_war(ctx, a, b)).unwrap();

    assert!(!terms.forced);
    assert_eq!(trust(s.store(), a, b), 0);
    assert!(s.run(|ctx| declare_war(ctx, a, b)).is_ok());

    let wars = s.store().wars_for(a);
    assert_eq!(wars.len(), 2);
    assert_eq!(wars.iter().filter(|w| w.is_active()).count(), 1);
}
