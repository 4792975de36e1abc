use city_sim::error::CommandError;
use city_sim::model::*;
use city_sim::scenario::Scenario;
use city_sim::sim::{schedule, sweep_due};
use city_sim::store::RecordStore;

fn training(amount: u32) -> JobPayload {
    JobPayload::Training { amount }
}

#[test]
fn unaffordable_training_mutates_nothing() {
    let mut s = Scenario::new();
    let city = s
        .city("Ashford")
        .max_troops(50)
        .population(50)
        .resource("gold", 8.0)
        .resource("food", 100.0)
        .id();

    // 10 troops at 5 gold each
    let err = s.run(|ctx| schedule(ctx, city, training(10))).unwrap_err();

    match &err {
        CommandError::Resources(shortfall) => {
            assert_eq!(shortfall.resource, "gold");
            assert_eq!(shortfall.needed, 50.0);
            assert_eq!(shortfall.held, 8.0);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_insufficiency());
    let e = s.entity(city);
    assert_eq!(e.resources.get("gold"), 8.0);
    assert_eq!(e.resources.get("food"), 100.0);
    assert_eq!(e.population, 50);
    assert!(s.store().pending_jobs(JobKind::Training).is_empty());
}

#[test]
fn job_completes_exactly_once_after_its_duration() {
    let mut s = Scenario::new();
    let city = s
        .city("Ashford")
        .max_troops(50)
        .population(50)
        .resource("gold", 100.0)
        .resource("food", 100.0)
        .id();
    let job = s.run(|ctx| schedule(ctx, city, training(2))).unwrap();
    assert_eq!(s.entity(city).population, 48);
    assert_eq!(s.entity(city).resources.get("gold"), 90.0);

    // training takes 2 ticks
    assert_eq!(s.run(|ctx| sweep_due(ctx, JobKind::Training)).completed, 0);
    s.advance_ticks(1);
    assert_eq!(s.run(|ctx| sweep_due(ctx, JobKind::Training)).completed, 0);
    assert_eq!(s.store().job(job).unwrap().status, JobStatus::Pending);

    s.advance_ticks(1);
    assert_eq!(s.run(|ctx| sweep_due(ctx, JobKind::Training)).completed, 1);
    assert_eq!(s.entity(city).troops, 2);
    assert_eq!(s.store().job(job).unwrap().status, JobStatus::Completed);

    s.advance_ticks(5);
    assert_eq!(s.run(|ctx| sweep_due(ctx, JobKind::Training)).completed, 0);
    assert_eq!(s.entity(city).troops, 2);
    assert_eq!(
        s.notifier().for_entity(city),
        vec!["2 troops finished training.".to_string()]
    );
}

#[test]
fn late_sweep_still_completes() {
    let mut s = Scenario::new();
    let city = s
        .city("Ashford")
        .resource("gold", 100.0)
        .resource("wood", 100.0)
        .id();
    s.run(|ctx| {
        schedule(
            ctx,
            city,
            JobPayload::Construction {
                building: "Farm".into(),
            },
        )
    })
    .unwrap();

    s.advance_ticks(40);
    let report = s.run(|ctx| sweep_due(ctx, JobKind::Construction));
    assert_eq!(report.completed, 1);
    assert_eq!(s.entity(city).building_level("Farm"), 1);
}

#[test]
fn queued_training_counts_against_capacity() {
    let mut s = Scenario::new();
    let city = s
        .city("Ashford")
        .troops(2)
        .max_troops(5)
        .population(50)
        .resource("gold", 500.0)
        .resource("food", 500.0)
        .id();
    s.run(|ctx| schedule(ctx, city, training(2))).unwrap();

    let err = s.run(|ctx| schedule(ctx, city, training(2))).unwrap_err();
    assert_eq!(
        err,
        CommandError::Capacity {
            current: 2,
            queued: 2,
            requested: 2,
            cap: 5
        }
    );
}

#[test]
fn oversized_training_requests_hit_the_cap() {
    let mut s = Scenario::new();
    let city = s
        .city("Ashford")
        .troops(2)
        .max_troops(u32::MAX)
        .population(50)
        .resource("gold", 500.0)
        .id();

    // 2 + u32::MAX does not fit in a u32; it must not wrap under the cap
    let err = s.run(|ctx| schedule(ctx, city, training(u32::MAX))).unwrap_err();
    assert_eq!(
        err,
        CommandError::Capacity {
            current: 2,
            queued: 0,
            requested: u32::MAX,
            cap: u32::MAX
        }
    );
    assert_eq!(s.entity(city).population, 50);
    assert_eq!(s.entity(city).resources.get("gold"), 500.0);
    assert!(s.store().pending_jobs(JobKind::Training).is_empty());
}

#[test]
fn oversized_spy_training_hits_the_cap() {
    let mut s = Scenario::new();
    let city = s
        .city("Ashford")
        .spies(1)
        .resource("gold", 1000.0)
        .building("Academy", 2)
        .id();
    let err = s
        .run(|ctx| schedule(ctx, city, JobPayload::SpyTraining { amount: u32::MAX }))
        .unwrap_err();
    assert!(matches!(err, CommandError::Capacity { requested: u32::MAX, cap: 2, .. }));
    assert_eq!(s.entity(city).resources.get("gold"), 1000.0);
}

#[test]
fn training_needs_population() {
    let mut s = Scenario::new();
    let city = s
        .city("Ashford")
        .max_troops(50)
        .population(3)
        .resource("gold", 500.0)
        .resource("food", 500.0)
        .id();
    let err = s.run(|ctx| schedule(ctx, city, training(4))).unwrap_err();
    assert_eq!(err, CommandError::Population { needed: 4, held: 3 });
}

#[test]
fn construction_respects_max_level_including_queued() {
    let mut s = Scenario::new();
    let city = s
        .city("Ashford")
        .resource("gold", 1000.0)
        .resource("wood", 1000.0)
        .resource("stone", 1000.0)
        .building("Fort", 4)
        .id();
    let fort = || JobPayload::Construction {
        building: "Fort".into(),
    };
    s.run(|ctx| schedule(ctx, city, fort())).unwrap();
    let err = s.run(|ctx| schedule(ctx, city, fort())).unwrap_err();
    assert_eq!(err, CommandError::MaxLevel("Fort".into()));
}

#[test]
fn unknown_building_is_a_validation_error() {
    let mut s = Scenario::new();
    let city = s.city("Ashford").resource("gold", 1000.0).id();
    let err = s
        .run(|ctx| {
            schedule(
                ctx,
                city,
                JobPayload::Construction {
                    building: "Moat".into(),
                },
            )
        })
        .unwrap_err();
    assert_eq!(err, CommandError::UnknownBuilding("Moat".into()));
    assert!(!err.is_insufficiency());
}

#[test]
fn mission_without_spies_is_rejected() {
    let mut s = Scenario::new();
    let a = s.city("Ashford").resource("gold", 1000.0).id();
    let b = s.city("Blackwater").id();
    let payload = JobPayload::Espionage {
        action: SpyAction::Scout,
        target: b,
    };
    let err = s.run(|ctx| schedule(ctx, a, payload)).unwrap_err();
    assert_eq!(err, CommandError::NoSpies);
    assert_eq!(s.entity(a).resources.get("gold"), 1000.0);
}

#[test]
fn spy_training_is_capped_by_academy_level() {
    let mut s = Scenario::new();
    let city = s
        .city("Ashford")
        .spies(1)
        .resource("gold", 1000.0)
        .building("Academy", 2)
        .id();
    let spies = |amount| JobPayload::SpyTraining { amount };
    s.run(|ctx| schedule(ctx, city, spies(1))).unwrap();
    assert!(matches!(
        s.run(|ctx| schedule(ctx, city, spies(1))),
        Err(CommandError::Capacity { cap: 2, .. })
    ));
}

#[test]
fn successful_scout_returns_the_spy_with_a_report() {
    let mut s = Scenario::new();
    s.content_mut().espionage.max_chance = 1.0;
    s.content_mut().espionage.actions.scout.success_chance = 1.0;
    let a = s.city("Ashford").spies(1).resource("gold", 100.0).id();
    let b = s.city("Blackwater").troops(33).resource("gold", 70.0).id();

    s.run(|ctx| {
        schedule(
            ctx,
            a,
            JobPayload::Espionage {
                action: SpyAction::Scout,
                target: b,
            },
        )
    })
    .unwrap();
    assert_eq!(s.entity(a).spies, 0);
    assert_eq!(s.entity(a).resources.get("gold"), 80.0);

    s.advance_ticks(1);
    let report = s.run(|ctx| sweep_due(ctx, JobKind::Espionage));
    assert_eq!(report.completed, 1);
    assert_eq!(s.entity(a).spies, 1);

    let intel = s.store().intel_for(a);
    assert_eq!(intel.len(), 1);
    assert_eq!(intel[0].target, b);
    assert_eq!(intel[0].troops, 33);
}
