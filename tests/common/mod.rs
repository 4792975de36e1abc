#![allow(dead_code)]

use city_sim::content::GameConfig;
use city_sim::model::*;
use city_sim::scenario::Scenario;
use city_sim::sim;
use city_sim::store::RecordStore;

/// Standard content with combat jitter off, so battle numbers are exact.
pub fn steady_content() -> GameConfig {
    let mut content = GameConfig::standard();
    content.combat.jitter = 0.0;
    content
}

/// Ids of the cities in [`build_test_scenario`].
pub struct TestCities {
    pub alice: EntityId,
    pub bob: EntityId,
    pub carol: EntityId,
}

/// Three cities with one of every record kind:
/// 3 entities, 1 job, 1 attack, 1 war, 1 relation, 2 market rows,
/// 1 intel report, 1 trade.
pub fn build_test_scenario() -> (Scenario, TestCities) {
    let mut s = Scenario::with_content(steady_content());

    let alice = s
        .city("Alice")
        .troops(20)
        .max_troops(50)
        .population(40)
        .max_population(100)
        .resource("gold", 500.0)
        .resource("food", 200.0)
        .resource("wood", 100.0)
        .building("Farm", 1)
        .id();
    let bob = s
        .npc("Bob", Personality::Defender)
        .troops(15)
        .max_troops(50)
        .population(30)
        .resource("gold", 300.0)
        .building("Walls", 2)
        .id();
    let carol = s.city("Carol").resource("gold", 100.0).id();

    s.war(alice, carol);
    s.trust(alice, carol, 30);
    s.supply("stone", 550.0);

    s.run(|ctx| {
        sim::schedule(ctx, alice, JobPayload::Training { amount: 5 }).unwrap();
        sim::schedule_attack(ctx, alice, carol, 5).unwrap();
        sim::buy(ctx, alice, "food", 10.0).unwrap();
    });

    let now = s.now();
    s.store_mut().record_intel(IntelReport {
        owner: alice,
        target: bob,
        troops: 15,
        population: 30,
        resources: ResourceLedger::from([("gold", 300.0)]),
        buildings: [("Walls".to_string(), 2)].into_iter().collect(),
        gathered_at: now,
    });

    (s, TestCities { alice, bob, carol })
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
