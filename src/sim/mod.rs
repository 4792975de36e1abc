pub mod combat;
mod context;
pub mod diplomacy;
pub mod economy;
pub mod espionage;
pub mod market;
pub mod npc;
pub mod prestige;
pub mod scheduler;
mod ticks;
pub mod world_events;

pub use combat::{AttackResolution, BattleSides, resolve, resolve_attack};
pub use context::TickContext;
pub use diplomacy::{PeaceTerms, at_war, declare_war, end_war, enemies_of, set_trust, trust};
pub use economy::{found_city, recompute_all, recompute_stats, run_economy};
pub use espionage::{MissionOutcome, resolve_mission, success_chance};
pub use market::{buy, current_price, price, price_table, prune_trade_history, sell};
pub use npc::trading::TradeCooldowns;
pub use npc::{NpcAction, NpcTickReport, ensure_npcs, run_npc_tick, take_turn};
pub use prestige::{compute_prestige, update_prestige};
pub use scheduler::{SweepReport, job_duration, schedule, schedule_attack, sweep_due};
pub use ticks::{Clock, ManualClock, SystemClock, ticks_passed};
pub use world_events::{ActiveEvent, WorldEventState, roll_random_events};
