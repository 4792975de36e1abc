use bevy_ecs::system::Res;

use super::clock::WorldClock;
use super::resources::{Content, WorldConfig};

// Internal check functions for testability.

fn every_check(tick: u64, interval: u64) -> bool {
    interval > 0 && tick.is_multiple_of(interval)
}

/// True on the last tick of each `interval`-tick window, counting from 1.
fn window_end_check(tick: u64, interval: u64) -> bool {
    interval > 0 && (tick + 1).is_multiple_of(interval)
}

// Bevy run condition functions (for use with `.run_if()`).

pub fn prestige_due(clock: Res<WorldClock>, content: Res<Content>) -> bool {
    every_check(clock.tick_count, content.0.tick.prestige_interval_ticks)
}

pub fn checkpoint_due(clock: Res<WorldClock>, config: Res<WorldConfig>) -> bool {
    config.output_dir.is_some() && window_end_check(clock.tick_count, config.flush_every)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fires_on_multiples() {
        let fired: Vec<u64> = (0..25).filter(|&t| every_check(t, 10)).collect();
        assert_eq!(fired, vec![0, 10, 20]);
    }

    #[test]
    fn zero_interval_never_fires() {
        assert!(!every_check(0, 0));
        assert!(!window_end_check(9, 0));
    }

    #[test]
    fn window_end_fires_after_each_full_window() {
        let fired: Vec<u64> = (0..10).filter(|&t| window_end_check(t, 3)).collect();
        assert_eq!(fired, vec![2, 5, 8]);
    }
}
