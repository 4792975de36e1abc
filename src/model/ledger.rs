use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Resource name → amount required. Used for every cost table.
pub type Cost = BTreeMap<String, f64>;

/// First resource found lacking during an all-or-nothing consume.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("not enough {resource}: need {needed}, have {held}")]
pub struct Shortfall {
    pub resource: String,
    pub needed: f64,
    pub held: f64,
}

/// Per-entity resource holdings. Amounts never go negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceLedger(BTreeMap<String, f64>);

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource: &str) -> f64 {
        self.0.get(resource).copied().unwrap_or(0.0)
    }

    /// Set a holding directly, clamping at zero.
    pub fn set(&mut self, resource: &str, amount: f64) {
        self.0.insert(resource.to_string(), amount.max(0.0));
    }

    pub fn add(&mut self, resource: &str, amount: f64) {
        let held = self.get(resource);
        self.set(resource, held + amount);
    }

    /// Remove up to `amount`, returning what was actually removed.
    pub fn take(&mut self, resource: &str, amount: f64) -> f64 {
        let held = self.get(resource);
        let taken = amount.clamp(0.0, held);
        self.set(resource, held - taken);
        taken
    }

    /// Check every entry of `cost` without mutating. A non-finite amount is never affordable.
    pub fn check(&self, cost: &Cost) -> Result<(), Shortfall> {
        for (resource, &needed) in cost {
            let held = self.get(resource);
            if !needed.is_finite() || held + f64::EPSILON < needed {
                return Err(Shortfall {
                    resource: resource.clone(),
                    needed,
                    held,
                });
            }
        }
        Ok(())
    }

    pub fn can_afford(&self, cost: &Cost) -> bool {
        self.check(cost).is_ok()
    }

    /// Deduct every entry of `cost`, or nothing at all.
    pub fn consume(&mut self, cost: &Cost) -> Result<(), Shortfall> {
        self.check(cost)?;
        for (resource, &needed) in cost {
            let held = self.get(resource);
            self.set(resource, held - needed);
        }
        Ok(())
    }

    /// Resource with the largest holding, if any is above zero.
    pub fn largest(&self) -> Option<(&str, f64)> {
        self.0
            .iter()
            .filter(|&(_, &v)| v > 0.0)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, &v)| (k.as_str(), v))
    }

    /// `preferred` if any is held, else the largest holding.
    pub fn preferred_or_largest(&self, preferred: &str) -> Option<(String, f64)> {
        let held = self.get(preferred);
        if held > 0.0 {
            return Some((preferred.to_string(), held));
        }
        self.largest().map(|(k, v)| (k.to_string(), v))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

impl<const N: usize> From<[(&str, f64); N]> for ResourceLedger {
    fn from(entries: [(&str, f64); N]) -> Self {
        let mut ledger = Self::new();
        for (k, v) in entries {
            ledger.set(k, v);
        }
        ledger
    }
}

/// Multiply every entry of a cost table by `factor`.
pub fn scale_cost(cost: &Cost, factor: f64) -> Cost {
    cost.iter().map(|(k, v)| (k.clone(), v * factor)).collect()
}
