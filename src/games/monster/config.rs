//! Balance constants and the upgrade catalog.
//!
//! Defaults reproduce the shipped game. A JSON document may override any
//! subset of fields; missing fields keep their default via `#[serde(default)]`.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use super::state::{Upgrade, UpgradeKind};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("balance JSON could not be parsed")]
    Parse(#[from] serde_json::Error),
    #[error("invalid balance: {0}")]
    Invalid(String),
}

/// One entry of the upgrade catalog as written in the balance file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UpgradeSpec {
    pub id: u32,
    pub name: String,
    pub kind: UpgradeKind,
    pub value: f64,
    pub base_cost: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Balance {
    pub base_click_damage: f64,
    pub base_dps: f64,
    pub monster_base_hp: f64,
    pub hp_growth: f64,
    pub monster_base_reward: f64,
    /// Must stay above `hp_growth` so income keeps ahead of difficulty.
    pub reward_growth: f64,
    pub cost_growth: f64,
    /// Real-time period between passive damage applications.
    pub dps_interval_ms: u32,
    pub upgrades: Vec<UpgradeSpec>,
}

impl Default for Balance {
    fn default() -> Self {
        let entry = |id, name: &str, kind, value, base_cost| UpgradeSpec {
            id,
            name: name.into(),
            kind,
            value,
            base_cost,
        };
        Self {
            base_click_damage: 0.2,
            base_dps: 0.0,
            monster_base_hp: 5.0,
            hp_growth: 1.15,
            monster_base_reward: 5.0,
            reward_growth: 1.18,
            cost_growth: 1.15,
            dps_interval_ms: 1000,
            upgrades: vec![
                entry(1, "Sharp Claws", UpgradeKind::ClickDamage, 0.2, 5.0),
                entry(2, "Power Strike", UpgradeKind::ClickDamage, 0.5, 25.0),
                entry(3, "Auto Attack", UpgradeKind::Dps, 0.1, 10.0),
                entry(4, "Rapid Fire", UpgradeKind::Dps, 0.5, 50.0),
            ],
        }
    }
}

impl Balance {
    /// Parse and validate a balance document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let balance: Balance = serde_json::from_str(json)?;
        balance.validate()?;
        Ok(balance)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(self.base_click_damage >= 0.0) || !(self.base_dps >= 0.0) {
            return invalid("base damage floors must be non-negative".into());
        }
        if !(self.monster_base_hp > 0.0) || !(self.monster_base_reward > 0.0) {
            return invalid("monster base HP and reward must be positive".into());
        }
        for (name, growth) in [
            ("hp_growth", self.hp_growth),
            ("reward_growth", self.reward_growth),
            ("cost_growth", self.cost_growth),
        ] {
            if !(growth > 1.0) || !growth.is_finite() {
                return invalid(format!("{} must be a finite factor above 1, got {}", name, growth));
            }
        }
        if self.reward_growth <= self.hp_growth {
            return invalid(format!(
                "reward_growth ({}) must exceed hp_growth ({})",
                self.reward_growth, self.hp_growth
            ));
        }
        if self.dps_interval_ms == 0 {
            return invalid("dps_interval_ms must be non-zero".into());
        }

        let mut seen = HashSet::new();
        for u in &self.upgrades {
            if !seen.insert(u.id) {
                return invalid(format!("duplicate upgrade id {}", u.id));
            }
            let positive = |x: f64| x > 0.0 && x.is_finite();
            if !positive(u.value) || !positive(u.base_cost) {
                return invalid(format!("upgrade {} needs finite positive value and cost", u.id));
            }
        }
        Ok(())
    }

    /// Fresh, never-purchased upgrades in catalog order.
    pub fn catalog(&self) -> Vec<Upgrade> {
        self.upgrades
            .iter()
            .map(|s| Upgrade::new(s.id, &s.name, s.kind, s.value, s.base_cost))
            .collect()
    }
}
