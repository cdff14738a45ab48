/// Monster Clicker game state definitions.

use serde::Deserialize;

/// Which derived stat an upgrade feeds.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum UpgradeKind {
    ClickDamage,
    Dps,
}

impl UpgradeKind {
    /// Short label used in the shop list.
    pub fn label(&self) -> &str {
        match self {
            UpgradeKind::ClickDamage => "click",
            UpgradeKind::Dps => "dps",
        }
    }
}

/// A purchasable modifier. `cost` is a cache of `base_cost * growth^times_bought`
/// and is only ever written by the store when `times_bought` changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub id: u32,
    pub name: String,
    pub kind: UpgradeKind,
    /// Stat added per purchase.
    pub value: f64,
    pub base_cost: f64,
    pub times_bought: u32,
    pub cost: f64,
}

impl Upgrade {
    pub fn new(id: u32, name: &str, kind: UpgradeKind, value: f64, base_cost: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            value,
            base_cost,
            times_bought: 0,
            cost: base_cost,
        }
    }

    /// Stat this upgrade currently contributes.
    pub fn contribution(&self) -> f64 {
        self.value * self.times_bought as f64
    }
}

/// The current combat target.
#[derive(Clone, Debug, PartialEq)]
pub struct Monster {
    /// Unique per spawn.
    pub id: u64,
    pub name: String,
    /// Opaque avatar handle (URL) from the naming collaborator.
    pub avatar: String,
    pub level: u32,
    pub max_hp: f64,
    pub current_hp: f64,
    /// Gold paid out on defeat, fixed at spawn.
    pub reward: f64,
}

impl Monster {
    /// Remaining HP as a fraction of max, for gauges.
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp > 0.0 {
            (self.current_hp / self.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub gold: f64,
    /// Derived from `upgrades`; never written outside a recompute.
    pub click_damage: f64,
    /// Derived from `upgrades`; never written outside a recompute.
    pub dps: f64,
    pub upgrades: Vec<Upgrade>,
}

impl Player {
    pub fn upgrade(&self, id: u32) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }
}

/// Log entry for the message pane.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Maximum number of retained log entries.
pub const LOG_CAPACITY: usize = 50;

/// Full state of a Monster Clicker session.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub monster: Monster,
    /// Monsters defeated this session.
    pub kills: u64,
    /// Manual attacks this session.
    pub total_clicks: u64,
    /// Damage dealt from all sources.
    pub total_damage: f64,
    /// Gold earned from kills (excludes `add_gold`).
    pub gold_earned: f64,
    pub log: Vec<LogEntry>,
}

impl GameState {
    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > LOG_CAPACITY {
            self.log.remove(0);
        }
    }
}
