//! The progression store: single owner of the game state and the only place
//! it is mutated.
//!
//! Every command either applies completely or returns an error with the state
//! untouched. A kill (HP reaching 0) credits the reward and spawns the next
//! monster inside the same call, so a dead monster is never observable.
//! Subscribers are notified after each successful mutation.

use thiserror::Error;

use super::config::Balance;
use super::naming::MonsterNamer;
use super::scaling;
use super::state::{GameState, Monster, Player};

/// HP left below this after a hit counts as a kill.
pub const HP_EPSILON: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("not enough gold: need {cost:.2}, have {gold:.2}")]
    InsufficientFunds { cost: f64, gold: f64 },
    #[error("no upgrade with id {0}")]
    UnknownUpgrade(u32),
    #[error("amount must be finite and non-negative, got {0}")]
    InvalidAmount(f64),
}

/// Result of a single damage application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    /// The monster survived with `remaining` HP.
    Hit { remaining: f64 },
    /// The monster died; `reward` was credited and a monster at `level` spawned.
    Killed { reward: f64, level: u32 },
}

/// Details of a successful purchase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PurchaseReceipt {
    pub id: u32,
    pub paid: f64,
    pub times_bought: u32,
    pub next_cost: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&GameState)>;

pub struct ProgressionStore {
    state: GameState,
    balance: Balance,
    namer: Box<dyn MonsterNamer>,
    next_monster_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl ProgressionStore {
    /// Start a session at level 1 with no gold and nothing purchased.
    pub fn new(balance: Balance, mut namer: Box<dyn MonsterNamer>) -> Self {
        let upgrades = balance.catalog();
        let player = Player {
            gold: 0.0,
            click_damage: scaling::derived_click_damage(&balance, &upgrades),
            dps: scaling::derived_dps(&balance, &upgrades),
            upgrades,
        };
        let monster = create_monster(&balance, namer.as_mut(), 1, 1);

        let mut state = GameState {
            player,
            monster,
            kills: 0,
            total_clicks: 0,
            total_damage: 0.0,
            gold_earned: 0.0,
            log: Vec::new(),
        };
        state.add_log("A wild monster appears! Click to attack.", true);

        Self {
            state,
            balance,
            namer,
            next_monster_id: 2,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Read-only snapshot of the whole game.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    /// Register a callback invoked with the new state after every mutation.
    pub fn subscribe(&mut self, callback: impl FnMut(&GameState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self) {
        for (_, callback) in &mut self.subscribers {
            callback(&self.state);
        }
    }

    /// Replace the current monster with a fresh one at `level` (0 is treated as 1).
    pub fn spawn_monster(&mut self, level: u32) {
        self.replace_monster(level);
        self.notify();
    }

    /// Manual skip: spawn the next level without a reward.
    pub fn skip_monster(&mut self) {
        let next = self.state.monster.level.saturating_add(1);
        let skipped = format!("Skipped {}.", self.state.monster.name);
        self.state.add_log(&skipped, false);
        self.spawn_monster(next);
    }

    fn replace_monster(&mut self, level: u32) {
        let level = level.max(1);
        let id = self.next_monster_id;
        self.next_monster_id += 1;
        self.state.monster = create_monster(&self.balance, self.namer.as_mut(), id, level);
    }

    /// Deal `amount` damage. Reaching 0 HP credits the reward and spawns the
    /// next level before returning.
    pub fn damage_monster(&mut self, amount: f64) -> Result<DamageOutcome, StoreError> {
        let outcome = self.apply_damage(amount)?;
        self.notify();
        Ok(outcome)
    }

    /// Manual attack with the player's click damage.
    pub fn click(&mut self) -> Result<DamageOutcome, StoreError> {
        let amount = self.state.player.click_damage;
        let outcome = self.apply_damage(amount)?;
        self.state.total_clicks += 1;
        self.notify();
        Ok(outcome)
    }

    /// Passive damage for one tick. `Ok(None)` (and no notification) when DPS is 0.
    pub fn apply_dps_tick(&mut self) -> Result<Option<DamageOutcome>, StoreError> {
        let dps = self.state.player.dps;
        if !(dps > 0.0) {
            return Ok(None);
        }
        self.damage_monster(dps).map(Some)
    }

    fn apply_damage(&mut self, amount: f64) -> Result<DamageOutcome, StoreError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(StoreError::InvalidAmount(amount));
        }

        let monster = &mut self.state.monster;
        let dealt = amount.min(monster.current_hp);
        let mut hp = (monster.current_hp - amount).max(0.0);
        if hp < HP_EPSILON {
            hp = 0.0;
        }
        monster.current_hp = hp;
        self.state.total_damage = (self.state.total_damage + dealt).min(f64::MAX);

        if hp > 0.0 {
            return Ok(DamageOutcome::Hit { remaining: hp });
        }

        let reward = self.state.monster.reward;
        let defeated = self.state.monster.name.clone();
        let level = self.state.monster.level.saturating_add(1);

        self.state.player.gold = (self.state.player.gold + reward).min(f64::MAX);
        self.state.gold_earned = (self.state.gold_earned + reward).min(f64::MAX);
        self.state.kills += 1;
        self.replace_monster(level);
        self.state.add_log(
            &format!("{} defeated! +{} gold", defeated, format_number(reward)),
            true,
        );

        Ok(DamageOutcome::Killed { reward, level })
    }

    /// Whether the player could buy upgrade `id` right now.
    pub fn can_afford(&self, id: u32) -> bool {
        self.state
            .player
            .upgrade(id)
            .map(|u| self.state.player.gold >= scaling::next_cost(&self.balance, u))
            .unwrap_or(false)
    }

    /// Buy one copy of upgrade `id`. Derived stats are recomputed from the
    /// whole catalog rather than adjusted incrementally.
    pub fn buy_upgrade(&mut self, id: u32) -> Result<PurchaseReceipt, StoreError> {
        let balance = &self.balance;
        let player = &mut self.state.player;

        let idx = player
            .upgrades
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::UnknownUpgrade(id))?;

        let cost = scaling::next_cost(balance, &player.upgrades[idx]);
        if player.gold < cost {
            return Err(StoreError::InsufficientFunds {
                cost,
                gold: player.gold,
            });
        }

        player.gold -= cost;
        let upgrade = &mut player.upgrades[idx];
        upgrade.times_bought += 1;
        upgrade.cost = scaling::next_cost(balance, upgrade);
        let receipt = PurchaseReceipt {
            id,
            paid: cost,
            times_bought: upgrade.times_bought,
            next_cost: upgrade.cost,
        };
        let name = upgrade.name.clone();

        player.click_damage = scaling::derived_click_damage(balance, &player.upgrades);
        player.dps = scaling::derived_dps(balance, &player.upgrades);

        self.state.add_log(
            &format!("Bought {} (x{})", name, receipt.times_bought),
            false,
        );
        self.notify();
        Ok(receipt)
    }

    /// Adjust gold by any finite amount. Gold never drops below 0.
    pub fn add_gold(&mut self, amount: f64) -> Result<(), StoreError> {
        if !amount.is_finite() {
            return Err(StoreError::InvalidAmount(amount));
        }
        self.state.player.gold = (self.state.player.gold + amount).max(0.0);
        self.notify();
        Ok(())
    }
}

fn create_monster(balance: &Balance, namer: &mut dyn MonsterNamer, id: u64, level: u32) -> Monster {
    let max_hp = scaling::monster_max_hp(balance, level);
    Monster {
        id,
        name: format!("{} (Lv.{})", namer.name(level), level),
        avatar: namer.avatar(id),
        level,
        max_hp,
        current_hp: max_hp,
        reward: scaling::monster_reward(balance, level),
    }
}

/// Format with thousands separators and two decimals (e.g. 1234.5 → "1,234.50").
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    let fixed = format!("{:.2}", n);
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut result = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();
    format!("{}.{}", result, frac)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::games::monster::naming::RandomNamer;
    use crate::games::monster::state::UpgradeKind;
    use proptest::prelude::*;

    fn store(seed: u32) -> ProgressionStore {
        ProgressionStore::new(Balance::default(), Box::new(RandomNamer::new(seed)))
    }

    proptest! {
        #[test]
        fn prop_hp_stays_in_bounds(
            hits in prop::collection::vec(0.0f64..20.0, 1..200),
        ) {
            let mut s = store(1);
            for amount in hits {
                s.damage_monster(amount).unwrap();
                let m = &s.state().monster;
                prop_assert!(m.current_hp > 0.0);
                prop_assert!(m.current_hp <= m.max_hp);
            }
        }

        #[test]
        fn prop_kill_is_atomic(level in 1u32..100, overkill in 0.0f64..100.0) {
            let mut s = store(2);
            s.spawn_monster(level);
            let gold_before = s.state().player.gold;
            let old = s.state().monster.clone();
            let outcome = s.damage_monster(old.current_hp + overkill).unwrap();
            prop_assert_eq!(outcome, DamageOutcome::Killed { reward: old.reward, level: level + 1 });
            let st = s.state();
            prop_assert_eq!(st.player.gold, gold_before + old.reward);
            prop_assert_eq!(st.monster.level, old.level + 1);
            prop_assert_eq!(st.monster.current_hp, st.monster.max_hp);
            prop_assert_ne!(st.monster.id, old.id);
        }

        #[test]
        fn prop_failed_buy_changes_nothing(id in 1u32..5, gold in 0.0f64..4.99) {
            let mut s = store(3);
            s.add_gold(gold).unwrap();
            let before = s.state().clone();
            prop_assert!(s.buy_upgrade(id).is_err());
            prop_assert_eq!(s.state(), &before);
        }

        #[test]
        fn prop_derived_stats_recomputed_fresh(
            purchases in prop::collection::vec(1u32..5, 1..60),
        ) {
            let mut s = store(4);
            s.add_gold(1e12).unwrap();
            for id in purchases {
                s.buy_upgrade(id).unwrap();
                let p = &s.state().player;
                let click: f64 = 0.2 + p.upgrades.iter()
                    .filter(|u| u.kind == UpgradeKind::ClickDamage)
                    .map(|u| u.value * u.times_bought as f64)
                    .sum::<f64>();
                let dps: f64 = p.upgrades.iter()
                    .filter(|u| u.kind == UpgradeKind::Dps)
                    .map(|u| u.value * u.times_bought as f64)
                    .sum();
                prop_assert!((p.click_damage - click).abs() < 1e-9);
                prop_assert!((p.dps - dps).abs() < 1e-9);
                for u in &p.upgrades {
                    prop_assert!((u.cost - u.base_cost * 1.15_f64.powi(u.times_bought as i32)).abs() < 1e-6 * u.cost);
                }
            }
        }

        #[test]
        fn prop_repeated_buys_cost_geometric_sum(n in 1u32..40) {
            let mut s = store(5);
            let start = 1e9;
            s.add_gold(start).unwrap();
            for _ in 0..n {
                s.buy_upgrade(2).unwrap();
            }
            let spent = start - s.state().player.gold;
            let expected = scaling::total_cost(s.balance(), 25.0, 0, n);
            prop_assert!((spent - expected).abs() < 1e-6 * expected.max(1.0),
                "spent {} expected {}", spent, expected);
        }

        #[test]
        fn prop_zero_dps_tick_is_noop(hits in 0usize..20) {
            let mut s = store(6);
            for _ in 0..hits {
                s.click().unwrap();
            }
            let before = s.state().clone();
            prop_assert_eq!(s.apply_dps_tick(), Ok(None));
            prop_assert_eq!(s.state(), &before);
        }
    }
}
