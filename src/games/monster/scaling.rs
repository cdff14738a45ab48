//! Scaling curves for monsters, rewards and upgrade prices, as pure functions.

use super::config::Balance;
use super::state::{Upgrade, UpgradeKind};

/// Max HP of a monster at `level`. Level 0 is treated as level 1.
pub fn monster_max_hp(balance: &Balance, level: u32) -> f64 {
    geometric(balance.monster_base_hp, balance.hp_growth, level)
}

/// Gold granted for defeating a monster at `level`.
pub fn monster_reward(balance: &Balance, level: u32) -> f64 {
    geometric(balance.monster_base_reward, balance.reward_growth, level)
}

/// Values saturate at `f64::MAX` instead of overflowing to infinity, so a
/// monster at any level stays finite and killable.
fn geometric(base: f64, growth: f64, level: u32) -> f64 {
    if level <= 1 {
        return base;
    }
    (base * growth.powi(exponent(level - 1))).min(f64::MAX)
}

/// `powi` takes an `i32`; counts past `i32::MAX` saturate rather than wrap.
fn exponent(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Click damage from the base floor plus every `ClickDamage` purchase.
pub fn derived_click_damage(balance: &Balance, upgrades: &[Upgrade]) -> f64 {
    sum_of_kind(upgrades, UpgradeKind::ClickDamage, balance.base_click_damage)
}

/// DPS from the base floor plus every `Dps` purchase.
pub fn derived_dps(balance: &Balance, upgrades: &[Upgrade]) -> f64 {
    sum_of_kind(upgrades, UpgradeKind::Dps, balance.base_dps)
}

fn sum_of_kind(upgrades: &[Upgrade], kind: UpgradeKind, floor: f64) -> f64 {
    upgrades
        .iter()
        .filter(|u| u.kind == kind)
        .fold(floor, |sum, u| sum + u.contribution())
        .min(f64::MAX)
}

/// Price of the next copy, evaluated before `times_bought` is incremented.
pub fn next_cost(balance: &Balance, upgrade: &Upgrade) -> f64 {
    upgrade.base_cost * balance.cost_growth.powi(exponent(upgrade.times_bought))
}

/// Total price of `count` consecutive purchases starting at `from` copies owned.
pub fn total_cost(balance: &Balance, base_cost: f64, from: u32, count: u32) -> f64 {
    (from..from.saturating_add(count))
        .map(|k| base_cost * balance.cost_growth.powi(exponent(k)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upgrade(kind: UpgradeKind, value: f64, times_bought: u32) -> Upgrade {
        let mut u = Upgrade::new(1, "Test", kind, value, 5.0);
        u.times_bought = times_bought;
        u
    }

    #[test]
    fn level_one_monster() {
        let b = Balance::default();
        assert_eq!(monster_max_hp(&b, 1), 5.0);
        assert_eq!(monster_reward(&b, 1), 5.0);
    }

    #[test]
    fn level_zero_is_level_one() {
        let b = Balance::default();
        assert_eq!(monster_max_hp(&b, 0), monster_max_hp(&b, 1));
    }

    #[test]
    fn huge_levels_saturate_instead_of_wrapping() {
        let b = Balance::default();
        for level in [2_147_483_648, 2_147_483_649, u32::MAX] {
            assert_eq!(monster_max_hp(&b, level), f64::MAX);
            assert_eq!(monster_reward(&b, level), f64::MAX);
        }
        assert_eq!(next_cost(&b, &upgrade(UpgradeKind::Dps, 0.1, u32::MAX)), f64::INFINITY);
    }

    #[test]
    fn derived_stats_stay_finite() {
        let b = Balance::default();
        let ups = vec![upgrade(UpgradeKind::Dps, 1e300, u32::MAX)];
        assert_eq!(derived_dps(&b, &ups), f64::MAX);
    }

    #[test]
    fn level_two_monster() {
        let b = Balance::default();
        assert!((monster_max_hp(&b, 2) - 5.75).abs() < 1e-12);
        assert!((monster_reward(&b, 2) - 5.9).abs() < 1e-12);
    }

    #[test]
    fn click_damage_floor_without_purchases() {
        let b = Balance::default();
        assert!((derived_click_damage(&b, &b.catalog()) - 0.2).abs() < 1e-12);
        assert_eq!(derived_dps(&b, &b.catalog()), 0.0);
    }

    #[test]
    fn derived_stats_split_by_kind() {
        let b = Balance::default();
        let ups = vec![
            upgrade(UpgradeKind::ClickDamage, 0.2, 3),
            upgrade(UpgradeKind::ClickDamage, 0.5, 1),
            upgrade(UpgradeKind::Dps, 0.1, 4),
        ];
        assert!((derived_click_damage(&b, &ups) - (0.2 + 0.6 + 0.5)).abs() < 1e-9);
        assert!((derived_dps(&b, &ups) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn next_cost_scales_with_purchases() {
        let b = Balance::default();
        assert_eq!(next_cost(&b, &upgrade(UpgradeKind::Dps, 0.1, 0)), 5.0);
        assert!((next_cost(&b, &upgrade(UpgradeKind::Dps, 0.1, 1)) - 5.75).abs() < 1e-12);
    }

    #[test]
    fn total_cost_of_three() {
        let b = Balance::default();
        let expected = 10.0 + 10.0 * 1.15 + 10.0 * 1.15 * 1.15;
        assert!((total_cost(&b, 10.0, 0, 3) - expected).abs() < 1e-9);
        assert_eq!(total_cost(&b, 10.0, 4, 0), 0.0);
    }
}
