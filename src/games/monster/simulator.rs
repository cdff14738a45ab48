//! Balance simulator for Monster Clicker.
//! Run with: cargo test simulate_greedy -- --nocapture

use super::config::Balance;
use super::naming::RandomNamer;
use super::scaling;
use super::state::UpgradeKind;
use super::MonsterGame;
use crate::games::Game;
use crate::input::InputEvent;
use crate::time::TICKS_PER_SECOND;

/// Assumed manual click rate of an engaged player.
const CLICKS_PER_SEC: u32 = 5;

/// Affordable upgrade with the shortest payback, counting click damage at
/// `CLICKS_PER_SEC`.
fn best_purchase(game: &MonsterGame) -> Option<u32> {
    let state = game.store.state();
    let balance = game.store.balance();
    let mut best: Option<(f64, u32)> = None;

    for u in &state.player.upgrades {
        let cost = scaling::next_cost(balance, u);
        if cost > state.player.gold {
            continue;
        }
        let gain = match u.kind {
            UpgradeKind::ClickDamage => u.value * CLICKS_PER_SEC as f64,
            UpgradeKind::Dps => u.value,
        };
        let payback = cost / gain;
        if best.map_or(true, |(bp, _)| payback < bp) {
            best = Some((payback, u.id));
        }
    }
    best.map(|(_, id)| id)
}

fn report(game: &MonsterGame, seconds: u32) {
    let st = game.store.state();
    let owned: Vec<String> = st
        .player
        .upgrades
        .iter()
        .map(|u| format!("{}:{}", u.name, u.times_bought))
        .collect();
    eprintln!(
        "{:>4}s  Lv.{:<3} gold {:>10.2}  click {:>6.2}  dps {:>6.2}  kills {:<4} {}",
        seconds,
        st.monster.level,
        st.player.gold,
        st.player.click_damage,
        st.player.dps,
        st.kills,
        owned.join(" ")
    );
}

fn simulate(seconds: u32) -> MonsterGame {
    let mut game = MonsterGame::new(Balance::default(), Box::new(RandomNamer::new(2024)));
    for sec in 1..=seconds {
        for _ in 0..CLICKS_PER_SEC {
            game.handle_input(&InputEvent::Key('c'));
        }
        game.tick(TICKS_PER_SECOND);
        while let Some(id) = best_purchase(&game) {
            if game.store.buy_upgrade(id).is_err() {
                break;
            }
        }
        assert!(game.store.state().player.gold >= 0.0);
        if sec % 60 == 0 {
            report(&game, sec);
        }
    }
    game
}

#[test]
fn simulate_greedy() {
    let game = simulate(600);
    let st = game.store.state();
    assert!(st.monster.level >= 40, "only reached level {}", st.monster.level);
    assert_eq!(st.kills as u32, st.monster.level - 1);
    assert!(st.player.upgrades.iter().all(|u| u.times_bought > 0));
    assert!(st.player.dps > 0.0);
}

#[test]
fn idle_player_never_progresses() {
    let mut game = MonsterGame::new(Balance::default(), Box::new(RandomNamer::new(1)));
    game.tick(TICKS_PER_SECOND * 600);
    assert_eq!(game.store.state().monster.level, 1);
    assert_eq!(game.store.state().player.gold, 0.0);
}
