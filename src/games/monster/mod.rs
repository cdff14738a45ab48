//! Monster Clicker: click a monster to death, collect gold, buy upgrades.

pub mod actions;
pub mod config;
pub mod naming;
pub mod render;
pub mod scaling;
pub mod state;
pub mod store;

#[cfg(test)]
mod simulator;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};
use crate::time::{DpsTicker, TICKS_PER_SECOND};

use config::Balance;
use naming::MonsterNamer;
use state::GameState;
use store::{ProgressionStore, StoreError, SubscriptionId};

/// Gold granted by the debug command.
pub const DEBUG_GOLD_AMOUNT: f64 = 100.0;

/// Host-side controller: routes input to store commands and owns the DPS ticker.
pub struct MonsterGame {
    pub store: ProgressionStore,
    ticker: DpsTicker,
    /// Last rejected command, shown until the next successful one.
    pub last_error: Option<StoreError>,
    /// Host observers, released on `stop`.
    watchers: Vec<SubscriptionId>,
}

impl MonsterGame {
    pub fn new(balance: Balance, namer: Box<dyn MonsterNamer>) -> Self {
        let ticker = DpsTicker::new(balance.dps_interval_ms, TICKS_PER_SECOND);
        Self {
            store: ProgressionStore::new(balance, namer),
            ticker,
            last_error: None,
            watchers: Vec::new(),
        }
    }

    /// Observe every successful mutation until the session is stopped.
    pub fn watch(&mut self, callback: impl FnMut(&GameState) + 'static) {
        let id = self.store.subscribe(callback);
        self.watchers.push(id);
    }

    /// Whether passive damage is currently scheduled.
    pub fn dps_active(&self) -> bool {
        self.ticker.is_armed(self.store.state().player.dps)
    }

    fn record<T>(&mut self, result: Result<T, StoreError>) {
        self.last_error = result.err();
    }

    fn buy_by_index(&mut self, index: usize) {
        let id = match self.store.state().player.upgrades.get(index) {
            Some(u) => u.id,
            None => return,
        };
        let result = self.store.buy_upgrade(id);
        self.record(result);
    }
}

impl Game for MonsterGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key('c') | InputEvent::Click(actions::ATTACK) => {
                let result = self.store.click();
                self.record(result);
                true
            }
            InputEvent::Key('s') | InputEvent::Click(actions::SKIP_MONSTER) => {
                self.store.skip_monster();
                self.last_error = None;
                true
            }
            InputEvent::Key('g') | InputEvent::Click(actions::DEBUG_GOLD) => {
                let result = self.store.add_gold(DEBUG_GOLD_AMOUNT);
                self.record(result);
                true
            }
            InputEvent::Key(c @ '1'..='9') => {
                self.buy_by_index((*c as u8 - b'1') as usize);
                true
            }
            InputEvent::Click(id) if *id >= actions::BUY_UPGRADE_BASE => {
                self.buy_by_index((*id - actions::BUY_UPGRADE_BASE) as usize);
                true
            }
            _ => false,
        }
    }

    fn tick(&mut self, delta_ticks: u32) {
        let fires = self.ticker.advance(delta_ticks, self.store.state().player.dps);
        for _ in 0..fires {
            if let Err(e) = self.store.apply_dps_tick() {
                self.last_error = Some(e);
                break;
            }
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }

    fn stop(&mut self) {
        self.ticker.stop();
        for id in self.watchers.drain(..) {
            self.store.unsubscribe(id);
        }
    }
}
