mod games;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use games::monster::config::Balance;
use games::monster::naming::RandomNamer;
use games::monster::MonsterGame;
use games::Game;
use input::{ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::{GameTime, TICKS_PER_SECOND};

/// Balance overrides bundled at build time.
const BALANCE_JSON: &str = include_str!("../balance.json");

fn load_balance() -> Balance {
    match Balance::from_json(BALANCE_JSON) {
        Ok(balance) => balance,
        Err(e) => {
            web_sys::console::warn_1(&format!("balance.json rejected, using defaults: {}", e).into());
            Balance::default()
        }
    }
}

/// Start a fresh session with a wall-clock seeded namer.
fn new_game() -> MonsterGame {
    let seed = (js_sys::Date::now() as u64 & 0xffff_ffff) as u32;
    let mut game = MonsterGame::new(load_balance(), Box::new(RandomNamer::new(seed)));

    let mut last_kills = 0;
    game.watch(move |st| {
        if st.kills != last_kills {
            last_kills = st.kills;
            web_sys::console::log_1(
                &format!(
                    "kill #{}: gold={:.2} next=Lv.{} ({:.2} hp)",
                    st.kills, st.player.gold, st.monster.level, st.monster.max_hp
                )
                .into(),
            );
        }
    });
    game
}

/// Resolve a pointer position in page pixels to a click target action.
fn dom_hit_test(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    cs.hit_test_pixels(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    )
}

/// Tear down the running session and start a new one.
fn restart(game: &mut MonsterGame) {
    game.stop();
    *game = new_game();
    web_sys::console::log_1(&"session restarted".into());
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let state = Rc::new(RefCell::new(new_game()));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let state = state.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_hit_test(mouse_event.x, mouse_event.y, &cs)
            };

            if let Some(action_id) = action {
                state.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    terminal.on_key_event({
        let state = state.clone();
        move |key_event| {
            let mut gs = state.borrow_mut();
            match key_event.code {
                KeyCode::Char('r') => restart(&mut gs),
                KeyCode::Char(c) => {
                    gs.handle_input(&InputEvent::Key(c));
                }
                _ => {}
            }
        }
    });

    let mut game_time = GameTime::new(TICKS_PER_SECOND);
    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = game_time.update(js_sys::Date::now());
            let mut gs = state.borrow_mut();
            if ticks > 0 {
                gs.tick(ticks);
            }

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(10)])
                .split(size);

            render_title(f, chunks[0]);
            gs.render(f, chunks[1], &click_state);
        }
    });

    Ok(())
}

fn render_title(f: &mut ratzilla::ratatui::Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "Monster Clicker",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   [R] new game", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, area);
}
