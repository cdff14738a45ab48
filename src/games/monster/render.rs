//! Plain text readout of the current session: monster, player stats, shop, log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;
use crate::widgets::ClickableList;

use super::actions::{ATTACK, BUY_UPGRADE_BASE, DEBUG_GOLD, SKIP_MONSTER};
use super::scaling;
use super::state::GameState;
use super::store::format_number;
use super::MonsterGame;

/// Width of the HP bar in cells.
const HP_BAR_WIDTH: usize = 20;

pub fn render(game: &MonsterGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let state = game.store.state();

    let (main_area, log_area) = if area.width >= 80 {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        (h_chunks[0], Some(h_chunks[1]))
    } else {
        (area, None)
    };

    let shop_height = state.player.upgrades.len() as u16 + 4;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(shop_height),
            Constraint::Min(3),
        ])
        .split(main_area);

    render_monster(state, f, chunks[0], click_state);
    render_stats(game, f, chunks[1]);
    render_shop(game, f, chunks[2], click_state);
    match log_area {
        Some(log_area) => render_log(state, f, log_area),
        None => render_log(state, f, chunks[3]),
    }
}

/// Text HP bar, e.g. `██████░░░░`.
pub fn hp_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_monster(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let m = &state.monster;
    let lines = vec![
        Line::from(Span::styled(
            m.name.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(hp_bar(m.hp_ratio(), HP_BAR_WIDTH), Style::default().fg(Color::Red)),
            Span::raw(format!(
                " {} / {}",
                format_number(m.current_hp),
                format_number(m.max_hp)
            )),
        ]),
        Line::from(Span::styled(
            format!("Reward: {} gold", format_number(m.reward)),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            " [C] Attack   [S] Skip   [G] +100 gold (debug)",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(format!(" Monster Lv.{} ", m.level)),
    );
    f.render_widget(widget, area);

    register_monster_targets(area, &mut click_state.borrow_mut());
}

/// Whole panel attacks; the hint row splits into skip (left half) and debug
/// gold (right half). Hint targets are clipped to the panel's inner rows.
fn register_monster_targets(area: Rect, cs: &mut ClickState) {
    cs.add_click_target(area, ATTACK);
    let inner = Rect::new(area.x, area.y + 1, area.width, area.height.saturating_sub(2));
    let hint_row = area.y + 4;
    cs.add_row_target(inner, hint_row, SKIP_MONSTER);
    let half = area.width / 2;
    cs.add_clipped_target(inner, Rect::new(area.x + half, hint_row, area.width - half, 1), DEBUG_GOLD);
}

fn render_stats(game: &MonsterGame, f: &mut Frame, area: Rect) {
    let p = &game.store.state().player;
    let invested: f64 = p
        .upgrades
        .iter()
        .map(|u| scaling::total_cost(game.store.balance(), u.base_cost, 0, u.times_bought))
        .sum();
    let dps_style = if game.dps_active() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let line = Line::from(vec![
        Span::styled(
            format!("Gold {}", format_number(p.gold)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Click {}", format_number(p.click_damage)),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(format!("DPS {}", format_number(p.dps)), dps_style),
        Span::raw("  "),
        Span::styled(
            format!("Invested {}", format_number(invested)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(widget, area);
}

fn render_shop(game: &MonsterGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let state = game.store.state();
    let mut cl = ClickableList::new();

    for (i, u) in state.player.upgrades.iter().enumerate() {
        let affordable = game.store.can_afford(u.id);
        let style = if affordable {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let line = Line::from(vec![
            Span::styled(format!(" [{}] ", i + 1), style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("{:<13}", u.name), style),
            Span::styled(format!("+{} {}", format_number(u.value), u.kind.label()), style),
            Span::styled(format!("  x{}  ", u.times_bought), style),
            Span::styled(format!("{}g", format_number(u.cost)), Style::default().fg(Color::Yellow)),
        ]);
        cl.push_clickable(line, BUY_UPGRADE_BASE + i as u16);
    }

    cl.push(Line::from(""));
    let status = match &game.last_error {
        Some(err) => Line::from(Span::styled(format!(" {}", err), Style::default().fg(Color::Red))),
        None => Line::from(""),
    };
    cl.push(status);

    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1);

    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Upgrades "),
    );
    f.render_widget(widget, area);
}

fn render_log(state: &GameState, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = state.log.len().saturating_sub(visible);
    let lines: Vec<Line> = state.log[start..]
        .iter()
        .map(|entry| {
            let style = if entry.is_important {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(entry.text.clone(), style))
        })
        .collect();

    let title = format!(" Log  (kills {} / clicks {}) ", state.kills, state.total_clicks);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(title),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
