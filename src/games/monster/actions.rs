//! Semantic action IDs for Monster Clicker click targets.
//!
//! Registered during render and dispatched via `InputEvent::Click`.

pub const ATTACK: u16 = 0;
pub const SKIP_MONSTER: u16 = 1;
pub const DEBUG_GOLD: u16 = 2;

// ── Upgrade purchase (base + catalog index) ─────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;
