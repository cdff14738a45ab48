//! Name and avatar collaborators for freshly spawned monsters.
//!
//! The store treats both outputs as opaque labels; it never inspects them.

const PREFIXES: &[&str] = &[
    "Dark", "Shadow", "Blood", "Fire", "Ice", "Thunder", "Venom", "Chaos",
];

const SUFFIXES: &[&str] = &[
    "Beast", "Fiend", "Demon", "Terror", "Horror", "Monster", "Creature",
];

/// Supplies display labels for a new monster. Called once per spawn.
pub trait MonsterNamer {
    /// Display name for a monster at `level` (without the level tag).
    fn name(&mut self, level: u32) -> String;

    /// Avatar handle for the monster whose unique id is `seed`.
    fn avatar(&mut self, seed: u64) -> String;
}

/// Prefix/suffix names and Robohash avatars from a seeded xorshift RNG.
pub struct RandomNamer {
    rng_state: u32,
}

impl RandomNamer {
    pub fn new(seed: u32) -> Self {
        // xorshift never leaves the zero state
        Self {
            rng_state: if seed == 0 { 42 } else { seed },
        }
    }

    fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    fn pick(&mut self, table: &[&'static str]) -> &'static str {
        table[self.next_random() as usize % table.len()]
    }
}

impl MonsterNamer for RandomNamer {
    fn name(&mut self, _level: u32) -> String {
        let prefix = self.pick(PREFIXES);
        let suffix = self.pick(SUFFIXES);
        format!("{} {}", prefix, suffix)
    }

    fn avatar(&mut self, seed: u64) -> String {
        let set = self.next_random() % 2 + 1;
        format!("https://robohash.org/{}?set=set{}&size=300x300", seed, set)
    }
}
