//! High-level runtime engine settings
//!
//! Selects the gravity evaluation (Barnes–Hut or direct), whether tree
//! queries run in parallel, and how many ticks the host loop runs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    pub barnes_hut: bool, // false = direct, true = barnes-hut
    pub parallel: bool, // rayon fan-out for tree queries
    pub ticks: u64, // ticks to run from the host binary
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            barnes_hut: true,
            parallel: false,
            ticks: 100,
        }
    }
}
