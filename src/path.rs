//! Track path: a random walk over seven discrete levels where the walk never stays
//! on the same level for two consecutive steps.

use rand::Rng;

/// Discrete lane height, 1 (top) through 7 (bottom).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Steps below the top level (level 1 -> 0).
    pub fn offset(self) -> u8 {
        self.0 - Self::MIN
    }
}

/// All levels in ascending order.
pub const LEVELS: [Level; 7] = [
    Level(1),
    Level(2),
    Level(3),
    Level(4),
    Level(5),
    Level(6),
    Level(7),
];

/// Ordered level sequence with no two adjacent entries equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    levels: Vec<Level>,
}

impl Path {
    /// Builds a path from raw values, rejecting out-of-range levels and repeats.
    pub fn from_levels(values: &[u8]) -> Option<Self> {
        let levels = values
            .iter()
            .map(|&v| Level::new(v))
            .collect::<Option<Vec<_>>>()?;
        if levels.windows(2).any(|w| w[0] == w[1]) {
            return None;
        }
        Some(Self { levels })
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Level> {
        self.levels.get(idx).copied()
    }

    pub fn last(&self) -> Option<Level> {
        self.levels.last().copied()
    }

    /// Level at `idx`, holding the last level once the walk runs out.
    pub fn clamped(&self, idx: usize) -> Option<Level> {
        self.get(idx).or_else(|| self.last())
    }
}

/// Generates a fresh path of `length` levels.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Path {
    extend(&Path::default(), rng, length)
}

/// Continues the walk of `path` for `steps` more levels, returning the longer path.
pub fn extend<R: Rng + ?Sized>(path: &Path, rng: &mut R, steps: usize) -> Path {
    let mut levels = Vec::with_capacity(path.len() + steps);
    levels.extend_from_slice(path.levels());
    let mut last = path.last();
    for _ in 0..steps {
        let next = pick_level(rng, last);
        levels.push(next);
        last = Some(next);
    }
    Path { levels }
}

/// Uniform pick among the levels other than `exclude`.
fn pick_level<R: Rng + ?Sized>(rng: &mut R, exclude: Option<Level>) -> Level {
    let candidates: Vec<Level> = LEVELS
        .iter()
        .copied()
        .filter(|&l| Some(l) != exclude)
        .collect();
    candidates[rng.random_range(0..candidates.len())]
}
