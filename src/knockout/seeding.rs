//! Seeding the first knockout round from league standings.
//!
//! The bracket is a fixed shape: a power-of-two number of first-round
//! matches, each taking `capacity` seeds, halving every round down to the
//! final. Seeds are paired highest-vs-lowest and the pairs folded again, so
//! the strongest seeds cannot meet before the last rounds.

/// Shape of a generated bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketShape {
    pub first_round_matches: usize,
    pub capacity: usize,
}

impl BracketShape {
    /// The largest power-of-two first round the eligible teams can fill
    /// (at least one match)
    pub fn for_teams(eligible: usize, capacity: usize) -> Self {
        let mut m = 1;
        while m * 2 * capacity <= eligible {
            m *= 2;
        }
        Self {
            first_round_matches: m,
            capacity,
        }
    }

    /// Number of seeds entering the first round
    pub fn seats(&self) -> usize {
        self.first_round_matches * self.capacity
    }

    /// Total rounds down to and including the final
    pub fn rounds(&self) -> usize {
        let mut rounds = 1;
        let mut m = self.first_round_matches;
        while m > 1 {
            m /= 2;
            rounds += 1;
        }
        rounds
    }
}

/// Fold an ordered seed list into first-round line-ups.
///
/// Seeds are paired end-to-end (1 vs K, 2 vs K-1, ...), then the pairs are
/// folded the same way until each group reaches the arena capacity.
pub fn fold_seeds<T: Clone>(seeds: Vec<T>, capacity: usize) -> Vec<Vec<T>> {
    let mut groups: Vec<Vec<T>> = seeds.into_iter().map(|s| vec![s]).collect();
    while groups.len() > 1 && groups[0].len() * 2 <= capacity {
        let n = groups.len();
        let mut folded = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let mut group = groups[i].clone();
            group.extend(groups[n - 1 - i].iter().cloned());
            folded.push(group);
        }
        groups = folded;
    }
    groups
}
