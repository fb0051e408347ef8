/// Live scoring for a session. Always derived, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub wpm: u32,
    pub accuracy: u32,
    pub error_count: usize,
    pub elapsed: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
            error_count: 0,
            elapsed: 0,
        }
    }
}

impl Stats {
    pub fn compute(input: &[char], expected: &[char], elapsed: u32) -> Self {
        let error_count = count_errors(input, expected);
        Self {
            wpm: words_per_minute(word_count(input), elapsed),
            accuracy: accuracy(input.len(), error_count),
            error_count,
            elapsed,
        }
    }
}

/// Positions where the typed char differs from the reference.
pub fn count_errors(input: &[char], expected: &[char]) -> usize {
    input
        .iter()
        .zip(expected.iter())
        .filter(|(typed, want)| typed != want)
        .count()
}

pub fn word_count(input: &[char]) -> usize {
    input
        .split(|c| c.is_whitespace())
        .filter(|token| !token.is_empty())
        .count()
}

pub fn words_per_minute(words: usize, elapsed_secs: u32) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }
    (words as f64 / elapsed_secs as f64 * 60.0).round() as u32
}

pub fn accuracy(typed: usize, errors: usize) -> u32 {
    if typed == 0 {
        return 100;
    }
    let correct = typed.saturating_sub(errors);
    (100.0 * correct as f64 / typed as f64).round() as u32
}
