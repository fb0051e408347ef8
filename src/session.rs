use crate::corpus::Passage;
use crate::stats::Stats;
use crate::time_series::WpmSample;
use crate::util::std_dev;

pub const DEFAULT_BUDGET_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No keystroke yet, clock not counting.
    Idle,
    Running,
    /// Terminal until the session is reset.
    Completed,
}

/// One attempt at one passage.
///
/// `input` never grows past the passage and `cursor` always equals its
/// length once a call returns. `stats` is recomputed from scratch after
/// every change instead of being updated incrementally.
#[derive(Debug, Clone)]
pub struct Session {
    passage: Passage,
    expected: Vec<char>,
    input: Vec<char>,
    cursor: usize,
    budget: u32,
    clock_remaining: u32,
    phase: Phase,
    stats: Stats,
    samples: Vec<WpmSample>,
}

impl Session {
    /// `budget` is clamped to at least one second.
    pub fn new(passage: Passage, budget: u32) -> Self {
        let budget = budget.max(1);
        Self {
            expected: passage.text.chars().collect(),
            passage,
            input: Vec::new(),
            cursor: 0,
            budget,
            clock_remaining: budget,
            phase: Phase::Idle,
            stats: Stats::default(),
            samples: Vec::new(),
        }
    }

    /// Fresh attempt at the same passage.
    pub fn restart(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.clock_remaining = self.budget;
        self.phase = Phase::Idle;
        self.stats = Stats::default();
        self.samples.clear();
    }

    /// Applies the full contents of the input box.
    ///
    /// Returns false when the candidate was rejected: the session is already
    /// completed, or the candidate is longer than the passage.
    pub fn submit_input(&mut self, candidate: &str) -> bool {
        if self.phase == Phase::Completed {
            return false;
        }
        let candidate: Vec<char> = candidate.chars().collect();
        if candidate.len() > self.expected.len() {
            return false;
        }

        match self.word_skip_target(&candidate) {
            Some(space_idx) => {
                // The abandoned word is replaced by the reference text, typos included.
                let word_start = self.current_word_start();
                self.input.truncate(word_start);
                self.input.extend_from_slice(&self.expected[word_start..=space_idx]);
            }
            None => self.input = candidate,
        }
        self.cursor = self.input.len();

        if self.phase == Phase::Idle && !self.input.is_empty() {
            self.phase = Phase::Running;
        }
        self.refresh_stats();

        if self.input.len() == self.expected.len() {
            self.phase = Phase::Completed;
            self.record_final_sample();
        }
        true
    }

    /// One second off the clock. Does nothing once completed.
    pub fn tick(&mut self) -> bool {
        if self.phase == Phase::Completed {
            return false;
        }
        self.clock_remaining = self.clock_remaining.saturating_sub(1);
        self.refresh_stats();
        self.samples.push(WpmSample::new(self.stats.elapsed, self.stats.wpm));

        if self.clock_remaining == 0 {
            self.phase = Phase::Completed;
        }
        true
    }

    /// Index of the space ending the current word, when `candidate` is the
    /// current input plus a single space.
    fn word_skip_target(&self, candidate: &[char]) -> Option<usize> {
        if candidate.len() != self.input.len() + 1 || candidate.last() != Some(&' ') {
            return None;
        }
        self.expected[self.cursor..]
            .iter()
            .position(|c| *c == ' ')
            .map(|offset| self.cursor + offset)
    }

    fn current_word_start(&self) -> usize {
        self.expected[..self.cursor]
            .iter()
            .rposition(|c| *c == ' ')
            .map_or(0, |idx| idx + 1)
    }

    fn refresh_stats(&mut self) {
        let elapsed = self.budget - self.clock_remaining;
        self.stats = Stats::compute(&self.input, &self.expected, elapsed);
    }

    fn record_final_sample(&mut self) {
        let final_sample = WpmSample::new(self.stats.elapsed, self.stats.wpm);
        match self.samples.last_mut() {
            Some(last) if last.elapsed == final_sample.elapsed => *last = final_sample,
            _ if final_sample.elapsed > 0 => self.samples.push(final_sample),
            _ => {}
        }
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn expected(&self) -> &[char] {
        &self.expected
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    pub fn input_text(&self) -> String {
        self.input.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn clock_remaining(&self) -> u32 {
        self.clock_remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn samples(&self) -> &[WpmSample] {
        &self.samples
    }

    /// Spread of the sampled WPM readings, lower is steadier.
    pub fn consistency(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }
        let readings: Vec<f64> = self.samples.iter().map(|s| s.wpm as f64).collect();
        std_dev(&readings).unwrap_or(0.0)
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(text: &str) -> Session {
        Session::new(Passage::new(text), DEFAULT_BUDGET_SECS)
    }

    #[test]
    fn new_session_is_idle_with_neutral_stats() {
        let s = session("hello world");
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.cursor(), 0);
        assert!(s.input().is_empty());
        assert_eq!(s.clock_remaining(), 60);
        assert_eq!(s.stats(), Stats::default());
    }

    #[test]
    fn first_keystroke_starts_the_clock() {
        let mut s = session("hello");
        assert!(s.submit_input("h"));
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn empty_submit_on_fresh_session_changes_nothing() {
        let mut s = session("hello");
        assert!(s.submit_input(""));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.stats(), Stats::default());
    }

    #[test]
    fn overlong_candidate_is_ignored() {
        let mut s = session("hi");
        assert!(!s.submit_input("hiya"));
        assert!(s.input().is_empty());
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn backspace_shrinks_input_and_cursor() {
        let mut s = session("hello");
        s.submit_input("hex");
        assert_eq!(s.stats().error_count, 1);
        s.submit_input("he");
        assert_eq!(s.input_text(), "he");
        assert_eq!(s.cursor(), 2);
        assert_eq!(s.stats().error_count, 0);
        assert_eq!(s.phase(), Phase::Running);
    }

    #[test]
    fn space_skips_and_corrects_the_current_word() {
        let mut s = session("cat dog");
        s.submit_input("c");
        s.submit_input("ca");
        s.submit_input("cax");
        assert_eq!(s.stats().error_count, 1);

        s.submit_input("cax ");
        assert_eq!(s.input_text(), "cat ");
        assert_eq!(s.cursor(), 4);
        assert_eq!(s.stats().error_count, 0);
    }

    #[test]
    fn space_mid_word_fills_the_rest_of_it() {
        let mut s = session("quick brown fox");
        s.submit_input("q");
        s.submit_input("qu");
        s.submit_input("qu ");
        assert_eq!(s.input_text(), "quick ");
        assert_eq!(s.cursor(), 6);
    }

    #[test]
    fn space_keeps_errors_before_the_current_word() {
        let mut s = session("ab cd ef");
        for candidate in ["a", "ab", "abx", "abxc", "abxcd"] {
            s.submit_input(candidate);
        }
        assert_eq!(s.stats().error_count, 1);
        s.submit_input("abxcd ");
        assert_eq!(s.input_text(), "abxcd ");
        assert_eq!(s.cursor(), 6);
        assert_eq!(s.stats().error_count, 1);
    }

    #[test]
    fn space_in_the_last_word_is_typed_literally() {
        let mut s = session("cat dog");
        s.submit_input("cat ");
        s.submit_input("cat d");
        s.submit_input("cat d ");
        assert_eq!(s.input_text(), "cat d ");
        assert_eq!(s.cursor(), 6);
        assert_eq!(s.stats().error_count, 1);
    }

    #[test]
    fn space_from_idle_skips_the_first_word_and_starts() {
        let mut s = session("one two");
        s.submit_input(" ");
        assert_eq!(s.input_text(), "one ");
        assert_eq!(s.phase(), Phase::Running);
    }

    #[test]
    fn typing_the_whole_passage_completes() {
        let mut s = session("ab");
        s.submit_input("a");
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.stats().error_count, 0);
        s.submit_input("ax");
        assert_eq!(s.phase(), Phase::Completed);
        assert_eq!(s.stats().error_count, 1);
        assert_eq!(s.stats().accuracy, 50);
    }

    #[test]
    fn completed_session_rejects_input() {
        let mut s = session("ab");
        s.submit_input("a");
        s.submit_input("ab");
        assert!(!s.submit_input("a"));
        assert_eq!(s.input_text(), "ab");
    }

    #[test]
    fn ticks_after_completion_do_nothing() {
        let mut s = session("ab");
        s.submit_input("a");
        s.tick();
        s.submit_input("ab");
        let remaining = s.clock_remaining();
        for _ in 0..10 {
            assert!(!s.tick());
        }
        assert_eq!(s.clock_remaining(), remaining);
    }

    #[test]
    fn clock_running_out_completes() {
        let mut s = Session::new(Passage::new("hello"), 3);
        s.submit_input("h");
        s.tick();
        s.tick();
        assert_eq!(s.phase(), Phase::Running);
        s.tick();
        assert_eq!(s.phase(), Phase::Completed);
        assert_eq!(s.clock_remaining(), 0);
        assert_eq!(s.stats().elapsed, 3);
        assert!(!s.tick());
        assert_eq!(s.clock_remaining(), 0);
    }

    #[test]
    fn sixty_ticks_without_input_complete_at_full_accuracy() {
        let mut s = session("hello");
        for _ in 0..60 {
            s.tick();
        }
        assert_eq!(s.phase(), Phase::Completed);
        assert!(s.input().is_empty());
        assert_eq!(s.stats().accuracy, 100);
        assert_eq!(s.stats().elapsed, 60);
    }

    #[test]
    fn elapsed_tracks_the_clock() {
        let mut s = session("hello world");
        s.submit_input("h");
        for _ in 0..5 {
            s.tick();
        }
        assert_eq!(s.stats().elapsed, 5);
        assert_eq!(s.clock_remaining(), 55);
    }

    #[test]
    fn wpm_follows_words_over_elapsed_time() {
        let mut s = session("one two three four");
        s.submit_input("one two ");
        for _ in 0..6 {
            s.tick();
        }
        assert_eq!(s.stats().wpm, 20);
    }

    #[test]
    fn restart_keeps_passage_and_clears_progress() {
        let mut s = session("hello");
        s.submit_input("hx");
        s.tick();
        s.restart();
        assert_eq!(s.passage().text, "hello");
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.input().is_empty());
        assert_eq!(s.clock_remaining(), 60);
        assert!(s.samples().is_empty());
        assert_eq!(s.stats(), Stats::default());
    }

    #[test]
    fn samples_are_taken_each_tick() {
        let mut s = session("ab cd");
        s.submit_input("a");
        s.tick();
        s.tick();
        s.submit_input("ab ");
        s.submit_input("ab c");
        s.submit_input("ab cd");
        let elapsed: Vec<u32> = s.samples().iter().map(|p| p.elapsed).collect();
        assert_eq!(elapsed, vec![1, 2]);
    }

    #[test]
    fn finishing_between_ticks_updates_the_last_sample() {
        let mut s = session("ab cd");
        s.submit_input("a");
        s.tick();
        assert_eq!(s.samples(), &[WpmSample::new(1, 60)]);
        s.submit_input("ab cd");
        assert_eq!(s.samples(), &[WpmSample::new(1, 120)]);
    }

    #[test]
    fn consistency_needs_two_samples() {
        let mut s = session("hello world");
        assert_eq!(s.consistency(), 0.0);
        s.submit_input("h");
        s.tick();
        assert_eq!(s.consistency(), 0.0);
    }

    #[test]
    fn non_ascii_passages_index_by_char() {
        let mut s = session("café au lait");
        s.submit_input("café");
        assert_eq!(s.cursor(), 4);
        assert_eq!(s.stats().error_count, 0);
        s.submit_input("café ");
        assert_eq!(s.input_text(), "café ");
    }

    #[test]
    fn zero_budget_is_clamped() {
        let s = Session::new(Passage::new("x"), 0);
        assert_eq!(s.budget(), 1);
        assert_eq!(s.clock_remaining(), 1);
    }
}
