use std::fmt;

use tracing::debug;

use crate::corpus::Corpus;
use crate::runtime::{Clock, SessionId};
use crate::session::{Phase, Session};

/// Drives sessions: picks passages, forwards input and clock ticks, and owns
/// the countdown timer of the active session.
///
/// A timer exists only while the active session is running. Replacing,
/// restarting or completing the session drops it.
pub struct Engine<C: Clock> {
    corpus: Corpus,
    clock: C,
    budget: u32,
    session: Session,
    session_id: SessionId,
    timer: Option<C::Timer>,
}

impl<C: Clock> Engine<C> {
    pub fn new(corpus: Corpus, clock: C, budget: u32) -> Self {
        let session = Session::new(corpus.pick_passage(), budget);
        let session_id = SessionId::default();
        debug!(session = session_id.0, corpus = corpus.name(), "session created");
        Self {
            corpus,
            clock,
            budget,
            session,
            session_id,
            timer: None,
        }
    }

    /// Replaces the session with a fresh passage from the corpus.
    pub fn new_session(&mut self) {
        self.timer = None;
        self.session = Session::new(self.corpus.pick_passage(), self.budget);
        self.session_id = self.session_id.next();
        debug!(session = self.session_id.0, "new session");
    }

    /// Another attempt at the current passage.
    pub fn restart_session(&mut self) {
        self.timer = None;
        self.session.restart();
        self.session_id = self.session_id.next();
        debug!(session = self.session_id.0, "session restarted");
    }

    pub fn submit_input(&mut self, candidate: &str) -> bool {
        let before = self.session.phase();
        let accepted = self.session.submit_input(candidate);
        self.sync_timer(before);
        accepted
    }

    pub fn tick(&mut self) -> bool {
        let before = self.session.phase();
        let changed = self.session.tick();
        self.sync_timer(before);
        changed
    }

    /// Tick delivered by a timer; ignored unless it belongs to the active session.
    pub fn on_timer(&mut self, session: SessionId) -> bool {
        if session != self.session_id || self.timer.is_none() {
            debug!(
                stale = session.0,
                active = self.session_id.0,
                "dropping tick for inactive timer"
            );
            return false;
        }
        self.tick()
    }

    fn sync_timer(&mut self, before: Phase) {
        match (before, self.session.phase()) {
            (Phase::Idle, Phase::Running) => {
                debug!(session = self.session_id.0, "clock started");
                self.timer = Some(self.clock.start(self.session_id));
            }
            (Phase::Completed, _) => {}
            (_, Phase::Completed) => {
                let stats = self.session.stats();
                debug!(
                    session = self.session_id.0,
                    wpm = stats.wpm,
                    accuracy = stats.accuracy,
                    errors = stats.error_count,
                    "session completed"
                );
                self.timer = None;
            }
            _ => {}
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }
}

impl<C: Clock> fmt::Debug for Engine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("corpus", &self.corpus.name())
            .field("session_id", &self.session_id)
            .field("session", &self.session)
            .field("timer_running", &self.timer.is_some())
            .finish()
    }
}
