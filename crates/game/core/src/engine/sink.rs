//! Outbound scoring and battle-log stream.

use crate::combat::ScoreEvent;
use crate::state::PlayerId;

/// Append-only receiver for what combat reports to the outside world.
///
/// Battle-log lines are player-facing text; diagnostics go to `tracing`.
pub trait EventSink {
    fn score(&mut self, player: PlayerId, event: ScoreEvent);

    fn log(&mut self, line: String);
}

/// In-memory sink that keeps everything it receives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleLog {
    lines: Vec<String>,
    scores: Vec<(PlayerId, ScoreEvent)>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn scores(&self) -> &[(PlayerId, ScoreEvent)] {
        &self.scores
    }

    /// Score events credited to `player`, in arrival order.
    pub fn scores_of(&self, player: PlayerId) -> impl Iterator<Item = &ScoreEvent> + '_ {
        self.scores
            .iter()
            .filter(move |(owner, _)| *owner == player)
            .map(|(_, event)| event)
    }

    /// Number of log lines containing `needle`.
    pub fn count_lines(&self, needle: &str) -> usize {
        self.lines.iter().filter(|line| line.contains(needle)).count()
    }
}

impl EventSink for BattleLog {
    fn score(&mut self, player: PlayerId, event: ScoreEvent) {
        self.scores.push((player, event));
    }

    fn log(&mut self, line: String) {
        self.lines.push(line);
    }
}
