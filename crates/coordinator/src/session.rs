//! One game between a human (White) and an AI proposer (Black).

use std::sync::Arc;

use chess_core::{is_valid_move_syntax, parse_square, Board, Color, MoveText, PlayedMove, Position};
use match_store::{LeaderboardEntry, StatsGateway};
use move_proposer::MoveProposer;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    AiSearch, CandidateError, EventReceiver, EventSender, FailedMoves, GameError, GameEvent,
    HistoryEntry, MatchOutcome, MoveHistory, Recorder, SessionConfig, SetupError, Side,
};

/// What happened during a successful AI turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiTurnReport {
    pub played: PlayedMove,
    /// Failed candidates before the accepted one
    pub attempts: u32,
    /// Candidates the board rejected as illegal, in order
    pub rejected: Vec<String>,
}

/// A human move and, unless it ended the game, how the AI answered.
///
/// The human move stands even when the AI reply failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub human: PlayedMove,
    pub ai: Option<Result<AiTurnReport, GameError>>,
}

impl TurnReport {
    pub fn ai_move(&self) -> Option<&AiTurnReport> {
        self.ai.as_ref().and_then(|r| r.as_ref().ok())
    }

    pub fn ai_error(&self) -> Option<&GameError> {
        self.ai.as_ref().and_then(|r| r.as_ref().err())
    }
}

/// Owns the board, history and outcome of a single game.
///
/// All mutation goes through `&mut self`, so a human move can never interleave
/// with an AI turn. The board changes exactly when the history grows.
pub struct GameSession {
    id: Uuid,
    config: SessionConfig,
    start: Board,
    board: Board,
    history: MoveHistory,
    outcome: MatchOutcome,
    proposer: Arc<dyn MoveProposer>,
    recorder: Recorder,
    events: Option<EventSender>,
    ai_thinking: bool,
    /// Set when the AI ran out of attempts; only `restart` clears it
    stalled: bool,
}

impl GameSession {
    /// New game from the standard starting position.
    pub fn new(
        config: SessionConfig,
        proposer: Arc<dyn MoveProposer>,
        gateway: Arc<dyn StatsGateway>,
    ) -> Self {
        Self::with_board(config, proposer, gateway, Board::startpos())
    }

    /// New game from a FEN position. White (the human) must be to move and the
    /// game must not already be over.
    pub fn from_fen(
        config: SessionConfig,
        proposer: Arc<dyn MoveProposer>,
        gateway: Arc<dyn StatsGateway>,
        fen: &str,
    ) -> Result<Self, SetupError> {
        let board = Board::load(fen)?;
        if board.side_to_move() != Color::White {
            return Err(SetupError::BlackToMove);
        }
        if board.terminal().is_some() {
            return Err(SetupError::AlreadyOver);
        }
        Ok(Self::with_board(config, proposer, gateway, board))
    }

    fn with_board(
        config: SessionConfig,
        proposer: Arc<dyn MoveProposer>,
        gateway: Arc<dyn StatsGateway>,
        board: Board,
    ) -> Self {
        let id = Uuid::new_v4();
        info!(game = %id, opponent = proposer.name(), position = %board.position(), "game session created");
        Self {
            id,
            config,
            start: board.clone(),
            board,
            history: MoveHistory::new(),
            outcome: MatchOutcome::Live,
            proposer,
            recorder: Recorder::new(gateway),
            events: None,
            ai_thinking: false,
            stalled: false,
        }
    }

    /// Receive [`GameEvent`]s from now on. A later call replaces the earlier receiver.
    pub fn subscribe(&mut self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn position(&self) -> Position {
        self.board.position()
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    pub fn to_move(&self) -> Side {
        self.history.to_move()
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.ai_thinking
    }

    /// True after [`GameError::AiExhausted`] until [`GameSession::restart`].
    pub fn needs_restart(&self) -> bool {
        self.stalled
    }

    pub fn gateway(&self) -> &Arc<dyn StatsGateway> {
        self.recorder.gateway()
    }

    /// Apply the human's move from `origin` to `destination` (e.g. "e2", "e4").
    ///
    /// Pawns reaching the last rank promote to a queen. On error nothing changes.
    pub fn apply_human_move(
        &mut self,
        origin: &str,
        destination: &str,
    ) -> Result<PlayedMove, GameError> {
        self.ensure_live()?;
        self.ensure_not_stalled()?;
        if self.history.to_move() != Side::Human {
            return self.reject(GameError::OutOfTurn { expected: Side::Ai });
        }

        let squares = parse_square(origin).zip(parse_square(destination));
        let played = squares.and_then(|(from, to)| self.board.attempt_move(from, to, None));
        let Some(played) = played else {
            return self.reject(GameError::IllegalMove {
                from: origin.to_string(),
                to: destination.to_string(),
            });
        };

        self.commit(Side::Human, played);
        Ok(played)
    }

    /// Ask the proposer for moves until one is legal, then apply it.
    ///
    /// Each turn starts with an empty set of failed candidates. Malformed,
    /// repeated and illegal candidates, empty replies and timeouts all count
    /// against `max_ai_attempts`; running out leaves the board and history
    /// untouched, returns [`GameError::AiExhausted`] and stalls the session:
    /// every later move fails with [`GameError::RestartRequired`] until
    /// [`GameSession::restart`].
    pub async fn run_ai_turn(&mut self) -> Result<AiTurnReport, GameError> {
        self.ensure_live()?;
        self.ensure_not_stalled()?;
        if self.history.to_move() != Side::Ai {
            return self.reject(GameError::OutOfTurn {
                expected: Side::Human,
            });
        }

        let budget = self.config.max_ai_attempts;
        let mut failed = FailedMoves::new();
        let mut search = AiSearch::start(budget);

        self.set_thinking(true);
        while let AiSearch::Searching { attempt } = search {
            let verdict = self.try_candidate(&mut failed).await;
            if let Err(reason) = &verdict {
                debug!(game = %self.id, attempt = attempt + 1, %reason, "AI candidate rejected");
            }
            search = search.step(verdict, budget);
        }
        self.set_thinking(false);

        match search {
            AiSearch::Found { played, attempt } => {
                self.commit(Side::Ai, played);
                Ok(AiTurnReport {
                    played,
                    attempts: attempt,
                    rejected: failed.into_vec(),
                })
            }
            AiSearch::Exhausted { attempts } | AiSearch::Searching { attempt: attempts } => {
                error!(game = %self.id, attempts, "AI could not produce a legal move");
                self.stalled = true;
                self.reject(GameError::AiExhausted {
                    ai_name: self.config.ai_name.clone(),
                    attempts,
                })
            }
        }
    }

    /// Human move, the configured pause, then the AI reply.
    ///
    /// Errs only when the human move itself is rejected. Once the human move is
    /// applied, an AI failure is reported inside the [`TurnReport`].
    pub async fn play_human_turn(
        &mut self,
        origin: &str,
        destination: &str,
    ) -> Result<TurnReport, GameError> {
        let human = self.apply_human_move(origin, destination)?;
        if !self.outcome.is_live() {
            return Ok(TurnReport { human, ai: None });
        }

        tokio::time::sleep(self.config.ai_turn_delay()).await;
        let ai = self.run_ai_turn().await;
        Ok(TurnReport {
            human,
            ai: Some(ai),
        })
    }

    /// Check the board for a finished game and settle the outcome once.
    ///
    /// On the transition out of `Live` the result is recorded (plus a
    /// leaderboard entry for the winner on checkmate) and a
    /// [`GameEvent::GameOver`] is sent. Calling it again is a no-op.
    pub fn evaluate_terminal(&mut self) -> MatchOutcome {
        if !self.outcome.is_live() {
            return self.outcome;
        }
        let Some(terminal) = self.board.terminal() else {
            return self.outcome;
        };
        let Some(last) = self.history.last() else {
            return self.outcome;
        };

        let outcome = MatchOutcome::from_terminal(terminal, last.side);
        self.outcome = outcome;
        let moves = self.history.len();
        info!(game = %self.id, ?outcome, moves, "game over");

        if let Some(tally) = outcome.tally() {
            let entry = outcome.winner().map(|winner| {
                LeaderboardEntry::new(self.display_name(winner), moves as u32)
            });
            self.recorder.game_over(tally, entry);
        }
        self.emit(GameEvent::GameOver {
            outcome,
            message: outcome.message().to_string(),
        });
        outcome
    }

    /// Back to the starting position with an empty history.
    ///
    /// Statistics already recorded stay recorded.
    pub fn restart(&mut self) {
        info!(game = %self.id, moves = self.history.len(), "game restarted");
        self.board = self.start.clone();
        self.history.clear();
        self.outcome = MatchOutcome::Live;
        self.ai_thinking = false;
        self.stalled = false;
        self.emit(GameEvent::PositionChanged {
            position: self.board.position(),
            to_move: self.history.to_move(),
            last: None,
        });
    }

    /// Wait for outstanding statistics writes.
    pub async fn settle(&mut self) {
        self.recorder.settle().await;
    }

    async fn try_candidate(&mut self, failed: &mut FailedMoves) -> Result<PlayedMove, CandidateError> {
        let position = self.board.position();
        let reply = tokio::time::timeout(
            self.config.proposal_timeout(),
            self.proposer.propose(&position, failed.as_slice()),
        )
        .await;

        let candidate = match reply {
            Ok(Some(candidate)) => candidate,
            Ok(None) => return Err(CandidateError::NoReply),
            Err(_) => {
                warn!(game = %self.id, timeout_ms = self.config.proposal_timeout_ms, "proposer timed out");
                return Err(CandidateError::TimedOut);
            }
        };

        if !is_valid_move_syntax(&candidate) {
            return Err(CandidateError::Malformed(candidate));
        }
        if failed.contains(&candidate) {
            return Err(CandidateError::Repeated(candidate));
        }
        let Some(text) = MoveText::parse(&candidate) else {
            return Err(CandidateError::Malformed(candidate));
        };

        match self.board.attempt_move(text.from, text.to, text.promotion) {
            Some(played) => Ok(played),
            None => {
                failed.push(candidate.clone());
                Err(CandidateError::Illegal(candidate))
            }
        }
    }

    fn commit(&mut self, side: Side, played: PlayedMove) {
        let entry: HistoryEntry = self.history.push(side, played);
        info!(game = %self.id, ply = self.history.len(), %entry, "move applied");

        self.recorder.move_played();
        self.emit(GameEvent::PositionChanged {
            position: self.board.position(),
            to_move: self.history.to_move(),
            last: Some(entry),
        });
        self.evaluate_terminal();
    }

    fn ensure_live(&self) -> Result<(), GameError> {
        if self.outcome.is_live() {
            Ok(())
        } else {
            self.reject(GameError::GameAlreadyOver {
                outcome: self.outcome,
            })
        }
    }

    fn ensure_not_stalled(&self) -> Result<(), GameError> {
        if self.stalled {
            self.reject(GameError::RestartRequired {
                ai_name: self.config.ai_name.clone(),
            })
        } else {
            Ok(())
        }
    }

    fn reject<T>(&self, err: GameError) -> Result<T, GameError> {
        debug!(game = %self.id, error = %err, "request rejected");
        self.emit(GameEvent::Alert(err.to_string()));
        Err(err)
    }

    fn set_thinking(&mut self, thinking: bool) {
        self.ai_thinking = thinking;
        self.emit(GameEvent::AiThinking(thinking));
    }

    fn display_name(&self, side: Side) -> String {
        match side {
            Side::Human => self.config.player_name.clone(),
            Side::Ai => self.config.ai_name.clone(),
        }
    }

    fn emit(&self, event: GameEvent) {
        if let Some(tx) = &self.events {
            // receiver gone just means nobody is watching
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
