use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chess_core::Square;
use match_store::{MatchStats, MemoryStore};

use super::*;

/// Replies from a fixed script, recording what it was asked.
struct ScriptedProposer {
    replies: Mutex<VecDeque<Option<String>>>,
    exclusions: Mutex<Vec<Vec<String>>>,
}

impl ScriptedProposer {
    fn new(replies: &[Option<&str>]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.map(str::to_string)).collect()),
            exclusions: Mutex::new(Vec::new()),
        })
    }

    fn moves(moves: &[&str]) -> Arc<Self> {
        let replies: Vec<Option<&str>> = moves.iter().map(|m| Some(*m)).collect();
        Self::new(&replies)
    }

    fn calls(&self) -> usize {
        self.exclusions.lock().unwrap().len()
    }

    fn exclusions(&self) -> Vec<Vec<String>> {
        self.exclusions.lock().unwrap().clone()
    }
}

#[async_trait]
impl MoveProposer for ScriptedProposer {
    async fn propose(&self, _position: &Position, excluded: &[String]) -> Option<String> {
        self.exclusions.lock().unwrap().push(excluded.to_vec());
        self.replies.lock().unwrap().pop_front().flatten()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Never answers within any reasonable timeout.
struct SlowProposer;

#[async_trait]
impl MoveProposer for SlowProposer {
    async fn propose(&self, _position: &Position, _excluded: &[String]) -> Option<String> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Some("e7e5".to_string())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

fn test_config() -> SessionConfig {
    SessionConfig {
        player_name: "tester".to_string(),
        ai_turn_delay_ms: 0,
        ..SessionConfig::default()
    }
}

fn session_with(proposer: Arc<ScriptedProposer>) -> (GameSession, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let session = GameSession::new(test_config(), proposer, store.clone());
    (session, store)
}

fn drain(rx: &mut EventReceiver) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_human_legal_move_hands_turn_to_ai() {
    let (mut session, _) = session_with(ScriptedProposer::new(&[]));

    let played = session.apply_human_move("e2", "e4").unwrap();

    assert_eq!(played.from, Square::E2);
    assert_eq!(played.to, Square::E4);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().entries()[0].side, Side::Human);
    assert_eq!(session.to_move(), Side::Ai);
    assert_eq!(session.outcome(), MatchOutcome::Live);
}

#[tokio::test]
async fn test_human_illegal_move_changes_nothing() {
    let (mut session, _) = session_with(ScriptedProposer::new(&[]));
    let mut rx = session.subscribe();
    let before = session.position();

    let err = session.apply_human_move("e2", "e5").unwrap_err();

    assert_eq!(
        err,
        GameError::IllegalMove {
            from: "e2".into(),
            to: "e5".into()
        }
    );
    assert_eq!(session.position(), before);
    assert!(session.history().is_empty());
    assert_eq!(
        drain(&mut rx),
        vec![GameEvent::Alert("Invalid move e2e5. Please try again.".into())]
    );
}

#[tokio::test]
async fn test_human_move_with_bad_squares_is_illegal() {
    let (mut session, _) = session_with(ScriptedProposer::new(&[]));

    assert!(matches!(
        session.apply_human_move("z9", "e4"),
        Err(GameError::IllegalMove { .. })
    ));
    // black piece on the human's turn
    assert!(matches!(
        session.apply_human_move("e7", "e5"),
        Err(GameError::IllegalMove { .. })
    ));
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_turn_order_enforced() {
    let proposer = ScriptedProposer::moves(&["e7e5"]);
    let (mut session, _) = session_with(proposer.clone());

    assert_eq!(
        session.run_ai_turn().await.unwrap_err(),
        GameError::OutOfTurn {
            expected: Side::Human
        }
    );
    assert_eq!(proposer.calls(), 0);

    session.apply_human_move("e2", "e4").unwrap();
    assert_eq!(
        session.apply_human_move("d2", "d4").unwrap_err(),
        GameError::OutOfTurn { expected: Side::Ai }
    );
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_ai_recovers_after_malformed_candidates() {
    let proposer = ScriptedProposer::moves(&["z9z9", "z9z9", "z9z9", "g8f6"]);
    let (mut session, _) = session_with(proposer.clone());
    session.apply_human_move("e2", "e4").unwrap();

    let report = session.run_ai_turn().await.unwrap();

    assert_eq!(report.attempts, 3);
    assert_eq!(report.played.from, Square::G8);
    assert_eq!(report.played.to, Square::F6);
    // malformed text never reaches the board, so nothing is excluded
    assert!(report.rejected.is_empty());
    assert_eq!(proposer.calls(), 4);
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.to_move(), Side::Human);
}

#[tokio::test]
async fn test_ai_exhausts_budget_without_side_effects() {
    let proposer = ScriptedProposer::new(&[]);
    let (mut session, store) = session_with(proposer.clone());
    session.apply_human_move("e2", "e4").unwrap();
    let before = session.position();

    let err = session.run_ai_turn().await.unwrap_err();

    assert_eq!(
        err,
        GameError::AiExhausted {
            ai_name: "DeepSeek".into(),
            attempts: 50
        }
    );
    assert_eq!(
        err.to_string(),
        "DeepSeek failed to make a move after 50 attempts. Please restart the game."
    );
    assert_eq!(proposer.calls(), 50);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.position(), before);
    assert_eq!(session.outcome(), MatchOutcome::Live);
    assert!(!session.is_ai_thinking());

    session.settle().await;
    assert_eq!(store.snapshot().await.unwrap().total_moves, 1);
}

#[tokio::test]
async fn test_illegal_candidates_are_excluded_and_reset_each_turn() {
    let proposer = ScriptedProposer::moves(&["e7e4", "e7e5", "d7d5"]);
    let (mut session, _) = session_with(proposer.clone());

    session.apply_human_move("e2", "e4").unwrap();
    let first = session.run_ai_turn().await.unwrap();
    assert_eq!(first.attempts, 1);
    assert_eq!(first.rejected, vec!["e7e4"]);

    session.apply_human_move("g1", "f3").unwrap();
    let second = session.run_ai_turn().await.unwrap();
    assert_eq!(second.attempts, 0);
    assert!(second.rejected.is_empty());

    let no_exclusions: Vec<String> = Vec::new();
    assert_eq!(
        proposer.exclusions(),
        vec![no_exclusions.clone(), vec!["e7e4".to_string()], no_exclusions]
    );
}

#[tokio::test]
async fn test_repeated_candidate_counts_without_board_check() {
    let proposer = ScriptedProposer::moves(&["e7e4", "e7e4", "d7d5"]);
    let (mut session, _) = session_with(proposer.clone());
    session.apply_human_move("e2", "e4").unwrap();

    let report = session.run_ai_turn().await.unwrap();

    assert_eq!(report.attempts, 2);
    assert_eq!(report.rejected, vec!["e7e4"]);
    assert_eq!(report.played.to, Square::D5);
    assert_eq!(proposer.exclusions()[2], vec!["e7e4".to_string()]);
}

#[tokio::test]
async fn test_proposer_timeout_counts_as_failure() {
    let config = SessionConfig {
        max_ai_attempts: 3,
        proposal_timeout_ms: 20,
        ..test_config()
    };
    let store = Arc::new(MemoryStore::new());
    let mut session = GameSession::new(config, Arc::new(SlowProposer), store);
    session.apply_human_move("e2", "e4").unwrap();

    let err = session.run_ai_turn().await.unwrap_err();

    assert!(matches!(err, GameError::AiExhausted { attempts: 3, .. }));
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_ai_checkmate_records_ai_win() {
    // fool's mate
    let proposer = ScriptedProposer::moves(&["e7e5", "d8h4"]);
    let (mut session, store) = session_with(proposer);
    let mut rx = session.subscribe();

    session.play_human_turn("f2", "f3").await.unwrap();
    let turn = session.play_human_turn("g2", "g4").await.unwrap();

    assert_eq!(turn.ai_move().map(|r| r.played.to), Some(Square::H4));
    assert_eq!(session.outcome(), MatchOutcome::Checkmate { winner: Side::Ai });
    assert!(drain(&mut rx).contains(&GameEvent::GameOver {
        outcome: MatchOutcome::Checkmate { winner: Side::Ai },
        message: "Checkmate! AI wins!".into(),
    }));

    session.settle().await;
    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.total_moves, 4);
    assert_eq!(
        snapshot.stats,
        MatchStats {
            human_wins: 0,
            ai_wins: 1,
            draws: 0
        }
    );
    assert_eq!(snapshot.leaderboard.len(), 1);
    assert_eq!(snapshot.leaderboard[0].name, "DeepSeek");
    assert_eq!(snapshot.leaderboard[0].moves, 4);
}

#[tokio::test]
async fn test_human_checkmate_records_human_win() {
    // scholar's mate
    let proposer = ScriptedProposer::moves(&["e7e5", "b8c6", "g8f6", "a7a6"]);
    let (mut session, store) = session_with(proposer.clone());

    session.play_human_turn("e2", "e4").await.unwrap();
    session.play_human_turn("f1", "c4").await.unwrap();
    session.play_human_turn("d1", "h5").await.unwrap();
    let turn = session.play_human_turn("h5", "f7").await.unwrap();

    assert!(turn.ai.is_none());
    assert_eq!(
        session.outcome(),
        MatchOutcome::Checkmate {
            winner: Side::Human
        }
    );
    assert_eq!(session.history().len(), 7);
    assert_eq!(proposer.calls(), 3);

    session.settle().await;
    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.stats.human_wins, 1);
    assert_eq!(snapshot.leaderboard[0].name, "tester");
    assert_eq!(snapshot.leaderboard[0].moves, 7);
}

#[tokio::test]
async fn test_no_moves_after_game_over() {
    let proposer = ScriptedProposer::moves(&["e7e5", "d8h4", "a7a6"]);
    let (mut session, store) = session_with(proposer.clone());
    session.play_human_turn("f2", "f3").await.unwrap();
    session.play_human_turn("g2", "g4").await.unwrap();
    let final_position = session.position();

    let err = session.apply_human_move("a2", "a3").unwrap_err();
    assert!(matches!(err, GameError::GameAlreadyOver { .. }));
    let err = session.run_ai_turn().await.unwrap_err();
    assert!(matches!(err, GameError::GameAlreadyOver { .. }));

    // re-evaluating never records a second result
    assert_eq!(
        session.evaluate_terminal(),
        MatchOutcome::Checkmate { winner: Side::Ai }
    );
    assert_eq!(session.history().len(), 4);
    assert_eq!(session.position(), final_position);
    assert_eq!(proposer.calls(), 2);

    session.settle().await;
    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.stats.total_games(), 1);
    assert_eq!(snapshot.leaderboard.len(), 1);
}

#[tokio::test]
async fn test_stalemate_records_draw() {
    let store = Arc::new(MemoryStore::new());
    let proposer = ScriptedProposer::new(&[]);
    let mut session = GameSession::from_fen(
        test_config(),
        proposer.clone(),
        store.clone(),
        "k7/2K5/8/1Q6/8/8/8/8 w - - 0 1",
    )
    .unwrap();

    let turn = session.play_human_turn("b5", "b6").await.unwrap();

    assert!(turn.ai.is_none());
    assert_eq!(session.outcome(), MatchOutcome::Stalemate);
    assert_eq!(proposer.calls(), 0);

    session.settle().await;
    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.stats.draws, 1);
    assert!(snapshot.leaderboard.is_empty());
}

#[tokio::test]
async fn test_insufficient_material_draw() {
    let store = Arc::new(MemoryStore::new());
    let mut session = GameSession::from_fen(
        test_config(),
        ScriptedProposer::new(&[]),
        store,
        "k7/8/8/8/8/8/1r6/K7 w - - 0 1",
    )
    .unwrap();

    session.apply_human_move("a1", "b2").unwrap();

    assert_eq!(session.outcome(), MatchOutcome::DrawInsufficientMaterial);
}

#[tokio::test]
async fn test_setup_rejects_black_to_move_and_finished_positions() {
    let store = Arc::new(MemoryStore::new());
    let black_to_move = GameSession::from_fen(
        test_config(),
        ScriptedProposer::new(&[]),
        store.clone(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
    );
    assert!(matches!(black_to_move, Err(SetupError::BlackToMove)));

    let stalemated = GameSession::from_fen(
        test_config(),
        ScriptedProposer::new(&[]),
        store.clone(),
        "8/8/8/8/8/1q6/2k5/K7 w - - 0 1",
    );
    assert!(matches!(stalemated, Err(SetupError::AlreadyOver)));

    let garbage =
        GameSession::from_fen(test_config(), ScriptedProposer::new(&[]), store, "not a fen");
    assert!(matches!(garbage, Err(SetupError::Board(_))));
}

#[tokio::test]
async fn test_persistence_failure_does_not_affect_play() {
    let proposer = ScriptedProposer::moves(&["e7e5", "d8h4"]);
    let store = Arc::new(MemoryStore::unavailable());
    let mut session = GameSession::new(test_config(), proposer, store);

    session.play_human_turn("f2", "f3").await.unwrap();
    session.play_human_turn("g2", "g4").await.unwrap();
    session.settle().await;

    assert_eq!(session.history().len(), 4);
    assert_eq!(session.outcome(), MatchOutcome::Checkmate { winner: Side::Ai });
}

#[tokio::test]
async fn test_ai_turn_events() {
    let proposer = ScriptedProposer::moves(&["e7e5"]);
    let (mut session, _) = session_with(proposer);
    session.apply_human_move("e2", "e4").unwrap();
    let mut rx = session.subscribe();

    session.run_ai_turn().await.unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], GameEvent::AiThinking(true));
    assert_eq!(events[1], GameEvent::AiThinking(false));
    match &events[2] {
        GameEvent::PositionChanged { to_move, last, .. } => {
            assert_eq!(*to_move, Side::Human);
            assert_eq!(last.map(|e| e.to_string()), Some("A-e7e5".to_string()));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_restart_after_exhaustion() {
    let proposer = ScriptedProposer::new(&[]);
    let (mut session, _) = session_with(proposer);
    session.apply_human_move("e2", "e4").unwrap();
    assert!(session.run_ai_turn().await.is_err());

    session.restart();

    assert!(session.history().is_empty());
    assert_eq!(session.to_move(), Side::Human);
    assert_eq!(session.position(), Board::startpos().position());
    session.apply_human_move("d2", "d4").unwrap();
}

#[tokio::test]
async fn test_exhausted_session_refuses_moves_until_restart() {
    let proposer = ScriptedProposer::new(&[]);
    let (mut session, _) = session_with(proposer.clone());
    session.apply_human_move("e2", "e4").unwrap();
    let mut rx = session.subscribe();

    assert!(matches!(
        session.run_ai_turn().await,
        Err(GameError::AiExhausted { attempts: 50, .. })
    ));
    assert!(session.needs_restart());
    drain(&mut rx);

    let err = session.run_ai_turn().await.unwrap_err();
    assert_eq!(
        err,
        GameError::RestartRequired {
            ai_name: "DeepSeek".into()
        }
    );
    assert_eq!(proposer.calls(), 50);
    assert_eq!(
        drain(&mut rx),
        vec![GameEvent::Alert(
            "DeepSeek could not move in this game. Restart the game to keep playing.".into()
        )]
    );

    assert!(matches!(
        session.apply_human_move("d2", "d4"),
        Err(GameError::RestartRequired { .. })
    ));
    assert_eq!(session.history().len(), 1);

    session.restart();
    assert!(!session.needs_restart());
    session.apply_human_move("d2", "d4").unwrap();
}

#[tokio::test]
async fn test_human_move_survives_ai_failure() {
    let (mut session, _) = session_with(ScriptedProposer::new(&[]));

    let turn = session.play_human_turn("e2", "e4").await.unwrap();

    assert_eq!(turn.human.to, Square::E4);
    assert!(turn.ai_move().is_none());
    assert!(matches!(
        turn.ai_error(),
        Some(GameError::AiExhausted { attempts: 50, .. })
    ));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().entries()[0].played, turn.human);
}
