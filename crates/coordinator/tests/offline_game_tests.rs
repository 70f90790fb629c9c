//! Whole games against the random proposer, persisted to a JSON file

use std::path::PathBuf;
use std::sync::Arc;

use coordinator::{GameSession, MatchOutcome, SessionConfig, Side};
use match_store::{JsonFileStore, StatsGateway};
use move_proposer::RandomProposer;

const MAX_PLIES: usize = 300;

fn temp_path() -> PathBuf {
    std::env::temp_dir().join(format!("coordinator_{}.json", uuid::Uuid::new_v4()))
}

async fn play_out(seed: u64) {
    let path = temp_path();
    let store = Arc::new(JsonFileStore::new(&path));
    let config = SessionConfig {
        player_name: "first-legal".to_string(),
        ai_turn_delay_ms: 0,
        ..SessionConfig::default()
    };
    let mut session = GameSession::new(config, Arc::new(RandomProposer::seeded(seed)), store.clone());

    while session.outcome().is_live() && session.history().len() < MAX_PLIES {
        let choice = session.board().legal_moves()[0];
        let turn = session
            .play_human_turn(&choice.from.to_string(), &choice.to.to_string())
            .await
            .expect("first legal move is accepted");
        if let Some(ai) = turn.ai {
            let ai = ai.expect("random proposer always finds a legal move");
            assert!(ai.rejected.is_empty());
        }
    }
    session.settle().await;

    for (ply, entry) in session.history().iter().enumerate() {
        let expected = if ply % 2 == 0 { Side::Human } else { Side::Ai };
        assert_eq!(entry.side, expected);
        assert_eq!(entry.played.mover, expected.color());
    }

    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.total_moves, session.history().len() as u64);
    match session.outcome() {
        MatchOutcome::Live => assert_eq!(snapshot.stats.total_games(), 0),
        MatchOutcome::Checkmate { winner } => {
            assert_eq!(snapshot.stats.total_games(), 1);
            assert_eq!(snapshot.leaderboard.len(), 1);
            assert_eq!(snapshot.leaderboard[0].moves as usize, session.history().len());
            let name = match winner {
                Side::Human => "first-legal",
                Side::Ai => "DeepSeek",
            };
            assert_eq!(snapshot.leaderboard[0].name, name);
        }
        _ => {
            assert_eq!(snapshot.stats.draws, 1);
            assert!(snapshot.leaderboard.is_empty());
        }
    }

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_random_games_keep_invariants() {
    for seed in [1, 7, 42] {
        play_out(seed).await;
    }
}

#[tokio::test]
async fn test_results_accumulate_across_sessions() {
    let path = temp_path();
    let store = Arc::new(JsonFileStore::new(&path));
    let config = SessionConfig {
        ai_turn_delay_ms: 0,
        ..SessionConfig::default()
    };

    for _ in 0..2 {
        let mut session = GameSession::from_fen(
            config.clone(),
            Arc::new(RandomProposer::seeded(3)),
            store.clone(),
            "k7/2K5/8/1Q6/8/8/8/8 w - - 0 1",
        )
        .unwrap();
        session.play_human_turn("b5", "b6").await.unwrap();
        assert_eq!(session.outcome(), MatchOutcome::Stalemate);
        session.settle().await;
    }

    let reopened = JsonFileStore::new(&path);
    let snapshot = reopened.snapshot().await.unwrap();
    assert_eq!(snapshot.total_moves, 2);
    assert_eq!(snapshot.stats.draws, 2);

    let _ = std::fs::remove_file(&path);
}
