//! Tests for the local game state machine and deferred computer replies.

use neon_ttt::{
    Board, Cell, DecisionEngine, Difficulty, GameMode, GameOptions, GameStateMachine, GameStatus,
    Mark, MoveResult, Outcome, RoomSnapshot, SharedGame, schedule_computer_reply,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn seeded_machine() -> GameStateMachine {
    GameStateMachine::with_engine(DecisionEngine::seeded(42))
}

fn marks_on(board: &Board) -> usize {
    9 - board.empty_cells().len()
}

#[test]
fn test_idle_machine_ignores_moves() {
    let mut game = seeded_machine();
    assert_eq!(game.status(), GameStatus::Idle);
    assert_eq!(game.apply_move(4), MoveResult::NoOp);
    assert!(game.snapshot().board().is_empty(4));
}

#[test]
fn test_computer_opens_when_local_plays_o() {
    let mut game = seeded_machine();
    let snapshot = game.init(
        GameMode::VsComputer,
        GameOptions::default().with_local_mark(Mark::O),
    );

    assert_eq!(marks_on(snapshot.board()), 1);
    assert_eq!(*snapshot.active_mark(), Mark::O);
    assert_eq!(*snapshot.computer_mark(), Mark::X);
    assert!(*snapshot.is_local_turn());
    assert_eq!(*snapshot.status(), GameStatus::InProgress);
}

#[test]
fn test_local_move_hands_turn_to_computer() {
    let mut game = seeded_machine();
    game.init(GameMode::VsComputer, GameOptions::default());

    let MoveResult::OpponentDue(token) = game.apply_move(4) else {
        panic!("computer should be due");
    };
    assert_eq!(token.generation(), *game.snapshot().generation());
    assert!(!*game.snapshot().is_local_turn());

    // The computer is thinking; the player may not move again.
    assert_eq!(game.apply_move(0), MoveResult::NoOp);

    assert_eq!(game.play_computer_reply(token), MoveResult::Placed);
    let snapshot = game.snapshot();
    assert_eq!(marks_on(snapshot.board()), 2);
    assert!(*snapshot.is_local_turn());
    assert_eq!(*snapshot.active_mark(), Mark::X);
}

#[test]
fn test_occupied_cell_is_noop() {
    let mut game = seeded_machine();
    game.init(
        GameMode::VsComputer,
        GameOptions::default().with_local_mark(Mark::O),
    );
    let taken = (0..9)
        .find(|&i| !game.snapshot().board().is_empty(i))
        .expect("computer opened");

    let before = game.snapshot();
    assert_eq!(game.apply_move(taken), MoveResult::NoOp);
    assert_eq!(game.snapshot(), before);
}

#[test]
fn test_reply_token_goes_stale_on_new_game() {
    let mut game = seeded_machine();
    game.init(GameMode::VsComputer, GameOptions::default());
    let MoveResult::OpponentDue(token) = game.apply_move(0) else {
        panic!("computer should be due");
    };

    game.init(GameMode::VsComputer, GameOptions::default());
    assert_eq!(game.play_computer_reply(token), MoveResult::NoOp);
    assert_eq!(marks_on(game.snapshot().board()), 0);
}

#[test]
fn test_reply_token_cannot_be_used_twice() {
    let mut game = seeded_machine();
    game.init(GameMode::VsComputer, GameOptions::default());
    let MoveResult::OpponentDue(token) = game.apply_move(4) else {
        panic!("computer should be due");
    };

    assert_eq!(game.play_computer_reply(token), MoveResult::Placed);
    assert_eq!(game.play_computer_reply(token), MoveResult::NoOp);
    assert_eq!(marks_on(game.snapshot().board()), 2);
}

#[test]
fn test_shared_room_win_ends_game() {
    let mut game = seeded_machine();
    game.init(GameMode::SharedRoom, GameOptions::default().with_room("abc123"));

    for index in [0, 3, 1, 4] {
        assert_eq!(game.apply_move(index), MoveResult::Placed);
    }
    assert_eq!(game.apply_move(2), MoveResult::Ended(Outcome::Winner(Mark::X)));

    let snapshot = game.snapshot();
    assert_eq!(*snapshot.status(), GameStatus::Terminal);
    assert_eq!(*snapshot.winning_triple(), Some([0, 1, 2]));
    assert_eq!(snapshot.room_id().as_deref(), Some("abc123"));
    assert_eq!(game.apply_move(8), MoveResult::NoOp);
}

#[test]
fn test_reconcile_follows_remote_turn() {
    let mut game = seeded_machine();
    game.init(
        GameMode::SharedRoom,
        GameOptions::default().with_local_mark(Mark::O),
    );
    assert!(!*game.snapshot().is_local_turn());

    let mut board = Board::new();
    board.place(4, Mark::X);
    let snapshot = game.reconcile(&RoomSnapshot {
        board,
        active_mark: Mark::O,
        is_active: true,
        outcome: None,
        winning_triple: None,
    });

    assert!(*snapshot.is_local_turn());
    assert_eq!(snapshot.board().get(4), Some(Cell::Marked(Mark::X)));
}

#[test]
fn test_reconcile_accepts_finished_remote_game() {
    let mut game = seeded_machine();
    game.init(GameMode::SharedRoom, GameOptions::default());

    let board = Board::from_cells([
        Cell::Marked(Mark::O),
        Cell::Marked(Mark::O),
        Cell::Marked(Mark::O),
        Cell::Marked(Mark::X),
        Cell::Marked(Mark::X),
        Cell::Empty,
        Cell::Marked(Mark::X),
        Cell::Empty,
        Cell::Empty,
    ]);
    let snapshot = game.reconcile(&RoomSnapshot {
        board,
        active_mark: Mark::O,
        is_active: false,
        outcome: Some(Outcome::Winner(Mark::O)),
        winning_triple: Some([0, 1, 2]),
    });

    assert_eq!(*snapshot.status(), GameStatus::Terminal);
    assert_eq!(*snapshot.outcome(), Some(Outcome::Winner(Mark::O)));
}

#[test]
fn test_observer_receives_every_change() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut game = seeded_machine();
    game.set_observer(tx);

    game.init(
        GameMode::VsComputer,
        GameOptions::default().with_difficulty(Difficulty::Hard),
    );
    game.apply_move(4);

    let first = rx.try_recv().expect("init published");
    assert_eq!(*first.generation(), 1);
    assert_eq!(*first.difficulty(), Difficulty::Hard);
    let second = rx.try_recv().expect("move published");
    assert_eq!(second.board().get(4), Some(Cell::Marked(Mark::X)));
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_reply_waits_for_delay() {
    let game: SharedGame = Arc::new(Mutex::new(seeded_machine()));
    let token = {
        let mut game = game.lock().expect("lock");
        game.init(GameMode::VsComputer, GameOptions::default());
        match game.apply_move(4) {
            MoveResult::OpponentDue(token) => token,
            other => panic!("unexpected {:?}", other),
        }
    };

    let handle = schedule_computer_reply(Arc::clone(&game), token, Duration::from_millis(600));
    tokio::time::sleep(Duration::from_millis(599)).await;
    assert_eq!(marks_on(game.lock().expect("lock").snapshot().board()), 1);

    assert_eq!(handle.await.expect("reply task"), MoveResult::Placed);
    assert_eq!(marks_on(game.lock().expect("lock").snapshot().board()), 2);
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_reply_discarded_after_reset() {
    let game: SharedGame = Arc::new(Mutex::new(seeded_machine()));
    let token = {
        let mut game = game.lock().expect("lock");
        game.init(GameMode::VsComputer, GameOptions::default());
        match game.apply_move(0) {
            MoveResult::OpponentDue(token) => token,
            other => panic!("unexpected {:?}", other),
        }
    };

    let handle = schedule_computer_reply(Arc::clone(&game), token, Duration::from_millis(600));
    game.lock()
        .expect("lock")
        .init(GameMode::VsComputer, GameOptions::default());

    assert_eq!(handle.await.expect("reply task"), MoveResult::NoOp);
    assert_eq!(marks_on(game.lock().expect("lock").snapshot().board()), 0);
}
