use codequest::interpreter::ParseError;
use codequest::runtime::clock::ManualClock;
use codequest::runtime::host::Position;
use codequest::world::TileMap;
use codequest::{Direction, PrimitiveAction, Session, SessionConfig, TickOutcome, World};

const FRAME_MS: u64 = 16;

fn open_session() -> (Session<World>, ManualClock) {
    let config = SessionConfig::default();
    let clock = ManualClock::new(1_000);
    let world = World::new(TileMap::open(8, 8, 64), Position::new(64, 64), &config);
    let session =
        Session::with_clock(config, world, Box::new(clock.clone())).expect("valid config");
    (session, clock)
}

fn run_until_idle(session: &mut Session<World>, clock: &ManualClock) -> usize {
    let mut ticks = 0;
    while session.is_busy() {
        session.tick();
        clock.advance(FRAME_MS);
        ticks += 1;
        assert!(ticks < 10_000, "session never went idle");
    }
    ticks
}

fn health(session: &Session<World>) -> u32 {
    session.world().health().current()
}

#[test]
fn for_loop_stages_one_action_per_iteration() {
    let (mut session, clock) = open_session();
    let report = session.submit("for i in range(3): move right");
    assert!(report.success);
    assert_eq!(report.staged, 3);
    assert_eq!(session.queue_len(), 3);

    run_until_idle(&mut session, &clock);
    assert_eq!(session.world().agent().position, Position::new(256, 64));
    assert_eq!(session.world().agent().facing, Direction::Right);
}

#[test]
fn loop_variable_is_visible_to_nested_condition() {
    let (mut session, _clock) = open_session();
    let report = session.submit("for i in range(4): if i >= 2: move down");
    assert!(report.success);
    assert_eq!(report.staged, 2);
}

#[test]
fn conditions_read_live_position() {
    let (mut session, clock) = open_session();
    assert_eq!(session.submit("if x == 64: move down").staged, 1);
    run_until_idle(&mut session, &clock);
    assert_eq!(session.submit("if y == 64: move down").staged, 0);
    assert_eq!(session.submit("if y == 128: move down").staged, 1);
}

#[test]
fn conditions_read_live_health() {
    let (mut session, clock) = open_session();
    assert_eq!(session.submit("if health < 5: print low").staged, 0);

    assert!(!session.parse("bogus"));
    assert_eq!(health(&session), 4);

    assert_eq!(session.submit("if health < 5: print low").staged, 1);
    run_until_idle(&mut session, &clock);
    assert_eq!(session.world().messages().current(), Some("low"));
}

#[test]
fn unknown_identifier_reads_as_zero() {
    let (mut session, _clock) = open_session();
    assert_eq!(session.submit("if gold == 0: turn up").staged, 1);
    assert_eq!(session.submit("if gold > 0: turn up").staged, 0);
}

#[test]
fn walk_matches_repeated_moves() {
    let (mut walked, walk_clock) = open_session();
    let (mut moved, move_clock) = open_session();

    walked.submit("walk 3 down");
    moved.submit("move down; move down; move down");
    assert_eq!(
        walked.scheduler().pending().collect::<Vec<_>>(),
        moved.scheduler().pending().collect::<Vec<_>>()
    );

    run_until_idle(&mut walked, &walk_clock);
    run_until_idle(&mut moved, &move_clock);
    assert_eq!(walked.world().agent().position, moved.world().agent().position);
    assert_eq!(walked.world().agent().position, Position::new(64, 256));
}

#[test]
fn one_bad_statement_costs_exactly_one_heart() {
    let (mut session, _clock) = open_session();
    let report = session.submit("move up; bogus; move down");
    assert!(!report.success);
    assert!(report.damaged);
    assert_eq!(
        report.errors,
        vec![ParseError::UnrecognizedStatement("bogus".into())]
    );
    assert_eq!(report.staged, 2);
    assert_eq!(health(&session), 4);

    let report = session.submit("jump; fly; swim");
    assert_eq!(report.errors.len(), 3);
    assert_eq!(health(&session), 3);
}

#[test]
fn empty_and_clear_lines_are_free() {
    let (mut session, _clock) = open_session();
    assert!(session.parse(""));
    assert!(session.parse("   "));
    assert!(session.parse("clear"));
    assert!(session.parse("stop"));
    assert_eq!(health(&session), 5);
}

#[test]
fn clear_is_idempotent() {
    let (mut session, _clock) = open_session();
    session.submit("walk 4 right; wait 500; print done");
    assert_eq!(session.queue_len(), 6);

    assert!(session.parse("clear"));
    assert_eq!(session.queue_len(), 0);
    assert!(!session.is_busy());

    session.clear();
    assert!(session.parse("clear"));
    assert_eq!(session.queue_len(), 0);
    assert!(!session.is_busy());
    assert_eq!(health(&session), 5);
}

#[test]
fn clear_keeps_partial_move() {
    let (mut session, clock) = open_session();
    session.submit("move right; move right");
    for _ in 0..4 {
        session.tick();
        clock.advance(FRAME_MS);
    }
    // One tick to start the move, three steps of 3px.
    assert_eq!(session.world().agent().position, Position::new(73, 64));

    session.clear();
    assert!(!session.is_busy());
    assert_eq!(session.tick(), TickOutcome::Idle);
    assert_eq!(session.world().agent().position, Position::new(73, 64));
}

#[test]
fn delay_gate_spaces_out_actions() {
    let (mut session, clock) = open_session();
    session.submit("turn left; turn right");

    assert_eq!(
        session.tick(),
        TickOutcome::Executed(PrimitiveAction::Turn(Direction::Left))
    );
    assert_eq!(session.tick(), TickOutcome::Gated);
    clock.advance(299);
    assert_eq!(session.tick(), TickOutcome::Gated);
    clock.advance(1);
    assert_eq!(
        session.tick(),
        TickOutcome::Executed(PrimitiveAction::Turn(Direction::Right))
    );
    assert_eq!(session.world().agent().facing, Direction::Right);
}

#[test]
fn wait_holds_the_queue() {
    let (mut session, clock) = open_session();
    session.submit("wait 200; print hi");

    assert_eq!(
        session.tick(),
        TickOutcome::Executed(PrimitiveAction::Wait(200))
    );
    clock.advance(499);
    assert_eq!(session.tick(), TickOutcome::Gated);
    clock.advance(1);
    assert_eq!(
        session.tick(),
        TickOutcome::Executed(PrimitiveAction::Print("hi".into()))
    );
}

#[test]
fn bare_wait_uses_configured_default() {
    let (mut session, _clock) = open_session();
    session.submit("wait");
    assert_eq!(
        session.scheduler().pending().collect::<Vec<_>>(),
        vec![PrimitiveAction::Wait(1000)]
    );
}

#[test]
fn command_speed_level_sets_delay() {
    let (mut session, clock) = open_session();
    assert_eq!(session.set_command_speed_level(10), 50);
    assert_eq!(session.config().action_delay_ms, 50);

    session.submit("turn up; turn down");
    session.tick();
    clock.advance(50);
    assert_eq!(
        session.tick(),
        TickOutcome::Executed(PrimitiveAction::Turn(Direction::Down))
    );
}

#[test]
fn zero_move_speed_is_clamped() {
    let (mut session, _clock) = open_session();
    session.set_move_speed(0);
    assert_eq!(session.config().move_speed, 1);
    assert_eq!(session.scheduler().move_speed(), 1);
}

#[test]
fn running_out_of_health_ends_the_game() {
    let (mut session, _clock) = open_session();
    for _ in 0..5 {
        assert!(!session.parse("nonsense"));
    }
    assert!(session.world().is_game_over());
    assert_eq!(health(&session), 0);

    assert!(!session.parse("nonsense"));
    assert_eq!(health(&session), 0);

    let report = session.submit("if health > 0: move right");
    assert!(report.success);
    assert_eq!(report.staged, 0);
    assert_eq!(session.queue_len(), 0);
}

#[test]
fn bare_print_costs_a_heart() {
    let (mut session, _clock) = open_session();
    assert!(!session.parse("print"));
    assert_eq!(health(&session), 4);
    assert_eq!(session.queue_len(), 0);

    assert!(session.parse("print hi"));
    assert_eq!(health(&session), 4);
}

#[test]
fn repeat_counts_stop_at_the_configured_limit() {
    let (mut session, _clock) = open_session();
    let limit = session.config().max_repeat;
    assert_eq!(limit, 1000);

    let report = session.submit(&format!("walk {} up", limit));
    assert!(report.success);
    assert_eq!(report.staged, limit as usize);
    session.clear();

    let report = session.submit(&format!("walk {} up", limit + 1));
    assert!(!report.success);
    assert_eq!(
        report.errors,
        vec![ParseError::NumericParseError((limit + 1).to_string())]
    );
    assert_eq!(report.staged, 0);
    assert_eq!(health(&session), 4);

    let report = session.submit(&format!("for i in range({}): print hi", limit));
    assert!(report.success);
    assert_eq!(report.staged, limit as usize);
    session.clear();

    assert!(!session.parse(&format!("for i in range({}): print hi", limit + 1)));
    assert!(!session.parse("walk 4294967295 up"));
    assert!(!session.parse("for i in range(4000000000): print hi"));
    assert_eq!(session.queue_len(), 0);
    assert_eq!(health(&session), 1);
}

#[test]
fn repeat_limit_follows_config() {
    let config = SessionConfig {
        max_repeat: 3,
        ..SessionConfig::default()
    };
    let world = World::new(TileMap::open(8, 8, 64), Position::new(64, 64), &config);
    let mut session =
        Session::with_clock(config, world, Box::new(ManualClock::new(0))).expect("valid config");
    assert_eq!(session.submit("walk 3 down").staged, 3);
    assert!(!session.parse("walk 4 down"));
    assert!(!session.parse("for i in range(4): turn up"));
}
