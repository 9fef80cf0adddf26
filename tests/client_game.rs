mod common;

use common::*;
use online_chess::client::{
    ConnectionStatus, GameOverReport, MoveCommandError, NotableEvent, SquareHighlight,
    SquareHighlightItem,
};
use online_chess::coord::Coord;
use online_chess::drag::{DragError, DropOutcome, PromotionPreference};
use online_chess::event::{GameServerEvent, MoveRequest, SpecialMove};
use online_chess::force::Force;
use online_chess::game_state::{GameState, GameStatus, SubjectiveGameResult};
use online_chess::grid::{BoardSnapshot, Grid};
use online_chess::move_graph::MoveGraph;
use online_chess::piece::{PieceKind, PieceOnBoard};
use online_chess::test_util::*;
use pretty_assertions::assert_eq;
use Force::{Black, White};


fn snapshot(pieces: &[(&str, Force, PieceKind)]) -> BoardSnapshot {
    let mut grid = Grid::new();
    for &(square, force, kind) in pieces {
        grid[coord(square)] = Some(PieceOnBoard::new(kind, force));
    }
    grid.to_snapshot()
}

fn highlighted(highlights: &[SquareHighlight], item: SquareHighlightItem) -> Vec<Coord> {
    let mut coords: Vec<_> =
        highlights.iter().filter(|h| h.item == item).map(|h| h.coord).collect();
    coords.sort();
    coords
}

fn request(notation: &str) -> MoveRequest {
    MoveRequest {
        start_pos: coord(&notation[..2]),
        end_pos: coord(&notation[2..4]),
        promote_to: None,
    }
}


#[test]
fn game_start() {
    let (mut white, _rx_white) = new_client(Some(White));
    let (mut black, _rx_black) = new_client(Some(Black));
    let (mut observer, _rx_observer) = new_client(None);
    for client in [&mut white, &mut black, &mut observer] {
        assert!(client.game().is_none());
        client.process_server_event(initial_event()).unwrap();
        assert_eq!(drain_notable_events(client), vec![NotableEvent::GameStarted]);
        assert!(client.game().unwrap().grid()[Coord::E1].is(piece!(White King)));
    }
    assert!(white.is_my_turn());
    assert!(white.can_drag(Coord::E2));
    assert!(white.can_drag(Coord::G1));
    assert!(!white.can_drag(Coord::A1)); // no moves
    assert!(!white.can_drag(Coord::E4)); // empty
    assert!(!black.is_my_turn());
    assert!(!black.can_drag(Coord::E7));
    assert!(!observer.is_my_turn());
    assert!(!observer.can_drag(Coord::E2));
    assert_eq!(observer.start_drag_piece(Coord::E2), Err(DragError::NotAPlayer));
}

#[test]
fn starting_position_assumed_without_snapshot() {
    let (mut client, _rx) = new_client(Some(White));
    client
        .process_server_event(GameServerEvent {
            move_graph: Some(opening_move_graph()),
            game_state: Some(state(White)),
            ..GameServerEvent::default()
        })
        .unwrap();
    assert_eq!(drain_notable_events(&mut client), vec![NotableEvent::GameStarted]);
    assert_eq!(client.game().unwrap().grid(), &Grid::starting_position());
    assert!(client.can_drag(Coord::B1));
}

#[test]
fn drag_and_confirm_move() {
    let (mut client, rx) = new_client(Some(White));
    client.process_server_event(initial_event()).unwrap();
    drain_notable_events(&mut client);

    client.start_drag_piece(Coord::E2).unwrap();
    let highlights = client.square_highlights();
    assert_eq!(highlighted(&highlights, SquareHighlightItem::DragStart), vec![Coord::E2]);
    assert_eq!(highlighted(&highlights, SquareHighlightItem::LegalDestination), vec![
        Coord::E3,
        Coord::E4
    ]);

    let DropOutcome::Move(request) = client.drag_piece_drop(Coord::E4, PromotionPreference::Queen)
    else {
        panic!("expected a move");
    };
    client.make_move(request).unwrap();
    let sent = drain_outgoing_events(&rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].make_move, request);
    assert!(client.square_highlights().is_empty());

    // Dragging is disabled until the server confirms the move.
    assert!(client.game().unwrap().is_awaiting_confirmation());
    assert!(!client.can_drag(Coord::G1));
    assert_eq!(client.start_drag_piece(Coord::G1), Err(DragError::MoveAwaitingConfirmation));
    assert_eq!(
        client.make_move(request),
        Err(MoveCommandError::Drag(DragError::MoveAwaitingConfirmation))
    );

    client
        .process_server_event(move_event(
            "e2e4",
            None,
            move_graph("e7e5 e7e6 g8f6"),
            state(Black),
        ))
        .unwrap();
    assert_eq!(drain_notable_events(&mut client), vec![NotableEvent::MyMoveConfirmed {
        capture: false
    }]);
    let grid = client.game().unwrap().grid();
    assert!(grid[Coord::E4].is(piece!(White Pawn)));
    assert_eq!(grid[Coord::E2], None);
    assert!(!client.is_my_turn());
    assert!(!client.game().unwrap().is_awaiting_confirmation());

    let highlights = client.square_highlights();
    assert_eq!(highlighted(&highlights, SquareHighlightItem::LatestMoveFrom), vec![Coord::E2]);
    assert_eq!(highlighted(&highlights, SquareHighlightItem::LatestMoveTo), vec![Coord::E4]);

    client
        .process_server_event(move_event("e7e5", None, opening_move_graph(), state(White)))
        .unwrap();
    assert_eq!(drain_notable_events(&mut client), vec![NotableEvent::OpponentMoveMade {
        capture: false
    }]);
    assert!(client.is_my_turn());
}

#[test]
fn illegal_and_cancelled_drops() {
    let (mut client, rx) = new_client(Some(White));
    client.process_server_event(initial_event()).unwrap();

    assert_eq!(
        client.make_move(request("e2e5")),
        Err(MoveCommandError::IllegalMove(request("e2e5")))
    );

    client.start_drag_piece(Coord::E2).unwrap();
    assert_eq!(client.drag_piece_drop(Coord::E5, PromotionPreference::Queen), DropOutcome::Illegal);
    assert!(client.game().unwrap().drag().is_none());

    client.start_drag_piece(Coord::E2).unwrap();
    assert_eq!(
        client.drag_piece_drop(Coord::E2, PromotionPreference::Queen),
        DropOutcome::Cancelled
    );

    client.start_drag_piece(Coord::G1).unwrap();
    client.abort_drag_piece();
    assert!(client.square_highlights().is_empty());
    assert_eq!(client.drag_piece_drop(Coord::F3, PromotionPreference::Queen), DropOutcome::Defunct);

    assert_eq!(client.start_drag_piece(Coord::E7), Err(DragError::DontControlPiece));
    assert_eq!(client.start_drag_piece(Coord::A1), Err(DragError::NoLegalMoves));
    assert!(drain_outgoing_events(&rx).is_empty());
}

#[test]
fn drag_revoked_by_server_update() {
    let (mut client, _rx) = new_client(Some(White));
    client.process_server_event(initial_event()).unwrap();
    client.start_drag_piece(Coord::E2).unwrap();
    client
        .process_server_event(GameServerEvent {
            game_state: Some(state(Black)),
            ..GameServerEvent::default()
        })
        .unwrap();
    assert!(client.game().unwrap().drag().unwrap().is_defunct());
    assert!(highlighted(&client.square_highlights(), SquareHighlightItem::DragStart).is_empty());
    assert_eq!(client.drag_piece_drop(Coord::E4, PromotionPreference::Queen), DropOutcome::Defunct);
}

#[test]
fn castling() {
    let (mut client, _rx) = new_client(Some(Black));
    client
        .process_server_event(snapshot_event(
            snapshot(&[
                ("e1", White, PieceKind::King),
                ("h1", White, PieceKind::Rook),
                ("e8", Black, PieceKind::King),
            ]),
            move_graph("e1g1 e1f1 h1h8"),
            White,
        ))
        .unwrap();
    client
        .process_server_event(move_event(
            "e1g1",
            Some(SpecialMove::Castling { rook_start: Coord::H1, rook_end: Coord::F1 }),
            move_graph("e8d8 e8e7"),
            state(Black),
        ))
        .unwrap();
    let grid = client.game().unwrap().grid();
    assert!(grid[Coord::G1].is(piece!(White King)));
    assert!(grid[Coord::F1].is(piece!(White Rook)));
    assert_eq!(grid[Coord::E1], None);
    assert_eq!(grid[Coord::H1], None);

    let highlights = client.square_highlights();
    assert_eq!(highlighted(&highlights, SquareHighlightItem::LatestMoveFrom), vec![
        Coord::E1,
        Coord::H1
    ]);
    assert_eq!(highlighted(&highlights, SquareHighlightItem::LatestMoveTo), vec![
        Coord::F1,
        Coord::G1
    ]);
    assert!(client.can_drag(Coord::E8));
}

#[test]
fn en_passant() {
    let (mut client, _rx) = new_client(Some(Black));
    client
        .process_server_event(snapshot_event(
            snapshot(&[
                ("e1", White, PieceKind::King),
                ("e5", White, PieceKind::Pawn),
                ("d5", Black, PieceKind::Pawn),
                ("e8", Black, PieceKind::King),
            ]),
            move_graph("e5d6 e5e6"),
            White,
        ))
        .unwrap();
    drain_notable_events(&mut client);
    client
        .process_server_event(move_event(
            "e5d6",
            Some(SpecialMove::EnPassant { captured: Coord::D5 }),
            move_graph("e8d8"),
            state(Black),
        ))
        .unwrap();
    assert_eq!(drain_notable_events(&mut client), vec![NotableEvent::OpponentMoveMade {
        capture: true
    }]);
    let grid = client.game().unwrap().grid();
    assert!(grid[Coord::D6].is(piece!(White Pawn)));
    assert_eq!(grid[Coord::D5], None);
    assert_eq!(
        highlighted(&client.square_highlights(), SquareHighlightItem::Capture),
        vec![Coord::D5]
    );
}

#[test]
fn promotion() {
    let (mut client, rx) = new_client(Some(White));
    client
        .process_server_event(snapshot_event(
            snapshot(&[
                ("e1", White, PieceKind::King),
                ("a7", White, PieceKind::Pawn),
                ("h8", Black, PieceKind::King),
            ]),
            move_graph("a7a8 e1e2"),
            White,
        ))
        .unwrap();
    client.start_drag_piece(Coord::A7).unwrap();
    let DropOutcome::Move(request) =
        client.drag_piece_drop(Coord::A8, PromotionPreference::Knight)
    else {
        panic!("expected a move");
    };
    assert_eq!(request.promote_to, Some(PieceKind::Knight));
    client.make_move(request).unwrap();
    assert_eq!(drain_outgoing_events(&rx)[0].make_move.promote_to, Some(PieceKind::Knight));

    client
        .process_server_event(move_event(
            "a7a8",
            Some(SpecialMove::Promotion { kind: PieceKind::Knight }),
            move_graph("h8g8 h8h7"),
            state(Black),
        ))
        .unwrap();
    let grid = client.game().unwrap().grid();
    assert!(grid[Coord::A8].is(piece!(White Knight)));
    assert_eq!(grid[Coord::A7], None);
}

#[test]
fn check_and_checkmate() {
    let (mut client, _rx) = new_client(Some(Black));
    client.process_server_event(initial_event()).unwrap();
    drain_notable_events(&mut client);

    let check = GameState { is_check: true, ..state(Black) };
    client
        .process_server_event(move_event("e2e4", None, move_graph("e8e7"), check))
        .unwrap();
    assert_eq!(drain_notable_events(&mut client), vec![
        NotableEvent::OpponentMoveMade { capture: false },
        NotableEvent::Check,
    ]);
    assert_eq!(
        highlighted(&client.square_highlights(), SquareHighlightItem::Check),
        vec![Coord::E8]
    );

    let mate = GameState { is_check: true, is_checkmate: true, ..state(Black) };
    client
        .process_server_event(move_event("d1h5", None, MoveGraph::new(), mate))
        .unwrap();
    assert_eq!(drain_notable_events(&mut client), vec![
        NotableEvent::OpponentMoveMade { capture: false },
        NotableEvent::GameOver(GameOverReport {
            status: GameStatus::Victory(White),
            result: Some(SubjectiveGameResult::Defeat),
        }),
    ]);
    assert!(!client.is_my_turn());
    assert!(!client.can_drag(Coord::E8));
    assert_eq!(client.start_drag_piece(Coord::E8), Err(DragError::GameOver));
}

#[test]
fn draw_for_observer() {
    let (mut observer, _rx_observer) = new_client(None);
    observer.process_server_event(initial_event()).unwrap();
    drain_notable_events(&mut observer);
    let draw = GameState { is_draw: true, ..state(Black) };
    observer
        .process_server_event(move_event("e2e4", None, MoveGraph::new(), draw))
        .unwrap();
    assert_eq!(drain_notable_events(&mut observer), vec![
        NotableEvent::OpponentMoveMade { capture: false },
        NotableEvent::GameOver(GameOverReport {
            status: GameStatus::Draw,
            result: Some(SubjectiveGameResult::Draw),
        }),
    ]);
}

#[test]
fn server_rejects_move() {
    let (mut client, _rx) = new_client(Some(White));
    client.process_server_event(initial_event()).unwrap();
    drain_notable_events(&mut client);
    client.make_move(request("e2e4")).unwrap();
    assert!(!client.can_drag(Coord::E2));
    client
        .process_server_event(GameServerEvent {
            error: Some("Move not allowed".to_owned()),
            ..GameServerEvent::default()
        })
        .unwrap();
    assert_eq!(drain_notable_events(&mut client), vec![NotableEvent::ServerError(
        "Move not allowed".to_owned()
    )]);
    assert!(client.can_drag(Coord::E2));
}

#[test]
fn reconnect_snapshot_replaces_board() {
    let (mut client, _rx) = new_client(Some(White));
    client.process_server_event(initial_event()).unwrap();
    client
        .process_server_event(move_event("e2e4", None, move_graph("e7e5"), state(Black)))
        .unwrap();
    drain_notable_events(&mut client);
    client
        .process_server_event(snapshot_event(
            snapshot(&[("e1", White, PieceKind::King), ("e8", Black, PieceKind::King)]),
            move_graph("e1e2"),
            White,
        ))
        .unwrap();
    assert!(drain_notable_events(&mut client).is_empty());
    let game = client.game().unwrap();
    assert_eq!(game.grid().pieces().count(), 2);
    assert_eq!(game.latest_move(), None);
    assert!(client.can_drag(Coord::E1));
}

#[test]
fn bad_server_move() {
    let (mut client, _rx) = new_client(Some(White));
    client.process_server_event(initial_event()).unwrap();
    assert!(
        client
            .process_server_event(move_event("e4e5", None, MoveGraph::new(), state(Black)))
            .is_err()
    );
    assert!(
        client
            .process_server_event(GameServerEvent {
                special_move: Some(SpecialMove::Promotion { kind: PieceKind::Queen }),
                ..GameServerEvent::default()
            })
            .is_err()
    );
}

#[test]
fn failed_castling_leaves_board_unchanged() {
    let (mut client, _rx) = new_client(Some(Black));
    let before = snapshot(&[("e1", White, PieceKind::King), ("e8", Black, PieceKind::King)]);
    client
        .process_server_event(snapshot_event(before.clone(), move_graph("e1g1 e1f1"), White))
        .unwrap();
    let castling = move_event(
        "e1g1",
        Some(SpecialMove::Castling { rook_start: Coord::H1, rook_end: Coord::F1 }),
        move_graph("e8d8 e8e7"),
        state(Black),
    );
    assert!(client.process_server_event(castling).is_err());
    let game = client.game().unwrap();
    assert_eq!(game.grid().to_snapshot(), before);
    assert!(game.latest_move().is_none());
    assert_eq!(game.game_state().turn, White);
    assert!(game.move_graph().contains(Coord::E1, Coord::G1));
}

#[test]
fn command_errors_are_readable() {
    let (mut client, _rx) = new_client(Some(Black));
    client.process_server_event(initial_event()).unwrap();
    let err = client.start_drag_piece(Coord::E7).unwrap_err();
    assert_eq!(err, DragError::WrongTurnOrder);
    assert_eq!(err.to_human_readable(), "It's not your turn");
    assert_eq!(
        MoveCommandError::IllegalMove(request("e2e5")).to_human_readable(),
        "Illegal move: e2e5"
    );
    assert_eq!(
        client.make_move(request("e7e5")).map_err(|err| err.to_human_readable()),
        Err("It's not your turn".to_owned())
    );
}

#[test]
fn connection_lost() {
    let (mut client, _rx) = new_client(Some(White));
    client.process_server_event(initial_event()).unwrap();
    client.start_drag_piece(Coord::E2).unwrap();
    client.connection_lost();
    assert_eq!(client.connection(), ConnectionStatus::Lost);
    assert!(client.game().unwrap().drag().is_none());
    assert!(!client.can_drag(Coord::E2));
    assert_eq!(client.make_move(request("e2e4")), Err(MoveCommandError::Disconnected));
}

#[test]
fn closed_channel_counts_as_disconnect() {
    let (mut client, rx) = new_client(Some(White));
    client.process_server_event(initial_event()).unwrap();
    drop(rx);
    assert_eq!(client.make_move(request("e2e4")), Err(MoveCommandError::Disconnected));
    assert!(client.can_drag(Coord::E2));
}
