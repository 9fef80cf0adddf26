// Helpers for building server messages in tests. They live in the library so that both unit and
// integration tests can use them.

use std::sync::mpsc;

use itertools::Itertools;

use crate::client::ClientState;
use crate::coord::{Col, Coord, Row};
use crate::event::{GameClientEvent, GameServerEvent, MoveRecord, SpecialMove};
use crate::force::Force;
use crate::game_state::GameState;
use crate::grid::{BoardSnapshot, Grid};
use crate::move_graph::MoveGraph;


pub fn coord(algebraic: &str) -> Coord {
    Coord::from_algebraic(algebraic).unwrap_or_else(|| panic!("invalid square: {}", algebraic))
}

// Parses "e2e3 e2e4 g1f3" into a move graph.
pub fn move_graph(moves: &str) -> MoveGraph {
    MoveGraph::from_edges(moves.split_whitespace().map(|m| {
        assert_eq!(m.len(), 4, "invalid move: {}", m);
        (coord(&m[..2]), coord(&m[2..]))
    }))
}

// All 20 moves that white has in the starting position.
pub fn opening_move_graph() -> MoveGraph {
    let pawn_moves = Col::all().flat_map(|col| {
        [Row::_3, Row::_4].map(|row| (Coord::new(Row::_2, col), Coord::new(row, col)))
    });
    let knight_moves = [
        (Coord::B1, Coord::A3),
        (Coord::B1, Coord::C3),
        (Coord::G1, Coord::F3),
        (Coord::G1, Coord::H3),
    ];
    MoveGraph::from_edges(pawn_moves.chain(knight_moves).collect_vec())
}

pub fn state(turn: Force) -> GameState { GameState { turn, ..GameState::new_game() } }

pub fn snapshot_event(snapshot: BoardSnapshot, graph: MoveGraph, turn: Force) -> GameServerEvent {
    GameServerEvent {
        chessboard: Some(snapshot),
        move_graph: Some(graph),
        game_state: Some(state(turn)),
        ..GameServerEvent::default()
    }
}

pub fn initial_event() -> GameServerEvent {
    snapshot_event(Grid::starting_position().to_snapshot(), opening_move_graph(), Force::White)
}

pub fn move_event(
    notation: &str, special_move: Option<SpecialMove>, graph: MoveGraph, game_state: GameState,
) -> GameServerEvent {
    GameServerEvent {
        last_move: Some(MoveRecord {
            start_pos: coord(&notation[..2]),
            end_pos: coord(&notation[2..4]),
        }),
        special_move,
        move_graph: Some(graph),
        game_state: Some(game_state),
        ..GameServerEvent::default()
    }
}

// A client with its outgoing channel.
pub fn new_client(my_force: Option<Force>) -> (ClientState, mpsc::Receiver<GameClientEvent>) {
    let (tx, rx) = mpsc::channel();
    (ClientState::new(my_force, tx), rx)
}
