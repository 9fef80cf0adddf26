// Client-side model of an online game. The server is authoritative: the board only changes when
// a server message says so, and the set of legal moves is whatever the last move graph says.
// The client never panics on bogus user input, but it reports server messages that cannot be
// applied to the current board.

use std::collections::VecDeque;
use std::sync::mpsc;

use log::{info, warn};

use crate::coord::Coord;
use crate::dirty::Dirty;
use crate::drag::{DragError, DropOutcome, PieceDrag, PieceDragSource, PromotionPreference};
use crate::event::{GameClientEvent, GameServerEvent, MoveRecord, MoveRequest, SpecialMove};
use crate::force::Force;
use crate::game_state::{GameState, GameStatus, SubjectiveGameResult};
use crate::grid::Grid;
use crate::internal_error_message;
use crate::move_graph::MoveGraph;
use crate::piece::PieceOnBoard;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MoveCommandError {
    Drag(DragError),
    IllegalMove(MoveRequest),
    Disconnected,
}

impl MoveCommandError {
    pub fn to_human_readable(&self) -> String {
        match self {
            MoveCommandError::Drag(err) => err.to_human_readable().to_owned(),
            MoveCommandError::IllegalMove(request) => {
                format!("Illegal move: {}{}", request.start_pos, request.end_pos)
            }
            MoveCommandError::Disconnected => "Connection to the server is lost".to_owned(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    GameStarted,
    MyMoveConfirmed { capture: bool },
    OpponentMoveMade { capture: bool },
    Check,
    GameOver(GameOverReport),
    ServerError(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GameOverReport {
    pub status: GameStatus,
    // `None` for observers.
    pub result: Option<SubjectiveGameResult>,
}

#[derive(Clone, Debug)]
pub enum EventError {
    CannotApplyEvent(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConnectionStatus {
    Connected,
    Lost,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LatestMove {
    pub mover: Force,
    pub from: Coord,
    pub to: Coord,
    // Rook relocation when castling.
    pub extra: Option<(Coord, Coord)>,
    pub capture: Option<Coord>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SquareHighlightItem {
    LatestMoveFrom,   // latest move started here
    LatestMoveTo,     // latest move ended here
    Capture,          // piece was captured here by the latest move
    Check,            // king in check
    DragStart,        // drag start (while dragging a piece)
    LegalDestination, // legal moves (while dragging a piece)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SquareHighlight {
    pub coord: Coord,
    pub item: SquareHighlightItem,
}

#[derive(Debug)]
pub struct GameView {
    grid: Dirty<Grid>,
    move_graph: MoveGraph,
    game_state: GameState,
    latest_move: Option<LatestMove>,
    // A move has been sent and the server hasn't answered yet.
    awaiting_confirmation: bool,
    drag: Option<PieceDrag>,
}

pub struct ClientState {
    my_force: Option<Force>,
    events_tx: mpsc::Sender<GameClientEvent>,
    connection: ConnectionStatus,
    game: Option<GameView>,
    notable_event_queue: VecDeque<NotableEvent>,
}

impl GameView {
    fn new(grid: Grid) -> Self {
        GameView {
            grid: Dirty::new(grid),
            move_graph: MoveGraph::new(),
            game_state: GameState::new_game(),
            latest_move: None,
            awaiting_confirmation: false,
            drag: None,
        }
    }

    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn grid_dirty(&self) -> &Dirty<Grid> { &self.grid }
    pub fn move_graph(&self) -> &MoveGraph { &self.move_graph }
    pub fn game_state(&self) -> &GameState { &self.game_state }
    pub fn status(&self) -> GameStatus { self.game_state.status() }
    pub fn latest_move(&self) -> Option<LatestMove> { self.latest_move }
    pub fn drag(&self) -> Option<&PieceDrag> { self.drag.as_ref() }
    pub fn is_awaiting_confirmation(&self) -> bool { self.awaiting_confirmation }
}

impl ClientState {
    pub fn new(my_force: Option<Force>, events_tx: mpsc::Sender<GameClientEvent>) -> Self {
        ClientState {
            my_force,
            events_tx,
            connection: ConnectionStatus::Connected,
            game: None,
            notable_event_queue: VecDeque::new(),
        }
    }

    pub fn my_force(&self) -> Option<Force> { self.my_force }
    pub fn is_observer(&self) -> bool { self.my_force.is_none() }
    pub fn connection(&self) -> ConnectionStatus { self.connection }
    pub fn game(&self) -> Option<&GameView> { self.game.as_ref() }

    pub fn next_notable_event(&mut self) -> Option<NotableEvent> {
        self.notable_event_queue.pop_front()
    }

    pub fn connection_lost(&mut self) {
        if self.connection == ConnectionStatus::Connected {
            warn!("Game connection closed unexpectedly");
        }
        self.connection = ConnectionStatus::Lost;
        if let Some(game) = &mut self.game {
            game.drag = None;
        }
    }

    pub fn is_my_turn(&self) -> bool {
        match (&self.game, self.my_force) {
            (Some(game), Some(my_force)) => {
                game.game_state.is_active() && game.game_state.turn == my_force
            }
            _ => false,
        }
    }

    fn check_drag_allowed(&self) -> Result<(&GameView, Force), DragError> {
        let game = self.game.as_ref().ok_or(DragError::NoGameInProgress)?;
        let my_force = self.my_force.ok_or(DragError::NotAPlayer)?;
        if !game.game_state.is_active() {
            return Err(DragError::GameOver);
        }
        if game.game_state.turn != my_force {
            return Err(DragError::WrongTurnOrder);
        }
        if game.awaiting_confirmation {
            return Err(DragError::MoveAwaitingConfirmation);
        }
        Ok((game, my_force))
    }

    // Whether the piece on `coord` should be rendered as draggable.
    pub fn can_drag(&self, coord: Coord) -> bool {
        self.connection == ConnectionStatus::Connected
            && self.check_drag_allowed().is_ok_and(|(game, my_force)| {
                game.grid[coord].is_some_and(|piece| piece.force == my_force)
                    && game.move_graph.has_moves_from(coord)
            })
    }

    pub fn start_drag_piece(&mut self, source: Coord) -> Result<(), DragError> {
        if self.connection != ConnectionStatus::Connected {
            return Err(DragError::NoGameInProgress);
        }
        let (game, my_force) = self.check_drag_allowed()?;
        let drag = PieceDrag::start(&game.grid, &game.move_graph, my_force, source)?;
        if let Some(game) = &mut self.game {
            game.drag = Some(drag);
        }
        Ok(())
    }

    pub fn abort_drag_piece(&mut self) {
        if let Some(game) = &mut self.game {
            game.drag = None;
        }
    }

    // Ends the drag. On success the caller should send the move via `make_move`.
    pub fn drag_piece_drop(&mut self, dest: Coord, promotion: PromotionPreference) -> DropOutcome {
        let Some(game) = &mut self.game else {
            return DropOutcome::Defunct;
        };
        match game.drag.take() {
            Some(drag) => drag.drop_at(dest, promotion),
            None => DropOutcome::Defunct,
        }
    }

    pub fn make_move(&mut self, request: MoveRequest) -> Result<(), MoveCommandError> {
        if self.connection != ConnectionStatus::Connected {
            return Err(MoveCommandError::Disconnected);
        }
        self.check_drag_allowed().map_err(MoveCommandError::Drag)?;
        let Some(game) = &mut self.game else {
            return Err(MoveCommandError::Drag(DragError::NoGameInProgress));
        };
        if !game.move_graph.contains(request.start_pos, request.end_pos) {
            return Err(MoveCommandError::IllegalMove(request));
        }
        game.drag = None;
        self.events_tx
            .send(GameClientEvent { make_move: request })
            .map_err(|_| MoveCommandError::Disconnected)?;
        game.awaiting_confirmation = true;
        Ok(())
    }

    pub fn process_server_event(&mut self, event: GameServerEvent) -> Result<(), EventError> {
        let GameServerEvent {
            chessboard,
            last_move,
            special_move,
            move_graph,
            game_state,
            error,
        } = event;
        if special_move.is_some() && last_move.is_none() {
            return Err(EventError::CannotApplyEvent(
                "Special move without the move itself".to_owned(),
            ));
        }

        match (&mut self.game, chessboard) {
            (Some(game), Some(snapshot)) => {
                // Reconnection: the server re-sent the whole board.
                game.grid.replace(Grid::from_snapshot(&snapshot));
                game.latest_move = None;
                game.awaiting_confirmation = false;
            }
            (Some(_), None) => {}
            (None, snapshot) => {
                // Without a snapshot the game is assumed to begin from the standard setup.
                let grid = snapshot.map_or_else(Grid::starting_position, |s| Grid::from_snapshot(&s));
                self.game = Some(GameView::new(grid));
                self.notable_event_queue.push_back(NotableEvent::GameStarted);
            }
        }
        let Some(game) = &mut self.game else {
            return Err(EventError::CannotApplyEvent(internal_error_message!()));
        };
        let old_status = game.game_state.status();

        if let Some(record) = last_move {
            // A move that cannot be applied must leave the board untouched.
            let mut grid = (*game.grid).clone();
            let latest = apply_move(&mut grid, record, special_move)?;
            game.grid.replace(grid);
            game.latest_move = Some(latest);
            game.awaiting_confirmation = false;
            let capture = latest.capture.is_some();
            self.notable_event_queue.push_back(if Some(latest.mover) == self.my_force {
                NotableEvent::MyMoveConfirmed { capture }
            } else {
                NotableEvent::OpponentMoveMade { capture }
            });
        }

        if let Some(move_graph) = move_graph {
            game.move_graph = move_graph;
        }

        if let Some(game_state) = game_state {
            game.game_state = game_state;
            let status = game_state.status();
            if status != old_status && status != GameStatus::Active {
                let result = status.subjective_result(self.my_force);
                info!("Game over: {}", status.to_human_readable());
                self.notable_event_queue
                    .push_back(NotableEvent::GameOver(GameOverReport { status, result }));
            } else if game_state.is_check && last_move.is_some() {
                self.notable_event_queue.push_back(NotableEvent::Check);
            }
        }

        if let Some(message) = error {
            warn!("Server rejected move: {}", message);
            game.awaiting_confirmation = false;
            self.notable_event_queue.push_back(NotableEvent::ServerError(message));
        }

        let my_turn = game.game_state.is_active() && Some(game.game_state.turn) == self.my_force;
        if let Some(drag) = &mut game.drag {
            if my_turn {
                drag.revalidate(&game.grid, &game.move_graph);
            } else {
                drag.make_defunct();
            }
        }
        Ok(())
    }

    pub fn square_highlights(&self) -> Vec<SquareHighlight> {
        use SquareHighlightItem::*;
        let Some(game) = &self.game else {
            return vec![];
        };
        let mut highlights = vec![];
        let mut push = |coord, item| highlights.push(SquareHighlight { coord, item });
        if let Some(latest) = game.latest_move {
            push(latest.from, LatestMoveFrom);
            push(latest.to, LatestMoveTo);
            if let Some((from, to)) = latest.extra {
                push(from, LatestMoveFrom);
                push(to, LatestMoveTo);
            }
            // En passant captures on a square other than `to`.
            if let Some(capture) = latest.capture.filter(|&c| c != latest.to) {
                push(capture, Capture);
            }
        }
        if game.game_state.is_check {
            if let Some(king) = game.grid.find_king(game.game_state.turn) {
                push(king, Check);
            }
        }
        if let Some(PieceDrag { source: PieceDragSource::Board(from), destinations, .. }) = &game.drag {
            push(*from, DragStart);
            for &dest in destinations {
                push(dest, LegalDestination);
            }
        }
        highlights
    }
}

// Applies a server-confirmed move to the grid.
fn apply_move(
    grid: &mut Grid, record: MoveRecord, special_move: Option<SpecialMove>,
) -> Result<LatestMove, EventError> {
    let MoveRecord { start_pos: from, end_pos: to } = record;
    let mover = grid[from]
        .ok_or_else(|| {
            EventError::CannotApplyEvent(format!("Cannot apply move {}{}: square is empty", from, to))
        })?
        .force;
    let mut capture = match grid.relocate(from, to) {
        Some(Some(_captured)) => Some(to),
        Some(None) => None,
        None => return Err(EventError::CannotApplyEvent(internal_error_message!())),
    };
    let mut extra = None;
    match special_move {
        None => {}
        Some(SpecialMove::Castling { rook_start, rook_end }) => {
            if grid.relocate(rook_start, rook_end).is_none() {
                return Err(EventError::CannotApplyEvent(format!(
                    "Cannot castle: no rook on {}",
                    rook_start
                )));
            }
            extra = Some((rook_start, rook_end));
        }
        Some(SpecialMove::EnPassant { captured }) => {
            if grid[captured].take().is_none() {
                return Err(EventError::CannotApplyEvent(format!(
                    "Cannot capture en passant: {} is empty",
                    captured
                )));
            }
            capture = Some(captured);
        }
        Some(SpecialMove::Promotion { kind }) => {
            grid[to] = Some(PieceOnBoard::new(kind, mover));
        }
    }
    Ok(LatestMove { mover, from, to, extra, capture })
}
