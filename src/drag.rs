// Drag-and-drop session for one piece. The set of drop targets is fixed when the drag starts
// and comes straight from the move graph.

use crate::coord::{Coord, Row};
use crate::event::MoveRequest;
use crate::force::Force;
use crate::grid::Grid;
use crate::move_graph::MoveGraph;
use crate::piece::{PieceKind, PieceOnBoard};


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DragError {
    NoGameInProgress,
    GameOver,
    NotAPlayer,
    WrongTurnOrder,
    MoveAwaitingConfirmation,
    PieceMissing,
    DontControlPiece,
    NoLegalMoves,
}

impl DragError {
    pub fn to_human_readable(self) -> &'static str {
        match self {
            DragError::NoGameInProgress => "The game has not started",
            DragError::GameOver => "The game is over",
            DragError::NotAPlayer => "Observers cannot move pieces",
            DragError::WrongTurnOrder => "It's not your turn",
            DragError::MoveAwaitingConfirmation => "Waiting for the server to confirm your move",
            DragError::PieceMissing => "There is no piece there",
            DragError::DontControlPiece => "That's not your piece",
            DragError::NoLegalMoves => "This piece has no legal moves",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceDragSource {
    Board(Coord),
    // The dragged piece was captured or moved by a server update, or the turn was revoked.
    Defunct,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PieceDrag {
    pub piece: PieceOnBoard,
    pub source: PieceDragSource,
    pub destinations: Vec<Coord>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DropOutcome {
    Move(MoveRequest),
    // Piece was put back where it was taken from.
    Cancelled,
    Illegal,
    Defunct,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PromotionPreference {
    Queen,
    Knight,
}

impl PromotionPreference {
    // Holding Alt while dropping a pawn promotes it to a knight.
    pub fn from_alt_key(alt_held: bool) -> Self {
        if alt_held { PromotionPreference::Knight } else { PromotionPreference::Queen }
    }
}

impl PieceDrag {
    pub fn start(
        grid: &Grid, graph: &MoveGraph, my_force: Force, source: Coord,
    ) -> Result<PieceDrag, DragError> {
        let piece = grid[source].ok_or(DragError::PieceMissing)?;
        if piece.force != my_force {
            return Err(DragError::DontControlPiece);
        }
        let destinations = graph.destinations(source).to_vec();
        if destinations.is_empty() {
            return Err(DragError::NoLegalMoves);
        }
        Ok(PieceDrag {
            piece,
            source: PieceDragSource::Board(source),
            destinations,
        })
    }

    pub fn is_defunct(&self) -> bool { self.source == PieceDragSource::Defunct }

    pub fn can_drop_at(&self, dest: Coord) -> bool { self.destinations.contains(&dest) }

    // Called after each board update. The drag survives only if the piece is still there.
    pub fn revalidate(&mut self, grid: &Grid, graph: &MoveGraph) {
        if let PieceDragSource::Board(from) = self.source {
            if grid[from] != Some(self.piece) {
                self.make_defunct();
            } else {
                self.destinations = graph.destinations(from).to_vec();
                if self.destinations.is_empty() {
                    self.make_defunct();
                }
            }
        }
    }

    pub fn make_defunct(&mut self) {
        self.source = PieceDragSource::Defunct;
        self.destinations.clear();
    }

    pub fn drop_at(&self, dest: Coord, promotion: PromotionPreference) -> DropOutcome {
        let PieceDragSource::Board(from) = self.source else {
            return DropOutcome::Defunct;
        };
        if from == dest {
            return DropOutcome::Cancelled;
        }
        if !self.can_drop_at(dest) {
            return DropOutcome::Illegal;
        }
        let promote_to = is_promotion(self.piece, dest).then_some(match promotion {
            PromotionPreference::Queen => PieceKind::Queen,
            PromotionPreference::Knight => PieceKind::Knight,
        });
        DropOutcome::Move(MoveRequest { start_pos: from, end_pos: dest, promote_to })
    }
}

pub fn is_promotion(piece: PieceOnBoard, dest: Coord) -> bool {
    let last_row = match piece.force {
        Force::White => Row::_8,
        Force::Black => Row::_1,
    };
    piece.kind == PieceKind::Pawn && dest.row == last_row
}
