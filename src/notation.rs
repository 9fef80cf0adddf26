// Coordinate notation for typed moves: "e2e4", "e7e8q", "e7-e8=N".

use crate::coord::Coord;
use crate::event::MoveRequest;
use crate::lazy_regex;
use crate::piece::PieceKind;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotationError {
    Malformed(String),
    NotAPromotionPiece(PieceKind),
}

pub fn parse_move(notation: &str) -> Result<MoveRequest, NotationError> {
    let re = lazy_regex!(r"^([a-h][1-8])[-x]?([a-h][1-8])=?([pnbrqkPNBRQK])?$");
    let malformed = || NotationError::Malformed(notation.to_owned());
    let caps = re.captures(notation.trim()).ok_or_else(malformed)?;
    let start_pos = Coord::from_algebraic(&caps[1]).ok_or_else(malformed)?;
    let end_pos = Coord::from_algebraic(&caps[2]).ok_or_else(malformed)?;
    let promote_to = match caps.get(3) {
        None => None,
        Some(m) => {
            let code = m.as_str().to_ascii_uppercase();
            let kind = PieceKind::from_code(&code).ok_or_else(malformed)?;
            if !kind.is_promotion_target() {
                return Err(NotationError::NotAPromotionPiece(kind));
            }
            Some(kind)
        }
    };
    Ok(MoveRequest { start_pos, end_pos, promote_to })
}

pub fn move_to_notation(request: &MoveRequest) -> String {
    let mut s = format!("{}{}", request.start_pos, request.end_pos);
    if let Some(kind) = request.promote_to {
        s.push(kind.to_code().to_ascii_lowercase());
    }
    s
}
