// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::sync::mpsc;

use online_chess::client::{ClientState, NotableEvent};
use online_chess::event::GameClientEvent;
use online_chess::force::Force;
use online_chess::piece::{PieceKind, PieceOnBoard};


#[derive(Clone, Copy, Debug)]
pub struct PieceMatcher {
    pub kind: PieceKind,
    pub force: Force,
}

pub trait PieceIs {
    fn is(self, matcher: PieceMatcher) -> bool;
}

impl PieceIs for Option<PieceOnBoard> {
    fn is(self, matcher: PieceMatcher) -> bool {
        self.is_some_and(|piece| piece.kind == matcher.kind && piece.force == matcher.force)
    }
}

#[macro_export]
macro_rules! piece {
    ($force:ident $kind:ident) => {
        common::PieceMatcher {
            force: online_chess::force::Force::$force,
            kind: online_chess::piece::PieceKind::$kind,
        }
    };
}

#[allow(dead_code)]
pub fn drain_notable_events(client: &mut ClientState) -> Vec<NotableEvent> {
    std::iter::from_fn(|| client.next_notable_event()).collect()
}

#[allow(dead_code)]
pub fn drain_outgoing_events(rx: &mpsc::Receiver<GameClientEvent>) -> Vec<GameClientEvent> {
    rx.try_iter().collect()
}
