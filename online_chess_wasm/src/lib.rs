// Browser front end. The page owns the sockets and pointer events (see `www/index.js`) and calls
// into `WebClient`/`WebLobby` for everything else. Board geometry is in square units: the board
// SVG has a `0 0 8 8` view box, so pointer positions passed to drag functions are in squares too.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod chess_prelude;
mod web_document;
mod web_element_ext;
mod web_error_handling;

use std::cell::RefCell;
use std::sync::mpsc;

use chess_prelude::*;
use enum_map::{enum_map, EnumMap};
use strum::IntoEnumIterator;
use wasm_bindgen::prelude::*;
use web_document::{web_document, web_window, WebDocument};
use web_element_ext::WebElementExt;
use web_error_handling::{log_to_console, JsResult};

pub use web_error_handling::{last_panic, set_panic_hook};


const BOARD_NODE_ID: &str = "board";
const SQUARE_LAYER_ID: &str = "square-layer";
const HIGHLIGHT_LAYER_ID: &str = "square-highlight-layer";
const PIECE_LAYER_ID: &str = "piece-layer";
const DRAG_OVER_HIGHLIGHT_ID: &str = "drag-over-highlight";

const MOVE_SOUND_ID: &str = "move-sound";
const CAPTURE_SOUND_ID: &str = "capture-sound";
const CHECK_SOUND_ID: &str = "check-sound";
const GAME_OVER_DIALOG_ID: &str = "game-over-dialog";
const GAME_OVER_MESSAGE_ID: &str = "game-over-message";
const TURN_INDICATOR_ID: &str = "turn-indicator";
const INFO_STRING_ID: &str = "info-string";

const WHITE_NICKNAME_ID: &str = "white_nickname";
const BLACK_NICKNAME_ID: &str = "black_nickname";

type PiecePaths = EnumMap<Force, EnumMap<PieceKind, String>>;

thread_local! {
    static PIECE_PATH: RefCell<Option<PiecePaths>> = const { RefCell::new(None) };
    static AUDIO_REJECTION_HANDLER: Closure<dyn FnMut(JsValue)> = Closure::new(|err: JsValue| {
        log_to_console(&format!("Cannot play sound: {:?}", err));
    });
}


#[wasm_bindgen]
pub struct JsEventNoop {} // in contrast to `null`, indicates that event list is not over

#[wasm_bindgen]
pub struct JsEventMoveMade {}

#[wasm_bindgen]
pub struct JsEventCheck {}

#[wasm_bindgen]
pub struct JsEventVictory {}

#[wasm_bindgen]
pub struct JsEventDefeat {}

#[wasm_bindgen]
pub struct JsEventDraw {}

// Game over as seen by an observer.
#[wasm_bindgen]
pub struct JsEventGameOver {}

#[wasm_bindgen(getter_with_clone)]
pub struct JsEventServerError {
    pub message: String,
}

#[wasm_bindgen(getter_with_clone)]
pub struct JsEventStartGame {
    pub url: String,
}


#[wasm_bindgen]
pub struct WebClient {
    state: ClientState,
    server_rx: mpsc::Receiver<GameClientEvent>,
    perspective: Perspective,
}

#[wasm_bindgen]
impl WebClient {
    // `my_color` is "white", "black", or empty for observers.
    pub fn new_client(my_color: &str) -> JsResult<WebClient> {
        let my_force = match my_color {
            "" => None,
            _ => Some(
                Force::from_name(my_color)
                    .ok_or_else(|| rust_error!("Unexpected color: {}", my_color))?,
            ),
        };
        let (server_tx, server_rx) = mpsc::channel();
        Ok(WebClient {
            state: ClientState::new(my_force, server_tx),
            server_rx,
            perspective: Perspective::for_participant(my_force),
        })
    }

    pub fn game_socket_path(game_id: &str) -> String { game_socket_path(game_id) }

    pub fn process_server_event(&mut self, event: &str) -> JsResult<()> {
        let server_event = serde_json::from_str(event)
            .map_err(|err| rust_error!("Cannot parse server event: {}", err))?;
        self.state.process_server_event(server_event).map_err(|err| rust_error!("{:?}", err))
    }

    pub fn next_outgoing_event(&mut self) -> JsResult<Option<String>> {
        match self.server_rx.try_recv() {
            Ok(event) => serde_json::to_string(&event)
                .map(Some)
                .map_err(|err| rust_error!("Cannot serialize event: {}", err)),
            Err(_) => Ok(None),
        }
    }

    pub fn next_notable_event(&mut self) -> JsResult<JsValue> {
        match self.state.next_notable_event() {
            Some(NotableEvent::GameStarted) => {
                render_board(self.perspective)?;
                if let Some(game) = self.state.game() {
                    game.grid_dirty().mark_dirty();
                }
                set_observer_mode(self.state.is_observer())?;
                set_info_string(None)?;
                Ok(JsEventNoop {}.into())
            }
            Some(NotableEvent::MyMoveConfirmed { capture })
            | Some(NotableEvent::OpponentMoveMade { capture }) => {
                play_audio(if capture { CAPTURE_SOUND_ID } else { MOVE_SOUND_ID })?;
                Ok(JsEventMoveMade {}.into())
            }
            Some(NotableEvent::Check) => {
                play_audio(CHECK_SOUND_ID)?;
                Ok(JsEventCheck {}.into())
            }
            Some(NotableEvent::GameOver(report)) => {
                show_game_over_dialog(report)?;
                Ok(match report.result {
                    Some(SubjectiveGameResult::Victory) => JsEventVictory {}.into(),
                    Some(SubjectiveGameResult::Defeat) => JsEventDefeat {}.into(),
                    Some(SubjectiveGameResult::Draw) => JsEventDraw {}.into(),
                    None => JsEventGameOver {}.into(),
                })
            }
            Some(NotableEvent::ServerError(message)) => {
                log_to_console(&format!("Server error: {}", message));
                set_info_string(Some(&message))?;
                Ok(JsEventServerError { message }.into())
            }
            None => Ok(JsValue::NULL),
        }
    }

    // `source` is the algebraic name of the square, taken from the piece's `data-square`.
    pub fn start_drag_piece(&mut self, source: &str) -> JsResult<()> {
        let coord = Coord::from_algebraic(source)
            .ok_or_else(|| rust_error!("Invalid drag source: {}", source))?;
        match self.state.start_drag_piece(coord) {
            Ok(()) => set_info_string(None)?,
            // The page may be a step behind the model, e.g. the turn has just passed.
            Err(err) => set_info_string(Some(err.to_human_readable()))?,
        }
        Ok(())
    }

    pub fn drag_piece(&mut self, dest_x: f64, dest_y: f64) -> JsResult<()> {
        let dest = DisplayFCoord { x: dest_x, y: dest_y }.to_square();
        set_square_highlight(DRAG_OVER_HIGHLIGHT_ID, dest)
    }

    pub fn drag_piece_drop(
        &mut self, dest_x: f64, dest_y: f64, alt_key: bool,
    ) -> JsResult<()> {
        let orientation = self.perspective.orientation();
        let dest = DisplayFCoord { x: dest_x, y: dest_y }
            .to_square()
            .and_then(|q| from_display_coord(q, orientation));
        let Some(dest) = dest else {
            self.state.abort_drag_piece();
            return Ok(());
        };
        match self.state.drag_piece_drop(dest, PromotionPreference::from_alt_key(alt_key)) {
            DropOutcome::Move(request) => {
                let result = self.state.make_move(request);
                set_info_string(result.err().map(|err| err.to_human_readable()).as_deref())?;
            }
            DropOutcome::Illegal => set_info_string(Some("Illegal move"))?,
            // Ignore: the user put the piece back, or the dragged piece was captured.
            DropOutcome::Cancelled | DropOutcome::Defunct => {}
        }
        Ok(())
    }

    pub fn abort_drag_piece(&mut self) { self.state.abort_drag_piece(); }

    // Should be called after `drag_piece_drop`/`abort_drag_piece`.
    pub fn reset_drag_highlights(&self) -> JsResult<()> {
        // The page may have moved the dragged piece node, so put it back on next update.
        if let Some(game) = self.state.game() {
            game.grid_dirty().mark_dirty();
        }
        set_square_highlight(DRAG_OVER_HIGHLIGHT_ID, None)?;
        self.update_square_highlights()
    }

    pub fn drag_state(&self) -> String {
        let drag = self.state.game().and_then(|game| game.drag());
        match drag {
            None => "no",
            Some(drag) if drag.is_defunct() => "defunct",
            Some(_) => "yes",
        }
        .to_owned()
    }

    pub fn connection_closed(&mut self) -> JsResult<()> {
        self.state.connection_lost();
        set_info_string(Some("Connection lost"))?;
        self.update_state()
    }

    pub fn update_state(&self) -> JsResult<()> {
        let Some(game) = self.state.game() else {
            return Ok(());
        };
        let document = web_document()?;
        if game.grid_dirty().take_dirt() {
            self.render_pieces(&document, game)?;
        }
        // Drag availability depends on the turn as well as on the board, so refresh it always.
        for (coord, _) in game.grid().pieces() {
            if let Some(node) = document.get_element_by_id(&piece_id(coord)) {
                node.set_class_enabled("draggable", self.state.can_drag(coord))?;
            }
        }
        self.update_square_highlights()?;
        update_turn_indicator(&document, &self.state)?;
        Ok(())
    }
}

impl WebClient {
    fn render_pieces(&self, document: &WebDocument, game: &GameView) -> JsResult<()> {
        let layer = document.get_existing_element_by_id(PIECE_LAYER_ID)?;
        layer.remove_all_children();
        let orientation = self.perspective.orientation();
        for (coord, piece) in game.grid().pieces() {
            let position = square_position(to_display_coord(coord, orientation));
            let node = layer
                .append_new_svg_element("image")?
                .with_id(&piece_id(coord))
                .with_attribute("href", &piece_path(piece)?)?
                .with_attribute("data-square", &coord.to_algebraic())?;
            node.set_square_position(position)?;
        }
        Ok(())
    }

    fn update_square_highlights(&self) -> JsResult<()> {
        let document = web_document()?;
        let layer = document.get_existing_element_by_id(HIGHLIGHT_LAYER_ID)?;
        layer.remove_all_children();
        let orientation = self.perspective.orientation();
        for highlight in self.state.square_highlights() {
            let position = square_position(to_display_coord(highlight.coord, orientation));
            let node = layer
                .append_new_svg_element("rect")?
                .with_classes([highlight_class(highlight.item)])?;
            node.set_square_position(position)?;
        }
        Ok(())
    }
}


#[wasm_bindgen]
pub struct WebLobby {
    state: LobbyState,
    server_rx: mpsc::Receiver<LobbyClientEvent>,
}

#[wasm_bindgen]
impl WebLobby {
    pub fn new_lobby() -> WebLobby {
        let (server_tx, server_rx) = mpsc::channel();
        WebLobby { state: LobbyState::new(server_tx), server_rx }
    }

    pub fn lobby_socket_path(game_id: &str) -> String { lobby_socket_path(game_id) }

    pub fn play_as(&mut self, color: &str) -> JsResult<()> {
        let force =
            Force::from_name(color).ok_or_else(|| rust_error!("Unexpected color: {}", color))?;
        self.state.play_as(force).map_err(|err| rust_error!("{:?}", err))
    }

    pub fn start_game(&mut self) -> JsResult<()> {
        self.state.start_game().map_err(|err| rust_error!("{:?}", err))
    }

    pub fn process_server_event(&mut self, event: &str) -> JsResult<()> {
        let server_event = serde_json::from_str(event)
            .map_err(|err| rust_error!("Cannot parse lobby event: {}", err))?;
        self.state.process_server_event(server_event);
        Ok(())
    }

    pub fn next_outgoing_event(&mut self) -> JsResult<Option<String>> {
        match self.server_rx.try_recv() {
            Ok(event) => serde_json::to_string(&event)
                .map(Some)
                .map_err(|err| rust_error!("Cannot serialize event: {}", err)),
            Err(_) => Ok(None),
        }
    }

    pub fn next_notable_event(&mut self) -> JsResult<JsValue> {
        match self.state.next_notable_event() {
            Some(LobbyNotableEvent::SetupUpdated) => {
                let document = web_document()?;
                for force in Force::iter() {
                    let id = match force {
                        Force::White => WHITE_NICKNAME_ID,
                        Force::Black => BLACK_NICKNAME_ID,
                    };
                    let node = document.get_existing_element_by_id(id)?;
                    node.set_text_content(self.state.nick(force));
                }
                Ok(JsEventNoop {}.into())
            }
            Some(LobbyNotableEvent::StartGame(url)) => {
                web_window()?.location().replace(&url)?;
                Ok(JsEventStartGame { url }.into())
            }
            None => Ok(JsValue::NULL),
        }
    }
}


#[wasm_bindgen]
pub fn init_page(
    white_pawn: String, white_knight: String, white_bishop: String, white_rook: String,
    white_queen: String, white_king: String, black_pawn: String, black_knight: String,
    black_bishop: String, black_rook: String, black_queen: String, black_king: String,
) -> JsResult<()> {
    use Force::*;
    use PieceKind::*;
    let mut piece_path: PiecePaths = enum_map! { _ => enum_map! { _ => String::new() } };
    piece_path[White][Pawn] = white_pawn;
    piece_path[White][Knight] = white_knight;
    piece_path[White][Bishop] = white_bishop;
    piece_path[White][Rook] = white_rook;
    piece_path[White][Queen] = white_queen;
    piece_path[White][King] = white_king;
    piece_path[Black][Pawn] = black_pawn;
    piece_path[Black][Knight] = black_knight;
    piece_path[Black][Bishop] = black_bishop;
    piece_path[Black][Rook] = black_rook;
    piece_path[Black][Queen] = black_queen;
    piece_path[Black][King] = black_king;
    PIECE_PATH.with(|cell| *cell.borrow_mut() = Some(piece_path));
    render_board(Perspective::for_participant(None))
}

fn piece_path(piece: PieceOnBoard) -> JsResult<String> {
    PIECE_PATH.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|paths| paths[piece.force][piece.kind].clone())
            .ok_or_else(|| rust_error!("Piece images are not initialized"))
    })
}

// Draws squares and captions, and creates empty highlight and piece layers.
fn render_board(perspective: Perspective) -> JsResult<()> {
    let text_h_padding = 0.07;
    let text_v_padding = 0.09;
    let orientation = perspective.orientation();

    let document = web_document()?;
    let svg = document.get_existing_element_by_id(BOARD_NODE_ID)?;
    svg.remove_all_children();

    let squares = svg.append_new_svg_element("g")?.with_id(SQUARE_LAYER_ID);
    for coord in Coord::all() {
        let display_coord = to_display_coord(coord, orientation);
        let (x, y) = square_position(display_coord);
        let color = SquareColor::of(coord);
        let sq = squares.append_new_svg_element("rect")?.with_classes([color.css_class()])?;
        sq.set_square_position((x, y))?;
        let caption_class = format!("on-{}", color.css_class());
        if display_coord.x == 0 {
            squares
                .append_new_svg_element("text")?
                .with_text_content(&coord.row.to_algebraic().to_string())
                .with_attribute("x", &(x + text_h_padding).to_string())?
                .with_attribute("y", &(y + text_v_padding).to_string())?
                .with_attribute("dominant-baseline", "hanging")?
                .with_classes([caption_class.as_str()])?;
        }
        if display_coord.y == NUM_ROWS as i8 - 1 {
            squares
                .append_new_svg_element("text")?
                .with_text_content(&coord.col.to_algebraic().to_string())
                .with_attribute("x", &(x + 1.0 - text_h_padding).to_string())?
                .with_attribute("y", &(y + 1.0 - text_v_padding).to_string())?
                .with_attribute("text-anchor", "end")?
                .with_classes([caption_class.as_str()])?;
        }
    }

    // Highlights are displayed below pieces.
    svg.append_new_svg_element("g")?.with_id(HIGHLIGHT_LAYER_ID);
    svg.append_new_svg_element("g")?.with_id(PIECE_LAYER_ID);
    Ok(())
}

fn set_square_highlight(id: &str, coord: Option<DisplayCoord>) -> JsResult<()> {
    let document = web_document()?;
    if let Some(coord) = coord {
        let layer = document.get_existing_element_by_id(HIGHLIGHT_LAYER_ID)?;
        let node = document.ensure_svg_node("rect", id, &layer, |_| Ok(()))?;
        node.set_square_position(square_position(coord))?;
    } else if let Some(node) = document.get_element_by_id(id) {
        node.remove();
    }
    Ok(())
}

fn set_observer_mode(observer: bool) -> JsResult<()> {
    web_document()?.body()?.set_class_enabled("observer", observer)
}

fn set_info_string(text: Option<&str>) -> JsResult<()> {
    let info_string = web_document()?.get_existing_element_by_id(INFO_STRING_ID)?;
    info_string.set_text_content(text);
    Ok(())
}

fn update_turn_indicator(document: &WebDocument, state: &ClientState) -> JsResult<()> {
    let Some(game) = state.game() else {
        return Ok(());
    };
    let indicator = document.get_existing_element_by_id(TURN_INDICATOR_ID)?;
    let game_state = game.game_state();
    let text = match (game.status(), state.my_force()) {
        (GameStatus::Active, None) => format!("{} to move", capitalize(game_state.turn.name())),
        (GameStatus::Active, Some(_)) if game.is_awaiting_confirmation() => {
            "Waiting for the server...".to_owned()
        }
        (GameStatus::Active, Some(_)) if state.is_my_turn() => "Your move".to_owned(),
        (GameStatus::Active, Some(_)) => "Opponent's move".to_owned(),
        (status, _) => status.to_human_readable(),
    };
    indicator.set_text_content(Some(&text));
    indicator.set_class_enabled("my-turn", state.is_my_turn())?;
    indicator.set_class_enabled("in-check", game_state.is_check)?;
    Ok(())
}

fn show_game_over_dialog(report: GameOverReport) -> JsResult<()> {
    let document = web_document()?;
    let message = match report.result {
        Some(SubjectiveGameResult::Victory) => "Victory!".to_owned(),
        Some(SubjectiveGameResult::Defeat) => "Defeat".to_owned(),
        Some(SubjectiveGameResult::Draw) => "Draw".to_owned(),
        None => report.status.to_human_readable(),
    };
    document.get_existing_element_by_id(GAME_OVER_MESSAGE_ID)?.set_text_content(Some(&message));
    let dialog: web_sys::HtmlDialogElement =
        document.get_existing_typed_element_by_id(GAME_OVER_DIALOG_ID)?;
    if !dialog.open() {
        dialog.show_modal()?;
    }
    Ok(())
}

fn play_audio(id: &str) -> JsResult<()> {
    let audio: web_sys::HtmlMediaElement = web_document()?.get_existing_typed_element_by_id(id)?;
    audio.set_current_time(0.0);
    // Browsers reject playback before the first user gesture.
    let promise: js_sys::Promise = audio.play()?;
    AUDIO_REJECTION_HANDLER.with(|handler| promise.catch(handler));
    Ok(())
}

fn highlight_class(item: SquareHighlightItem) -> &'static str {
    use SquareHighlightItem::*;
    match item {
        LatestMoveFrom => "latest-move-from",
        LatestMoveTo => "latest-move-to",
        Capture => "capture",
        Check => "check",
        DragStart => "drag-start",
        LegalDestination => "legal-destination",
    }
}

fn square_position(coord: DisplayCoord) -> (f64, f64) {
    let pivot = DisplayFCoord::square_pivot(coord);
    (pivot.x, pivot.y)
}

fn piece_id(coord: Coord) -> String { format!("piece-{}", coord.to_algebraic()) }

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
