use console::Style;

use crate::chess_prelude::*;


// Latest move and check get a distinct background, the rest follow square colors.
fn square_style(field: &Field, highlight: Option<SquareHighlightItem>) -> Style {
    use SquareHighlightItem::*;
    let style = Style::new().color256(233);
    match (highlight, field.color) {
        (Some(Check), _) => style.on_color256(203),
        (Some(Capture), _) => style.on_color256(216),
        (Some(LatestMoveFrom | LatestMoveTo), SquareColor::Dark) => style.on_color256(143),
        (Some(LatestMoveFrom | LatestMoveTo), SquareColor::Light) => style.on_color256(187),
        (_, SquareColor::Dark) => style.on_color256(222),
        (_, SquareColor::Light) => style.on_color256(230),
    }
}

fn highlight_at(highlights: &[SquareHighlight], coord: Coord) -> Option<SquareHighlightItem> {
    // Check wins over move highlights when both apply.
    let items = || highlights.iter().filter(move |h| h.coord == coord).map(|h| h.item);
    items()
        .find(|&item| item == SquareHighlightItem::Check)
        .or_else(|| items().find(|&item| item == SquareHighlightItem::Capture))
        .or_else(|| items().next())
}

pub fn render_grid(grid: &Grid, perspective: Perspective, highlights: &[SquareHighlight]) -> String {
    let rows = board_rows(grid, perspective);
    let mut ret = String::new();
    let col_header = || -> String {
        let mut header = format_square(' ');
        if let Some(row) = rows.first() {
            for field in row {
                header.push_str(&format_square(field.coord.col.to_algebraic()));
            }
        }
        header.push_str(&format_square(' '));
        header
    };
    ret.push_str(&col_header());
    ret.push('\n');
    for row in &rows {
        let row_name = row.first().map_or(' ', |field| field.coord.row.to_algebraic());
        ret.push_str(&format_square(row_name));
        for field in row {
            let ch = match field.piece {
                Some(piece) => piece_to_pictogram(piece.kind, piece.force),
                None => ' ',
            };
            let style = square_style(field, highlight_at(highlights, field.coord));
            ret.push_str(&style.apply_to(format_square(ch)).to_string());
        }
        ret.push_str(&format_square(row_name));
        ret.push('\n');
    }
    ret.push_str(&col_header());
    ret
}

pub fn render_status(state: &ClientState) -> String {
    let Some(game) = state.game() else {
        return "Waiting for the game to start...".to_owned();
    };
    let game_state = game.game_state();
    let status = game.status();
    if status != GameStatus::Active {
        let text = match status.subjective_result(state.my_force()) {
            Some(SubjectiveGameResult::Victory) => "Victory!".to_owned(),
            Some(SubjectiveGameResult::Defeat) => "Defeat".to_owned(),
            Some(SubjectiveGameResult::Draw) => "Draw".to_owned(),
            None => status.to_human_readable(),
        };
        return Style::new().magenta().apply_to(text).to_string();
    }
    let mut text = match state.my_force() {
        None => format!("{} to move", game_state.turn.name()),
        Some(_) if game.is_awaiting_confirmation() => "Waiting for the server...".to_owned(),
        Some(_) if state.is_my_turn() => "Your move".to_owned(),
        Some(_) => "Opponent's move".to_owned(),
    };
    if game_state.is_check {
        text.push_str(" (check)");
    }
    text
}

pub fn render_game(state: &ClientState) -> String {
    let perspective = Perspective::for_participant(state.my_force());
    match state.game() {
        Some(game) => format!(
            "{}\n\n{}",
            render_grid(game.grid(), perspective, &state.square_highlights()),
            render_status(state)
        ),
        None => render_status(state),
    }
}

fn format_square(ch: char) -> String { format!(" {} ", ch) }
