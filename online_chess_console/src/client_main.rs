// Improvement potential: Support mouse input via crossterm mouse events.

use std::fmt;
use std::io;
use std::sync::mpsc;
use std::thread;

use crossterm::style::{self, Stylize};
use crossterm::{cursor, event as term_event, execute, terminal};
use log::error;
use scopeguard::defer;

use crate::chess_prelude::*;
use crate::network;
use crate::tui;


pub struct ClientConfig {
    pub server_address: String,
    pub game_id: String,
    pub my_force: Option<Force>,
}

enum IncomingEvent {
    Network(GameServerEvent),
    NetworkError(network::CommunicationError),
    Terminal(term_event::Event),
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(stdout, style::Print(line), cursor::MoveToNextLine(1), cursor::Hide)?;
    }
    Ok(())
}

fn render(
    stdout: &mut io::Stdout, client_state: &ClientState, keyboard_input: &str,
    command_error: &Option<String>, info: &[String],
) -> io::Result<()> {
    execute!(stdout, cursor::MoveTo(0, 0))?;
    writeln_raw(stdout, format!("{}\n", tui::render_game(client_state)))?;
    // Note. Don't clear the board to avoid blinking.
    execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;
    let highlight_input = client_state.is_my_turn();
    let input_with_cursor = format!("{}▂", keyboard_input);
    let input_style = if highlight_input { style::Color::White } else { style::Color::DarkGrey };
    writeln_raw(stdout, format!("{}\n", input_with_cursor.with(input_style)))?;
    for line in info {
        writeln_raw(stdout, line.as_str().with(style::Color::Cyan))?;
    }
    if let Some(err) = command_error {
        writeln_raw(stdout, err.clone().with(style::Color::Red))?;
    }
    Ok(())
}

// Typed moves don't say what a pawn promotes to unless asked, so fill in the default.
fn with_default_promotion(state: &ClientState, mut request: MoveRequest) -> MoveRequest {
    let piece = state.game().and_then(|game| game.grid()[request.start_pos]);
    if request.promote_to.is_none() && piece.is_some_and(|p| is_promotion(p, request.end_pos)) {
        request.promote_to = Some(PieceKind::Queen);
    }
    request
}

fn make_move(client_state: &mut ClientState, input: &str) -> Option<String> {
    let request = match parse_move(input) {
        Ok(request) => with_default_promotion(client_state, request),
        Err(err) => return Some(format!("Cannot parse move '{}': {:?}", input, err)),
    };
    match client_state.make_move(request) {
        Ok(()) => None,
        Err(err) => Some(err.to_human_readable()),
    }
}

fn describe_notable_event(event: &NotableEvent) -> Option<String> {
    match event {
        NotableEvent::GameStarted => None,
        NotableEvent::MyMoveConfirmed { .. } | NotableEvent::OpponentMoveMade { .. } => None,
        NotableEvent::Check => Some("Check!".to_owned()),
        NotableEvent::GameOver(report) => Some(report.status.to_human_readable()),
        NotableEvent::ServerError(message) => Some(format!("Server: {}", message)),
    }
}

pub fn run(config: ClientConfig) -> anyhow::Result<()> {
    let (mut socket_in, mut socket_out) =
        network::connect(&config.server_address, &game_socket_path(&config.game_id))?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    defer! {
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    };

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_local = tx;
    thread::spawn(move || {
        loop {
            let ev = match network::read_obj(&mut socket_in) {
                Ok(ev) => IncomingEvent::Network(ev),
                Err(err) => {
                    let _ = tx_net.send(IncomingEvent::NetworkError(err));
                    return;
                }
            };
            if tx_net.send(ev).is_err() {
                return;
            }
        }
    });
    thread::spawn(move || {
        while let Ok(ev) = term_event::read() {
            if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
                return;
            }
        }
    });

    let (server_tx, server_rx) = mpsc::channel();
    thread::spawn(move || {
        for ev in server_rx {
            if let Err(err) = network::write_obj(&mut socket_out, &ev) {
                error!("Cannot send move: {}", err);
                return;
            }
        }
    });

    let mut client_state = ClientState::new(config.my_force, server_tx);
    let mut keyboard_input = String::new();
    let mut command_error = None;
    let mut info = vec![];
    render(&mut stdout, &client_state, &keyboard_input, &command_error, &info)?;
    for event in rx {
        match event {
            IncomingEvent::Network(event) => {
                if let Err(err) = client_state.process_server_event(event) {
                    command_error = Some(format!("Cannot apply server update: {:?}", err));
                }
            }
            IncomingEvent::NetworkError(err) => {
                client_state.connection_lost();
                command_error = Some(format!("Disconnected: {}", err));
            }
            IncomingEvent::Terminal(term_event::Event::Key(event)) => {
                if event.kind == term_event::KeyEventKind::Release {
                    continue;
                }
                match event.code {
                    term_event::KeyCode::Char('c')
                        if event.modifiers.contains(term_event::KeyModifiers::CONTROL) =>
                    {
                        return Ok(());
                    }
                    term_event::KeyCode::Char(ch) => keyboard_input.push(ch),
                    term_event::KeyCode::Backspace => {
                        keyboard_input.pop();
                    }
                    term_event::KeyCode::Enter => {
                        let input = std::mem::take(&mut keyboard_input);
                        command_error = match input.trim() {
                            "/quit" => return Ok(()),
                            "" => None,
                            input => make_move(&mut client_state, input),
                        };
                    }
                    _ => {}
                }
            }
            IncomingEvent::Terminal(_) => {}
        }
        while let Some(event) = client_state.next_notable_event() {
            if let NotableEvent::GameStarted = event {
                execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
            }
            if let Some(line) = describe_notable_event(&event) {
                info.push(line);
            }
        }
        render(&mut stdout, &client_state, &keyboard_input, &command_error, &info)?;
    }
    Ok(())
}
