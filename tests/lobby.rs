use std::sync::mpsc;

use online_chess::event::{LobbyClientEvent, LobbyServerEvent, LobbySetup};
use online_chess::force::Force;
use online_chess::lobby::{LobbyCommandError, LobbyNotableEvent, LobbyState};
use pretty_assertions::assert_eq;


#[test]
fn choose_color_and_start() {
    let (tx, rx) = mpsc::channel();
    let mut lobby = LobbyState::new(tx);
    lobby.play_as(Force::Black).unwrap();
    lobby.start_game().unwrap();
    assert_eq!(lobby.my_choice(), Some(Force::Black));
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![
        LobbyClientEvent { play_as: Some(Force::Black), start_game: false },
        LobbyClientEvent { play_as: None, start_game: true },
    ]);
}

#[test]
fn setup_and_redirect() {
    let (tx, _rx) = mpsc::channel();
    let mut lobby = LobbyState::new(tx);
    assert_eq!(lobby.nick(Force::White), None);

    let event: LobbyServerEvent = serde_json::from_str(
        r#"{"setup": {"white_player_nick": "alice", "black_player_nick": ""}}"#,
    )
    .unwrap();
    lobby.process_server_event(event);
    assert_eq!(lobby.next_notable_event(), Some(LobbyNotableEvent::SetupUpdated));
    assert_eq!(lobby.next_notable_event(), None);
    assert_eq!(lobby.nick(Force::White), Some("alice"));
    assert_eq!(lobby.nick(Force::Black), None);
    assert_eq!(
        lobby.setup(),
        Some(&LobbySetup {
            white_player_nick: "alice".to_owned(),
            black_player_nick: String::new(),
        })
    );

    lobby.process_server_event(LobbyServerEvent {
        start_game_url: Some("/game/chessboard/42/".to_owned()),
        ..LobbyServerEvent::default()
    });
    assert_eq!(
        lobby.next_notable_event(),
        Some(LobbyNotableEvent::StartGame("/game/chessboard/42/".to_owned()))
    );
}

#[test]
fn closed_channel() {
    let (tx, rx) = mpsc::channel();
    let mut lobby = LobbyState::new(tx);
    drop(rx);
    assert_eq!(lobby.start_game(), Err(LobbyCommandError::Disconnected));
}
