use std::sync::mpsc;

use log::{info, warn};

use crate::chess_prelude::*;
use crate::network;


pub struct LobbyConfig {
    pub server_address: String,
    pub game_id: String,
    pub play_as: Force,
    pub start_game: bool,
}

fn describe_setup(lobby: &LobbyState) -> String {
    let nick = |force| lobby.nick(force).unwrap_or("<free>").to_owned();
    format!("white: {}, black: {}", nick(Force::White), nick(Force::Black))
}

// Blocks until the server announces the game page, then prints its URL.
pub fn run(config: LobbyConfig) -> anyhow::Result<()> {
    let (mut socket_in, mut socket_out) =
        network::connect(&config.server_address, &lobby_socket_path(&config.game_id))?;
    let (server_tx, server_rx) = mpsc::channel();
    let mut lobby = LobbyState::new(server_tx);

    lobby.play_as(config.play_as).map_err(|err| anyhow::anyhow!("{:?}", err))?;
    if config.start_game {
        lobby.start_game().map_err(|err| anyhow::anyhow!("{:?}", err))?;
    }
    for event in server_rx.try_iter() {
        network::write_obj(&mut socket_out, &event)?;
    }

    loop {
        let event: LobbyServerEvent = match network::read_obj(&mut socket_in) {
            Ok(event) => event,
            Err(network::CommunicationError::ConnectionClosed) => {
                warn!("Lobby closed before the game started");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        lobby.process_server_event(event);
        while let Some(event) = lobby.next_notable_event() {
            match event {
                LobbyNotableEvent::SetupUpdated => info!("Lobby: {}", describe_setup(&lobby)),
                LobbyNotableEvent::StartGame(url) => {
                    println!("Game started: {}", url);
                    return Ok(());
                }
            }
        }
    }
}
