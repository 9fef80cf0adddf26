// Pre-game lobby: players pick a color, then one of them starts the game and everybody is
// redirected to the game page.

use std::collections::VecDeque;
use std::sync::mpsc;

use log::info;

use crate::event::{LobbyClientEvent, LobbyServerEvent, LobbySetup};
use crate::force::Force;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LobbyNotableEvent {
    SetupUpdated,
    StartGame(String), // game page URL
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LobbyCommandError {
    Disconnected,
}

pub struct LobbyState {
    events_tx: mpsc::Sender<LobbyClientEvent>,
    play_as: Option<Force>,
    setup: Option<LobbySetup>,
    notable_event_queue: VecDeque<LobbyNotableEvent>,
}

impl LobbyState {
    pub fn new(events_tx: mpsc::Sender<LobbyClientEvent>) -> Self {
        LobbyState {
            events_tx,
            play_as: None,
            setup: None,
            notable_event_queue: VecDeque::new(),
        }
    }

    pub fn setup(&self) -> Option<&LobbySetup> { self.setup.as_ref() }
    pub fn my_choice(&self) -> Option<Force> { self.play_as }

    pub fn nick(&self, force: Force) -> Option<&str> {
        let setup = self.setup.as_ref()?;
        let nick = match force {
            Force::White => &setup.white_player_nick,
            Force::Black => &setup.black_player_nick,
        };
        (!nick.is_empty()).then_some(nick.as_str())
    }

    pub fn play_as(&mut self, force: Force) -> Result<(), LobbyCommandError> {
        self.play_as = Some(force);
        self.send(LobbyClientEvent { play_as: Some(force), start_game: false })
    }

    pub fn start_game(&mut self) -> Result<(), LobbyCommandError> {
        self.send(LobbyClientEvent { play_as: None, start_game: true })
    }

    pub fn process_server_event(&mut self, event: LobbyServerEvent) {
        if let Some(setup) = event.setup {
            self.setup = Some(setup);
            self.notable_event_queue.push_back(LobbyNotableEvent::SetupUpdated);
        }
        if let Some(url) = event.start_game_url {
            info!("Game started at {}", url);
            self.notable_event_queue.push_back(LobbyNotableEvent::StartGame(url));
        }
    }

    pub fn next_notable_event(&mut self) -> Option<LobbyNotableEvent> {
        self.notable_event_queue.pop_front()
    }

    fn send(&self, event: LobbyClientEvent) -> Result<(), LobbyCommandError> {
        self.events_tx.send(event).map_err(|_| LobbyCommandError::Disconnected)
    }
}
