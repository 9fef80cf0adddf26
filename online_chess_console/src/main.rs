// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod network;
pub mod tui;

mod chess_prelude;
mod client_main;
mod lobby_main;

use clap::{arg, Command};
use online_chess::force::Force;


fn parse_color(name: &str) -> anyhow::Result<Force> {
    Force::from_name(name).ok_or_else(|| anyhow::anyhow!("Unexpected color: {}", name))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Online chess")
        .version(clap::crate_version!())
        .about("Online chess console client")
        .subcommand_required(true)
        .subcommand(
            Command::new("client")
                .about("Join a game as a player or an observer")
                .arg(arg!(<server_address> "Server address, e.g. localhost:8000"))
                .arg(arg!(<game_id> "Game ID"))
                .arg(
                    arg!(--"color" <color> "Color to play; omit to observe")
                        .value_parser(["white", "black"]),
                ),
        )
        .subcommand(
            Command::new("lobby")
                .about("Pick a color in the game lobby and wait for the game to start")
                .arg(arg!(<server_address> "Server address, e.g. localhost:8000"))
                .arg(arg!(<game_id> "Game ID"))
                .arg(
                    arg!(--"play-as" <color> "Color to play")
                        .value_parser(["white", "black"])
                        .required(true),
                )
                .arg(arg!(--"start" "Start the game once the color is chosen")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("client", sub_matches)) => client_main::run(client_main::ClientConfig {
            server_address: required_string(sub_matches, "server_address")?,
            game_id: required_string(sub_matches, "game_id")?,
            my_force: sub_matches
                .get_one::<String>("color")
                .map(|color| parse_color(color))
                .transpose()?,
        }),
        Some(("lobby", sub_matches)) => lobby_main::run(lobby_main::LobbyConfig {
            server_address: required_string(sub_matches, "server_address")?,
            game_id: required_string(sub_matches, "game_id")?,
            play_as: parse_color(&required_string(sub_matches, "play-as")?)?,
            start_game: sub_matches.get_flag("start"),
        }),
        _ => unreachable!(),
    }
}

fn required_string(matches: &clap::ArgMatches, id: &str) -> anyhow::Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing argument: {}", id))
}
