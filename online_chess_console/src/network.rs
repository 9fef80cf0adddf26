use std::io;
use std::net::TcpStream;

use serde::{de, Serialize};
use tungstenite::protocol::Role;
use tungstenite::{Message, WebSocket};
use url::Url;


#[derive(Debug)]
pub enum CommunicationError {
    Socket(tungstenite::Error),
    Serde(serde_json::Error),
    Protocol(String),
    ConnectionClosed,
}

impl std::fmt::Display for CommunicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommunicationError::Socket(err) => write!(f, "socket error: {}", err),
            CommunicationError::Serde(err) => write!(f, "malformed message: {}", err),
            CommunicationError::Protocol(message) => write!(f, "protocol error: {}", message),
            CommunicationError::ConnectionClosed => write!(f, "connection closed"),
        }
    }
}

impl std::error::Error for CommunicationError {}

pub fn write_obj<T, S>(socket: &mut WebSocket<S>, obj: &T) -> Result<(), CommunicationError>
where
    T: Serialize,
    S: io::Read + io::Write,
{
    let serialized = serde_json::to_string(obj).map_err(CommunicationError::Serde)?;
    socket.send(Message::text(serialized)).map_err(CommunicationError::Socket)
}

pub fn read_obj<T, S>(socket: &mut WebSocket<S>) -> Result<T, CommunicationError>
where
    T: de::DeserializeOwned,
    S: io::Read + io::Write,
{
    loop {
        match socket.read() {
            Ok(Message::Text(msg)) => {
                return serde_json::from_str(msg.as_str()).map_err(CommunicationError::Serde);
            }
            // Keep-alive traffic is answered by tungstenite itself.
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(Message::Close(_))
            | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                return Err(CommunicationError::ConnectionClosed);
            }
            Ok(msg) => {
                return Err(CommunicationError::Protocol(format!("Expected text, got {:?}", msg)));
            }
            Err(err) => return Err(CommunicationError::Socket(err)),
        }
    }
}

// `server_address` is "host:port"; `path` is a socket path like "/ws/game/chessboard/1/".
pub fn connect(
    server_address: &str, path: &str,
) -> anyhow::Result<(WebSocket<TcpStream>, WebSocket<TcpStream>)> {
    let url = Url::parse(&format!("ws://{}", server_address))?.join(path)?;
    let host = url.host_str().ok_or_else(|| anyhow::anyhow!("No host in {}", url))?;
    let port = url.port_or_known_default().ok_or_else(|| anyhow::anyhow!("No port in {}", url))?;
    log::info!("Connecting to {}...", url);
    let stream = TcpStream::connect((host, port))?;
    let (socket_in, _) = tungstenite::client(url.as_str(), stream)
        .map_err(|err| anyhow::anyhow!("WebSocket handshake with {} failed: {}", url, err))?;
    let socket_out = clone_websocket(&socket_in, Role::Client)?;
    Ok((socket_in, socket_out))
}

// TODO: Instead of cloning the socket, consider calling TcpStream.set_nonblocking on the
//   underlying stream and doing read/writes in the same thread.
pub fn clone_websocket(
    socket: &WebSocket<TcpStream>, role: Role,
) -> io::Result<WebSocket<TcpStream>> {
    let stream = socket.get_ref().try_clone()?;
    let config = *socket.get_config();
    Ok(WebSocket::from_raw_socket(stream, role, Some(config)))
}
