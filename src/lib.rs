/*!
# Mixnet API

A Rust implementation of the binary websocket API spoken between an
application and its local mixnet client.

Through it an application can

- learn its own mixnet address,
- send a message anonymously to a recipient, optionally attaching a reply SURB,
- answer a message it received through the attached SURB, without ever
  learning who sent it.

The mix network itself (routing, Sphinx packets, gateways) lives in the mixnet
client and is out of reach of this crate. Everything here is framing:
`networking::request` and `networking::response` encode and decode frames,
`networking::client` carries them over a websocket, and `networking::loopback`
is a stand-in mixnet client for development and tests.

# Usage

```bash
mixnet_api self-address
mixnet_api send --recipient <address> --message hello --with-reply-surb
mixnet_api listen
mixnet_api reply --surb <hex> --message "hello back"
```

*/
pub mod address;
pub mod networking;
pub mod params;
pub mod settings;
pub mod surb;
mod test_setup;
pub mod util;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
