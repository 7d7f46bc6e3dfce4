/*!
# Mixnet API Command Line Interface

Talks to the local mixnet client over its binary websocket API.

## Help

```bash
mixnet_api help
```

## Example Usage

```bash
mixnet_api self-address
mixnet_api send --recipient <address printed by self-address> --message hello --with-reply-surb
mixnet_api listen --count 1
mixnet_api reply --surb <hex> --message "hello back"
```

## Dev

To try it without a mixnet, run the loopback peer in another terminal:

```bash
cargo run --bin mixnet_loopback
cargo run -- self-address
```
*/
use clap::{App, AppSettings, Arg, ArgMatches};
use mixnet_api::{
    address::Address,
    networking::client::MixnetClient,
    networking::response::ReceivedMessage,
    settings::{load_config, ClientSettings, DEFAULT_CONFIG_NAME},
    surb::ReplySurb,
};
use tracing::{event, Level};

#[tokio::main]
pub async fn main() -> mixnet_api::Result<()> {
    tracing_subscriber::fmt::init();

    let command_matches = cli().get_matches();
    let settings = ClientSettings::from_config(&load_config(config_name(&command_matches))?)?;

    let mut client = MixnetClient::connect(&settings).await?;

    if command_matches.subcommand_matches("self-address").is_some() {
        println!("{}", client.self_address().await?);
    }
    if let Some(matches) = command_matches.subcommand_matches("send") {
        // the configured layout decides how many address bytes go on the wire
        let recipient =
            Address::parse_with(required_value(matches, "recipient")?, &settings.wire_params)?;
        let message = required_value(matches, "message")?;
        client
            .send(
                recipient,
                message.as_bytes().to_vec(),
                matches.is_present("with_reply_surb"),
            )
            .await?;
        event!(Level::INFO, "sent {} byte message", message.len());
    }
    if let Some(matches) = command_matches.subcommand_matches("reply") {
        let reply_surb = ReplySurb::from_hex(required_value(matches, "surb")?)?;
        let message = required_value(matches, "message")?;
        client.reply(reply_surb, message.as_bytes().to_vec()).await?;
        event!(Level::INFO, "sent {} byte reply", message.len());
    }
    if let Some(matches) = command_matches.subcommand_matches("listen") {
        let count: Option<usize> = match matches.value_of("count") {
            Some(count) => Some(count.parse()?),
            None => None,
        };
        let mut received_count = 0;
        while count.map_or(true, |count| received_count < count) {
            print_received(&client.next_message().await?);
            received_count += 1;
        }
    }

    client.close().await?;
    Ok(())
}

fn cli() -> App<'static, 'static> {
    App::new("Mixnet API Command Line Interface")
        .about("Send and receive anonymous messages through the local mixnet client")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .global(true)
                .help("config file name"),
        )
        .subcommand(App::new("self-address").about("prints our own mixnet address"))
        .subcommand(
            App::new("send")
                .about("sends a message through the mix network")
                .arg(
                    Arg::with_name("recipient")
                        .short("r")
                        .long("recipient")
                        .required(true)
                        .takes_value(true)
                        .help("recipient address as printed by self-address"),
                )
                .arg(
                    Arg::with_name("message")
                        .short("m")
                        .long("message")
                        .required(true)
                        .takes_value(true)
                        .help("message to send"),
                )
                .arg(
                    Arg::with_name("with_reply_surb")
                        .short("s")
                        .long("with-reply-surb")
                        .help("attach a reply SURB so the recipient can answer"),
                ),
        )
        .subcommand(
            App::new("reply")
                .about("answers a received message through its reply SURB")
                .arg(
                    Arg::with_name("surb")
                        .short("s")
                        .long("surb")
                        .required(true)
                        .takes_value(true)
                        .help("hex encoded reply SURB, as printed by listen"),
                )
                .arg(
                    Arg::with_name("message")
                        .short("m")
                        .long("message")
                        .required(true)
                        .takes_value(true)
                        .help("reply to send"),
                ),
        )
        .subcommand(
            App::new("listen")
                .about("prints messages delivered to us")
                .arg(
                    Arg::with_name("count")
                        .short("n")
                        .long("count")
                        .takes_value(true)
                        .help("stop after this many messages"),
                ),
        )
}

/// `--config` may come before or after the subcommand.
fn config_name<'a>(command_matches: &'a ArgMatches) -> &'a str {
    command_matches
        .value_of("config")
        .or_else(|| {
            command_matches
                .subcommand()
                .1
                .and_then(|matches| matches.value_of("config"))
        })
        .unwrap_or(DEFAULT_CONFIG_NAME)
}

fn required_value<'a>(matches: &'a ArgMatches, name: &str) -> mixnet_api::Result<&'a str> {
    matches
        .value_of(name)
        .ok_or_else(|| format!("missing --{}", name).into())
}

fn print_received(received: &ReceivedMessage) {
    println!("message    : {}", String::from_utf8_lossy(&received.message));
    if let Some(reply_surb) = &received.reply_surb {
        println!("reply surb : {}", reply_surb.to_hex());
    }
}
