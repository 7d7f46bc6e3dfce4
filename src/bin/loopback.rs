/*!
# Mixnet Loopback

Serves the mixnet client API without a mix network behind it. Messages sent to
the loopback address come straight back, which is enough to develop and test
applications against.

```bash
mixnet_loopback --config config
```
*/
use clap::{App, Arg};
use mixnet_api::{
    networking::{loopback, signals::signal_for_shutdown},
    settings::{load_config, LoopbackSettings, DEFAULT_CONFIG_NAME},
};

#[tokio::main]
pub async fn main() -> mixnet_api::Result<()> {
    tracing_subscriber::fmt::init();

    let matches = App::new("Mixnet Loopback")
        .about("Runs a stand-in mixnet client which loops messages back to the sender")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("config file name"),
        )
        .get_matches();

    let config_name = matches.value_of("config").unwrap_or(DEFAULT_CONFIG_NAME);
    let settings = LoopbackSettings::from_config(&load_config(config_name)?)?;

    loopback::run_loopback(settings, signal_for_shutdown()).await
}
