/*!
# Settings

Both binaries read a config file (`config.toml` unless `--config` names another)
and `MIXNET_*` environment overrides, e.g. `MIXNET_WEBSOCKET__PORT=1978`.

```toml
[websocket]
host = [127, 0, 0, 1]
port = 1977

[protocol]
address_len = 96        # or 97 for the tagged address revision
# reply_surb_len = 988  # pin the SURB length...
# num_mix_hops = 3      # ...or derive it from the hop count

[loopback]
host = [127, 0, 0, 1]
port = 1977
```

Every key is optional.
*/
use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;

use crate::params::{reply_surb_len, WireParams, ADDRESS_LEN, TAGGED_ADDRESS_LEN};
use crate::util::format_url_string;

pub const DEFAULT_CONFIG_NAME: &str = "config";
pub const DEFAULT_HOST: [u8; 4] = [127, 0, 0, 1];
pub const DEFAULT_PORT: u16 = 1977;

/// Loads the named config file (if it exists) and the environment overrides.
pub fn load_config(config_name: &str) -> Result<Config, ConfigError> {
    let mut settings = Config::default();
    settings
        .merge(File::with_name(config_name).required(false))?
        .merge(Environment::with_prefix("MIXNET").separator("__"))?;
    Ok(settings)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSetting {
    pub host: [u8; 4],
    pub port: u16,
}

impl Default for EndpointSetting {
    fn default() -> Self {
        EndpointSetting {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
        }
    }
}

impl EndpointSetting {
    fn from_config(
        settings: &Config,
        section: &str,
        fallback: EndpointSetting,
    ) -> Result<Self, ConfigError> {
        Ok(EndpointSetting {
            host: get_or(settings, &format!("{}.host", section), fallback.host)?,
            port: get_or(settings, &format!("{}.port", section), fallback.port)?,
        })
    }

    pub fn websocket_url(&self) -> String {
        format!("ws://{}", format_url_string(self.host, self.port))
    }
}

/// Where the application finds the mixnet client and how it frames messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint: EndpointSetting,
    pub wire_params: WireParams,
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            endpoint: EndpointSetting::default(),
            wire_params: WireParams::default(),
        }
    }
}

impl ClientSettings {
    pub fn from_config(settings: &Config) -> Result<Self, ConfigError> {
        Ok(ClientSettings {
            endpoint: EndpointSetting::from_config(
                settings,
                "websocket",
                EndpointSetting::default(),
            )?,
            wire_params: wire_params_from_config(settings)?,
        })
    }
}

/// Where the loopback peer listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopbackSettings {
    pub endpoint: EndpointSetting,
    pub wire_params: WireParams,
}

impl LoopbackSettings {
    pub fn from_config(settings: &Config) -> Result<Self, ConfigError> {
        let client = ClientSettings::from_config(settings)?;
        Ok(LoopbackSettings {
            endpoint: EndpointSetting::from_config(settings, "loopback", client.endpoint)?,
            wire_params: client.wire_params,
        })
    }
}

fn wire_params_from_config(settings: &Config) -> Result<WireParams, ConfigError> {
    let address_len = get_or(settings, "protocol.address_len", ADDRESS_LEN)?;
    if address_len != ADDRESS_LEN && address_len != TAGGED_ADDRESS_LEN {
        return Err(ConfigError::Message(format!(
            "protocol.address_len must be {} or {}, got {}",
            ADDRESS_LEN, TAGGED_ADDRESS_LEN, address_len
        )));
    }

    let pinned = get_optional::<usize>(settings, "protocol.reply_surb_len")?;
    let num_mix_hops = get_optional::<u8>(settings, "protocol.num_mix_hops")?;
    let surb_len = match (pinned, num_mix_hops) {
        (Some(len), Some(hops)) if len != reply_surb_len(hops) => {
            return Err(ConfigError::Message(format!(
                "protocol.reply_surb_len {} disagrees with the {} bytes derived for {} hops",
                len,
                reply_surb_len(hops),
                hops
            )))
        }
        (Some(len), _) => Some(len),
        (None, Some(hops)) => Some(reply_surb_len(hops)),
        (None, None) => None,
    };

    Ok(WireParams::new(address_len, surb_len))
}

fn get_optional<T: DeserializeOwned>(
    settings: &Config,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match settings.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

fn get_or<T: DeserializeOwned>(
    settings: &Config,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    Ok(get_optional(settings, key)?.unwrap_or(default))
}
