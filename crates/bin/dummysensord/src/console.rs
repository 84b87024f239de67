//! Console host adapter: drives accessories from line commands.
//!
//! Reads one command per line and writes one reply per command. Host events
//! (characteristic changes) are printed as they arrive.
//!
//! | Command | Effect |
//! |---------|--------|
//! | `list` | one line per accessory |
//! | `info <name>` | accessory information |
//! | `get <name>` | switch value |
//! | `sensor <name>` | sensor reading |
//! | `set <name> on\|off` | write the switch |
//! | `turn_on <name>` / `turn_off <name>` / `toggle <name>` | service calls |
//! | `help` | command summary |

use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;

use dummysensor_app::ports::AccessoryService;
use dummysensor_app::services::registry::AccessoryRegistry;
use dummysensor_domain::event::HostEvent;

const HELP: &str = "commands: list | info <name> | get <name> | sensor <name> | \
                    set <name> on|off | turn_on <name> | turn_off <name> | toggle <name>";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Help,
    Info(String),
    Get(String),
    Sensor(String),
    Set(String, bool),
    Service { service: String, name: String },
}

/// Why a console line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("missing accessory name")]
    MissingName,
    #[error("expected on or off, got {0:?}")]
    InvalidSwitchValue(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        let name = || {
            if rest.is_empty() {
                Err(ParseError::MissingName)
            } else {
                Ok(rest.to_string())
            }
        };

        match verb {
            "" => Err(ParseError::Empty),
            "list" => Ok(Self::List),
            "help" => Ok(Self::Help),
            "info" => Ok(Self::Info(name()?)),
            "get" => Ok(Self::Get(name()?)),
            "sensor" => Ok(Self::Sensor(name()?)),
            "set" => {
                let (name, value) = rest
                    .rsplit_once(char::is_whitespace)
                    .ok_or(ParseError::MissingName)?;
                let on = match value {
                    "on" | "true" | "1" => true,
                    "off" | "false" | "0" => false,
                    other => return Err(ParseError::InvalidSwitchValue(other.to_string())),
                };
                Ok(Self::Set(name.trim().to_string(), on))
            }
            "turn_on" | "turn_off" | "toggle" => Ok(Self::Service {
                service: verb.to_string(),
                name: name()?,
            }),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

/// Execute one command line against the registry and return the reply.
pub fn execute<C: AccessoryService>(registry: &AccessoryRegistry<C>, line: &str) -> String {
    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(err) => return format!("error: {err}"),
    };

    let reply = match command {
        Command::Help => Ok(HELP.to_string()),
        Command::List => Ok(registry
            .accessories()
            .iter()
            .map(|accessory| {
                format!(
                    "{} ({}) switch={} sensor={}",
                    accessory.name(),
                    accessory.sensor_kind(),
                    on_off(accessory.inner().get_switch()),
                    accessory.inner().get_sensor_reading(),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
        Command::Info(name) => registry.find_by_name(&name).map(|accessory| {
            let info = accessory.information();
            format!(
                "{}: manufacturer={} model={} firmware={} serial={}",
                accessory.name(),
                info.manufacturer,
                info.model,
                info.firmware_revision,
                info.serial_number,
            )
        }),
        Command::Get(name) => registry.find_by_name(&name).map(|accessory| {
            format!(
                "{}: switch {}",
                accessory.name(),
                on_off(accessory.get_switch())
            )
        }),
        Command::Sensor(name) => registry.find_by_name(&name).map(|accessory| {
            format!(
                "{}: {} {}",
                accessory.name(),
                accessory.sensor_kind().characteristic(),
                accessory.get_sensor_reading()
            )
        }),
        Command::Set(name, on) => registry.find_by_name(&name).and_then(|accessory| {
            accessory.set_switch(on)?;
            Ok(format!("{}: switch {}", accessory.name(), on_off(on)))
        }),
        Command::Service { service, name } => {
            registry.find_by_name(&name).and_then(|accessory| {
                let on = accessory.handle_service_call(&service)?;
                Ok(format!("{}: switch {}", accessory.name(), on_off(on)))
            })
        }
    };

    reply.unwrap_or_else(|err| {
        tracing::debug!(%line, error = %err, "console command failed");
        let mut message = format!("error: {err}");
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    })
}

/// Render a host event as a console line.
#[must_use]
pub fn format_event(event: &HostEvent) -> String {
    format!(
        "event: {} {:?}.{} = {}",
        event.accessory, event.service, event.characteristic, event.value
    )
}

/// Serve commands from `input` until it is exhausted, echoing host events.
///
/// # Errors
///
/// Returns any IO error from reading `input` or writing `output`.
pub async fn run<C, R, W>(
    registry: &AccessoryRegistry<C>,
    mut events: broadcast::Receiver<HostEvent>,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    C: AccessoryService,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut events_open = true;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let reply = execute(registry, &line);
                output.write_all(reply.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
            event = events.recv(), if events_open => match event {
                Ok(event) => {
                    output.write_all(format_event(&event).as_bytes()).await?;
                    output.write_all(b"\n").await?;
                    output.flush().await?;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "console fell behind host events");
                }
                Err(broadcast::error::RecvError::Closed) => events_open = false,
            },
        }
    }

    Ok(())
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use dummysensor_app::memory_store::InMemoryStateStore;
    use dummysensor_app::notifier::InProcessNotifier;
    use dummysensor_app::services::accessory::Accessory;
    use dummysensor_app::services::sensor_switch::SensorSwitch;
    use dummysensor_domain::sensor::SensorKind;

    use super::*;

    type Controller = SensorSwitch<InMemoryStateStore, InProcessNotifier>;

    fn registry(notifier: &Arc<InProcessNotifier>) -> AccessoryRegistry<Controller> {
        let store = Arc::new(InMemoryStateStore::default());
        let mut registry = AccessoryRegistry::new();
        for (name, kind) in [("Front Door", SensorKind::Contact), ("Basement", SensorKind::Leak)] {
            registry
                .register(Accessory::new(SensorSwitch::new(
                    name,
                    kind,
                    Duration::from_millis(1000),
                    Arc::clone(&store),
                    Arc::clone(notifier),
                )))
                .unwrap();
        }
        registry
    }

    #[test]
    fn should_parse_commands() {
        assert_eq!("list".parse::<Command>().unwrap(), Command::List);
        assert_eq!(
            "get Front Door".parse::<Command>().unwrap(),
            Command::Get("Front Door".to_string())
        );
        assert_eq!(
            "set Front Door on".parse::<Command>().unwrap(),
            Command::Set("Front Door".to_string(), true)
        );
        assert_eq!(
            "  toggle Basement ".parse::<Command>().unwrap(),
            Command::Service {
                service: "toggle".to_string(),
                name: "Basement".to_string()
            }
        );
    }

    #[test]
    fn should_reject_malformed_commands() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!("get".parse::<Command>(), Err(ParseError::MissingName));
        assert_eq!("set Door".parse::<Command>(), Err(ParseError::MissingName));
        assert_eq!("set".parse::<Command>(), Err(ParseError::MissingName));
        assert_eq!(
            "set Door maybe".parse::<Command>(),
            Err(ParseError::InvalidSwitchValue("maybe".to_string()))
        );
        assert_eq!(
            "reboot Door".parse::<Command>(),
            Err(ParseError::Unknown("reboot".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_execute_switch_commands() {
        let notifier = Arc::new(InProcessNotifier::new(32));
        let registry = registry(&notifier);

        assert_eq!(execute(&registry, "get Front Door"), "Front Door: switch off");
        assert_eq!(execute(&registry, "set Front Door on"), "Front Door: switch on");
        assert_eq!(execute(&registry, "get Front Door"), "Front Door: switch on");
        assert_eq!(
            execute(&registry, "sensor Front Door"),
            "Front Door: ContactSensorState CONTACT_DETECTED"
        );

        tokio::time::advance(Duration::from_millis(1000)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            execute(&registry, "sensor Front Door"),
            "Front Door: ContactSensorState CONTACT_NOT_DETECTED"
        );
    }

    #[tokio::test]
    async fn should_execute_service_calls() {
        let notifier = Arc::new(InProcessNotifier::new(32));
        let registry = registry(&notifier);
        assert_eq!(execute(&registry, "toggle Basement"), "Basement: switch on");
        assert_eq!(execute(&registry, "turn_off Basement"), "Basement: switch off");
    }

    #[tokio::test]
    async fn should_report_errors() {
        let notifier = Arc::new(InProcessNotifier::new(32));
        let registry = registry(&notifier);
        assert_eq!(
            execute(&registry, "get Window"),
            "error: not found: Accessory Window not found"
        );
        assert!(execute(&registry, "dance").starts_with("error: unknown command"));
        assert_eq!(
            execute(&registry, "toggle_twice Basement"),
            "error: unknown command \"toggle_twice\""
        );
    }

    #[tokio::test]
    async fn should_list_and_describe_accessories() {
        let notifier = Arc::new(InProcessNotifier::new(32));
        let registry = registry(&notifier);
        assert_eq!(
            execute(&registry, "list"),
            "Basement (leak) switch=off sensor=LEAK_NOT_DETECTED\n\
             Front Door (contact) switch=off sensor=CONTACT_DETECTED"
        );
        assert!(execute(&registry, "info Front Door").ends_with("serial=Dummy-Front-Door"));
    }

    #[tokio::test]
    async fn should_serve_commands_until_input_ends() {
        let notifier = Arc::new(InProcessNotifier::new(32));
        let registry = registry(&notifier);
        let events = notifier.subscribe();

        let input = tokio::io::BufReader::new(&b"set Basement on\n\nget Basement\n"[..]);
        let mut output = Vec::new();
        run(&registry, events, input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Basement: switch on\n"));
        assert!(!output.contains("error"));
    }
}
