use std::io::{self, IsTerminal as _};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

const ENV_NAME: &str = "FAIRSWAP_LOG";

fn istty() -> bool {
    io::stderr().is_terminal()
}

/// Creates the env filter from [`ENV_NAME`], falling back to `info` when it is unset or invalid.
fn env_filter() -> EnvFilter {
    return try_parse_env().unwrap_or_else(|| builder().parse_lossy(""));

    fn builder() -> tracing_subscriber::filter::Builder {
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into())
    }

    fn try_parse_env() -> Option<EnvFilter> {
        match std::env::var(ENV_NAME) {
            Ok(env) => match builder().parse(env) {
                Ok(filter) => Some(filter),
                Err(e) => {
                    eprintln!("ignoring invalid {ENV_NAME}: {e}");
                    None
                }
            },
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                eprintln!("ignoring non-unicode {ENV_NAME}");
                None
            }
        }
    }
}

/// Install the global subscriber. Logs go to stderr, leaving stdout to the command output.
pub fn init() -> anyhow::Result<()> {
    let format = fmt::format()
        .with_level(true)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact()
        .with_timer(fmt::time::SystemTime);
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(istty())
        .event_format(format)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
