use std::sync::Arc;

use anyhow::bail;
use anyhow::Context;
use auth::SystemClock;
use session_service::config::Config;
use session_service::domain::session::models::UserId;
use session_service::domain::session::refresh::RefreshTokenService;
use session_service::outbound::repositories;
use session_service::outbound::repositories::PostgresRefreshTokenRepository;
use session_service::telemetry;

const USAGE: &str = "usage: session-admin <migrate | reset | revoke TOKEN | revoke-user USER_ID | reap-expired>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Migrate,
    Reset,
    Revoke(String),
    RevokeUser(UserId),
    ReapExpired,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Migrate => "migrate",
            Command::Reset => "reset",
            Command::Revoke(_) => "revoke",
            Command::RevokeUser(_) => "revoke-user",
            Command::ReapExpired => "reap-expired",
        }
    }
}

fn parse_command<I>(mut args: I) -> Result<Command, anyhow::Error>
where
    I: Iterator<Item = String>,
{
    let command = match args.next().as_deref() {
        Some("migrate") => Command::Migrate,
        Some("reset") => Command::Reset,
        Some("revoke") => Command::Revoke(args.next().context(USAGE)?),
        Some("revoke-user") => {
            let raw = args.next().context(USAGE)?;
            Command::RevokeUser(UserId::from_string(&raw)?)
        }
        Some("reap-expired") => Command::ReapExpired,
        _ => bail!(USAGE),
    };

    if args.next().is_some() {
        bail!(USAGE);
    }

    Ok(command)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    telemetry::init_tracing(telemetry::DEFAULT_FILTER);

    let command = parse_command(std::env::args().skip(1))?;
    let config = Config::load()?;

    tracing::info!(
        platform = %config.platform,
        command = command.name(),
        "Configuration loaded"
    );

    let pg_pool = repositories::connect(&config.database).await?;

    if command == Command::Migrate {
        repositories::migrate(&pg_pool).await?;
        return Ok(());
    }

    let settings = config.session_settings()?;
    let refresh_tokens = RefreshTokenService::new(
        Arc::new(PostgresRefreshTokenRepository::new(pg_pool)),
        Arc::new(SystemClock),
        settings.refresh_token_ttl,
        settings.store_timeout,
    );

    match command {
        Command::Reset => {
            if !config.is_dev_platform() {
                bail!("reset is only allowed when platform is \"dev\"");
            }
            refresh_tokens.reset().await?;
        }
        Command::Revoke(token) => refresh_tokens.revoke(&token).await?,
        Command::RevokeUser(user_id) => {
            refresh_tokens.revoke_all_for_user(&user_id).await?;
        }
        Command::ReapExpired => {
            refresh_tokens.reap_expired().await?;
        }
        Command::Migrate => {}
    }

    Ok(())
}
