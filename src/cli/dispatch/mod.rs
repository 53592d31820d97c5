use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let provider_url = matches
        .get_one("provider-url")
        .map(|s: &String| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --provider-url"))?;

    let provider_key = matches
        .get_one("provider-key")
        .map(|s: &String| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --provider-key"))?;

    // Table writes and admin calls fall back to the publishable key when no
    // service role key is configured.
    let provider_service_key = matches
        .get_one("provider-service-key")
        .map_or_else(|| provider_key.clone(), |s: &String| s.to_string());

    let mut globals = GlobalArgs::new(provider_url);

    globals.set_keys(
        SecretString::from(provider_key),
        SecretString::from(provider_service_key),
    );

    let action = Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        frontend_url: matches
            .get_one("frontend-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --frontend-url"))?,
    };

    Ok((action, globals))
}
