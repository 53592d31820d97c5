use crate::api;
use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::provider::Provider;
use crate::throttle::Throttle;
use anyhow::Result;
use std::sync::Arc;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server { port, frontend_url } => {
            let provider = Provider::new(
                &globals.provider_url,
                globals.provider_key.clone(),
                globals.provider_service_key.clone(),
            )?;

            let throttle = Throttle::new();

            api::new(port, &frontend_url, Arc::new(provider), Arc::new(throttle)).await?;
        }
    }

    Ok(())
}
