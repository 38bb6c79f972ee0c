use crate::cli::ApiCommand;
use crate::output;
use keyward_api::ApplicationCreate;
use keyward_client::{ApiError, ApplicationClient, CancelHandle, Transport};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Run one API command and render its result
///
/// Every request is tied to `interrupt`, so cancelling it stops whatever call
/// is in flight.
pub async fn run<T: Transport>(
    client: &ApplicationClient<T>,
    command: &ApiCommand,
    format: OutputFormat,
    interrupt: &CancelHandle,
) -> Result<String, ApiError> {
    match command {
        ApiCommand::Create { name } => {
            let app = client
                .create(&ApplicationCreate::new(name.clone()))
                .cancel_with(interrupt)
                .await?;
            info!("Created application {} ({})", app.name, app.id);
            render(format, &app, output::application)
        }
        ApiCommand::Info { application_id } => {
            let app = client.info(application_id).cancel_with(interrupt).await?;
            render(format, &app, output::application)
        }
        ApiCommand::Delete { application_id } => {
            let ack = client.delete(application_id).cancel_with(interrupt).await?;
            info!("Deleted application {}", application_id);
            render(format, &ack, output::message)
        }
        ApiCommand::Token { application_id } => {
            let token = client.token(application_id).cancel_with(interrupt).await?;
            render(format, &token, output::token)
        }
        ApiCommand::List { page, user, all } => {
            let mut pages = Vec::new();
            let mut next = Some(*page);

            // Next page is derived from the requested number; a reply for any
            // other page ends the walk.
            while let Some(number) = next {
                let current = client
                    .list(&number.to_string(), user)
                    .cancel_with(interrupt)
                    .await?;

                if *all && current.page != number {
                    warn!(
                        "Asked for page {} but the server answered with page {}, stopping",
                        number, current.page
                    );
                    break;
                }

                next = (*all && number < current.pages).then_some(number + 1);
                pages.push(current);
            }

            if *all {
                render(format, &pages, |pages| output::pages(pages))
            } else {
                render(format, &pages[0], output::page)
            }
        }
    }
}

fn render<V, F>(format: OutputFormat, value: &V, text: F) -> Result<String, ApiError>
where
    V: Serialize + ?Sized,
    F: FnOnce(&V) -> String,
{
    match format {
        OutputFormat::Text => Ok(text(value)),
        OutputFormat::Json => serde_json::to_string_pretty(value).map_err(ApiError::Serialize),
    }
}
