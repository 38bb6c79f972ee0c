//! Plain-text rendering for command results.

use chrono::{DateTime, Utc};
use keyward_api::{ApplicationData, ApplicationPage, MessageResponse, TokenResponse};
use keyward_client::ApiError;

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn last_use(app: &ApplicationData) -> String {
    app.last_use
        .as_ref()
        .map_or_else(|| "never".to_string(), timestamp)
}

#[must_use]
pub fn application(app: &ApplicationData) -> String {
    format!(
        "Application {}\n  id:       {}\n  owner:    {}\n  created:  {}\n  last use: {}",
        app.name,
        app.id,
        app.user_id,
        timestamp(&app.created),
        last_use(app)
    )
}

/// Table of one page, with a page footer
#[must_use]
pub fn page(page: &ApplicationPage) -> String {
    let mut out = table(&page.items);
    out.push_str(&format!("\npage {} of {}", page.page, page.pages.max(1)));
    out
}

#[must_use]
pub fn pages(pages: &[ApplicationPage]) -> String {
    let items: Vec<ApplicationData> = pages.iter().flat_map(|p| p.items.clone()).collect();
    let mut out = table(&items);
    out.push_str(&format!("\n{} application(s)", items.len()));
    out
}

fn table(items: &[ApplicationData]) -> String {
    if items.is_empty() {
        return "No applications".to_string();
    }

    let rows: Vec<[String; 4]> = items
        .iter()
        .map(|app| {
            [
                app.id.clone(),
                app.name.clone(),
                timestamp(&app.created),
                last_use(app),
            ]
        })
        .collect();

    let headers = ["ID", "NAME", "CREATED", "LAST USE"];
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: [&str; 4]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = line(headers);
    for row in &rows {
        out.push('\n');
        out.push_str(&line([&row[0], &row[1], &row[2], &row[3]]));
    }
    out
}

#[must_use]
pub fn message(message: &MessageResponse) -> String {
    message.message.clone()
}

/// Just the token, so the output can be piped
#[must_use]
pub fn token(token: &TokenResponse) -> String {
    token.token.clone()
}

/// One-line explanation of a failed command
#[must_use]
pub fn failure(error: &ApiError) -> String {
    match (error.description(), error.server_message()) {
        (Some(description), Some(server)) => format!("{description}: {}", server.message),
        (Some(description), None) => description.to_string(),
        (None, Some(server)) => format!("{error}: {}", server.message),
        (None, None) => error.to_string(),
    }
}
