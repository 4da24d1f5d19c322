//! Localized string dump - resolves strings from the database for one base name
//!
//! Usage:
//!   cargo run -- <location> <base-name> [culture] [key ...]
//!
//! Without keys, every string available for the culture is printed.
//! Output is JSON.
//!
//! Required environment variables:
//! - LOCALIZATION_CONNECTION_STRING (or DATABASE_URL)
//! - LOCALIZATION_TABLE
//! - LOCALIZATION_COLUMN
//!
//! Optional:
//! - LOCALIZATION_RESOURCES_PATH
//! - LOCALIZATION_FILTER_SEGMENTS (defaults to 2)

use anyhow::{bail, Context, Result};
use futures::StreamExt;
use sql_localizer::{Culture, LocalizedString, SqlLocalizationBuilder, StringLocalizer};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sql_localizer=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (location, base_name, culture, keys) = match args.as_slice() {
        [location, base_name, rest @ ..] => {
            let culture = match rest.first() {
                Some(name) => Culture::new(name).context("Invalid culture argument")?,
                None => Culture::invariant(),
            };
            let keys = rest.iter().skip(1).cloned().collect::<Vec<_>>();
            (location, base_name, culture, keys)
        }
        _ => bail!("Usage: sql-localizer <location> <base-name> [culture] [key ...]"),
    };

    let factory = SqlLocalizationBuilder::from_env()?.build();
    let localizer = factory
        .create_from_location(base_name, location)
        .context("Failed to create localizer")?;

    info!(
        base_name = %localizer.base_name(),
        culture = %culture,
        "Resolving localized strings"
    );

    let strings: Vec<LocalizedString> = Culture::scope(culture, async {
        if keys.is_empty() {
            let strings = localizer
                .get_all_strings(false)
                .await
                .context("Failed to load localized strings")?;
            Ok::<_, anyhow::Error>(strings.collect::<Vec<_>>().await)
        } else {
            let mut strings = Vec::with_capacity(keys.len());
            for key in &keys {
                strings.push(localizer.lookup(key).await);
            }
            Ok(strings)
        }
    })
    .await?;

    println!("{}", serde_json::to_string_pretty(&strings)?);

    let report = factory.metrics().report();
    info!(
        hits = report.hits,
        misses = report.misses,
        loads = report.loads,
        "Done"
    );

    Ok(())
}
