use std::time::Duration;

use clap::Parser;
use contact_book::{
    client::{self, ClientConfig},
    telemetry,
};

/// Terminal client for the contacts API.
#[derive(Debug, Parser)]
#[command(name = "contact-book", version, about)]
struct Args {
    /// Base URL of the contacts API
    #[arg(long, env = "CONTACTS_API_URL", default_value = client::DEFAULT_API_URL)]
    api_url: String,

    /// Contacts per page
    #[arg(long, default_value_t = client::DEFAULT_PAGE_LIMIT, value_parser = clap::value_parser!(i64).range(1..))]
    limit: i64,

    /// Seconds a status banner stays visible
    #[arg(long, default_value_t = 3)]
    banner_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // stdout belongs to the rendered view
    telemetry::init(std::io::stderr);

    let args = Args::parse();
    let config = ClientConfig {
        api_url: args.api_url,
        page_limit: args.limit,
        banner_ttl: Duration::from_secs(args.banner_secs),
    };

    tracing::info!(api_url = %config.api_url, "starting contact book");
    client::runtime::run(config).await
}
