use clap::Parser;
use cms_gateway::utils::{logger, validation::Validate};
use cms_gateway::{CmsConfig, CmsFactory, CmsKind, PublishState};

/// Fetches content from the configured CMS and prints the normalized JSON.
/// Handy for inspecting what the rendering layer will actually receive.
#[derive(Debug, Parser)]
#[command(name = "cms-gateway")]
#[command(about = "Fetch normalized content from the configured CMS")]
struct Cli {
    /// CMS backend; defaults to the CMS_TYPE environment variable
    #[arg(long)]
    provider: Option<CmsKind>,

    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    api_token: Option<String>,

    /// Contentful space id or Sanity project id
    #[arg(long)]
    space_id: Option<String>,

    /// Sanity dataset
    #[arg(long)]
    dataset: Option<String>,

    /// Storyblok content version (draft or published)
    #[arg(long)]
    version: Option<PublishState>,

    #[arg(long, default_value = "en")]
    locale: String,

    /// Page slug to fetch; omit for the home page
    #[arg(long)]
    slug: Option<String>,

    /// Fetch general (header/footer) data instead of a page
    #[arg(long)]
    general: bool,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_logger(cli.verbose);

    let mut config = CmsConfig::from_env().unwrap_or_else(|e| {
        tracing::error!("Invalid environment configuration: {}", e);
        std::process::exit(1);
    });

    if let Some(provider) = cli.provider {
        config.kind = provider;
    }
    if cli.base_url.is_some() {
        config.base_url = cli.base_url;
    }
    if cli.api_token.is_some() {
        config.api_token = cli.api_token;
    }
    if cli.space_id.is_some() {
        config.space_id = cli.space_id;
    }
    if cli.dataset.is_some() {
        config.dataset = cli.dataset;
    }
    if let Some(version) = cli.version {
        config.version = version;
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("Using {} CMS", config.kind);

    let factory = match CmsFactory::from_config(&config) {
        Ok(factory) => factory,
        Err(e) => {
            tracing::error!("CMS initialization failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if cli.general {
        match factory.general_data(&cli.locale).await {
            Some(general) => println!("{}", serde_json::to_string_pretty(&general)?),
            None => {
                eprintln!("No general data for locale {}", cli.locale);
                std::process::exit(2);
            }
        }
        return Ok(());
    }

    let page = match &cli.slug {
        Some(slug) => factory.page_by_slug(slug, &cli.locale).await,
        None => factory.home_page(&cli.locale).await,
    };

    match page {
        Some(page) => println!("{}", serde_json::to_string_pretty(&page)?),
        None => {
            eprintln!(
                "No page for slug {} in locale {}",
                cli.slug.as_deref().unwrap_or("home"),
                cli.locale
            );
            std::process::exit(2);
        }
    }

    Ok(())
}
