use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use core_smx::common::logging::setup_logging;
use core_smx::{HarvestOptions, HarvestReport, HarvestRequest, HttpFetcher, harvest};

#[derive(Parser)]
#[command(name = "sitemap-links")]
#[command(about = "Harvest and categorize every page URL listed in a website's sitemap(s)", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).multiple(true).args(["website", "sitemap"])))]
struct SitemapCli {
    /// The website root URL; its sitemap is discovered through robots.txt or common paths.
    #[arg(short, long)]
    website: Option<String>,

    /// A direct sitemap URL. Takes precedence over --website and skips discovery.
    #[arg(short, long)]
    sitemap: Option<String>,

    /// How to print the results.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print only this category's links, one per line (e.g. "Products" or "Other Links").
    /// Always plain output, so it cannot be combined with --format.
    #[arg(short, long, conflicts_with = "format")]
    category: Option<String>,

    /// Write the output to this file instead of stdout.
    #[arg(short, long, value_parser = validate_output_file)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Total count, one section per category, then any errors.
    Text,
    /// Every link, one per line.
    Plain,
    /// The full report as JSON.
    Json,
}

fn validate_output_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if path.exists() && path.is_dir() {
        return Err(format!("Output path is a directory: {}", path.display()));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return Err(format!(
            "Output file parent directory does not exist: {}",
            parent.display()
        ));
    }

    Ok(path)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file, if it exists
    dotenvy::dotenv().ok();

    setup_logging("core_smx=info,sitemap_links=info");

    let cli = SitemapCli::parse();

    let options = match HarvestOptions::from_env() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("ERROR: invalid configuration: {}", e);
            std::process::exit(1)
        }
    };

    let request = HarvestRequest::new(cli.website.as_deref(), cli.sitemap.as_deref());
    let report = match run(&request, options).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1)
        }
    };

    let Some(output) = render(&report, cli.format, cli.category.as_deref()) else {
        eprintln!("No URLs to copy.");
        for message in report.errors.all() {
            eprintln!("- {}", message);
        }
        return;
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, format!("{}\n", output.trim_end())) {
                eprintln!("ERROR: Cannot write file ({path:?}) due to: {e:?}");
                std::process::exit(1)
            }
            tracing::info!("Wrote {} links to {:?}", report.urls.len(), path);
        }
        None => println!("{}", output.trim_end()),
    }
}

async fn run(request: &HarvestRequest, options: HarvestOptions) -> core_smx::Result<HarvestReport> {
    let fetcher = HttpFetcher::new(&options)?;
    harvest(fetcher, request, options).await
}

/// Renders the report in the requested format. A category always selects plain output.
fn render(report: &HarvestReport, format: Format, category: Option<&str>) -> Option<String> {
    if category.is_some() {
        return report.render_plain(category);
    }
    match format {
        Format::Text => Some(report.render_text()),
        Format::Plain => report.render_plain(None),
        Format::Json => match report.render_json() {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!("Cannot serialize report: {}", e);
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;
    use core_smx::HarvestError;

    #[test]
    fn test_cli_definition() {
        SitemapCli::command().debug_assert();
    }

    #[test]
    fn test_category_alone_is_accepted() {
        let cli = SitemapCli::try_parse_from(["sitemap-links", "-s", "https://example.com/s.xml", "-c", "Blogs"]).unwrap();
        assert_eq!(cli.category.as_deref(), Some("Blogs"));
        assert_eq!(cli.format, Format::Text);
    }

    #[test]
    fn test_category_conflicts_with_format() {
        for format in ["json", "text", "plain"] {
            let result = SitemapCli::try_parse_from([
                "sitemap-links",
                "-s",
                "https://example.com/s.xml",
                "-c",
                "Blogs",
                "-f",
                format,
            ]);
            assert_eq!(result.err().map(|e| e.kind()), Some(ErrorKind::ArgumentConflict));
        }
    }

    #[test]
    fn test_source_is_required() {
        let result = SitemapCli::try_parse_from(["sitemap-links", "-f", "json"]);
        assert_eq!(result.err().map(|e| e.kind()), Some(ErrorKind::MissingRequiredArgument));
    }

    #[tokio::test]
    async fn test_client_setup_failure_is_a_harvest_error() {
        let options = HarvestOptions::builder()
            .user_agent("bad\nagent".to_string())
            .build();

        let result = run(&HarvestRequest::sitemap("https://example.com/s.xml"), options).await;

        assert!(matches!(result, Err(HarvestError::ClientError(_))));
    }
}
