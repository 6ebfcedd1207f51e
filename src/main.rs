//! Fundgrube CLI - Browse MediaMarkt and SATURN clearance listings
//!
//! Thin front end over the library: parses arguments, builds clients and
//! prints results as text or JSON.

use clap::Parser;
use serde::Serialize;

use fundgrube::cli::{Cli, CliError, Command, DiscountsArgs, PostingsArgs};
use fundgrube::report::{
    best_deals, collect_postings, discount_counts, format_posting_line, DISCOUNT_THRESHOLDS,
};
use fundgrube::{Facet, Fundgrube, Retailer};

type BoxError = Box<dyn std::error::Error>;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints `name (count)` lines, or the records as JSON
fn print_facets<T: Facet + Serialize>(facets: &[T], top: Option<usize>, json: bool) -> Result<(), BoxError> {
    let shown = &facets[..top.unwrap_or(facets.len()).min(facets.len())];
    if json {
        return print_json(shown);
    }
    for facet in shown {
        println!("{} ({})", facet.name(), facet.count());
    }
    Ok(())
}

async fn run_postings(cli: &Cli, client: &Fundgrube, args: &PostingsArgs) -> Result<(), BoxError> {
    let mut outlet_ids = Vec::new();
    if let Some(name) = &args.outlet {
        let outlet = client
            .outlet(name)
            .await?
            .ok_or_else(|| CliError::OutletNotFound(name.clone()))?;
        outlet_ids.push(outlet.id);
    }

    let page = client.postings(&args.to_query(&outlet_ids)).await?;
    if cli.json {
        return print_json(&page.postings);
    }

    println!("{}", page.url);
    for posting in &page.postings {
        println!("{}", format_posting_line(posting));
    }
    if page.more_available {
        println!("(more postings available)");
    }
    Ok(())
}

async fn run_discounts(cli: &Cli, args: &DiscountsArgs) -> Result<(), BoxError> {
    let clients: Vec<Fundgrube> = Retailer::all()
        .into_iter()
        .map(|retailer| Fundgrube::with_config(cli.client_config_for(retailer)))
        .collect();

    let postings = collect_postings(&clients, &args.to_query(), args.pacing()).await?;
    let deals = best_deals(&postings, args.min_discount);

    if cli.json {
        return print_json(&deals);
    }

    println!("Postings fetched: {}", postings.len());
    for (threshold, count) in discount_counts(&postings, &DISCOUNT_THRESHOLDS) {
        println!("Discount of {}% or higher: {}", threshold, count);
    }
    for posting in deals {
        println!("{}", format_posting_line(posting));
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    let client = Fundgrube::with_config(cli.client_config());

    match &cli.command {
        Command::Categories => print_facets(&client.categories().await?, None, cli.json),
        Command::Brands { top } => print_facets(&client.brands().await?, *top, cli.json),
        Command::Outlets { top } => print_facets(&client.outlets().await?, *top, cli.json),
        Command::Outlet { name } => {
            let outlet = client
                .outlet(name)
                .await?
                .ok_or_else(|| CliError::OutletNotFound(name.clone()))?;
            print_facets(&[outlet], None, cli.json)
        }
        Command::Postings(args) => run_postings(&cli, &client, args).await,
        Command::Discounts(args) => run_discounts(&cli, args).await,
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
