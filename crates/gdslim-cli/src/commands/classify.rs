//! Classify command - inspect the feature-domain buckets

use anyhow::Result;
use clap::Args;
use gdslim_core::{classify, Domain, UnknownDomain};

use super::{load_catalogue, load_config, resolve_root};
use crate::GlobalOptions;

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Show only this domain's member classes
    #[arg(long, value_parser = parse_domain)]
    domain: Option<Domain>,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,
}

fn parse_domain(s: &str) -> Result<Domain, String> {
    s.parse().map_err(|e: UnknownDomain| e.to_string())
}

/// Execute the classify command
pub fn execute(args: ClassifyArgs, global: GlobalOptions) -> Result<()> {
    let root = resolve_root(&global)?;
    let config = load_config(&global, &root)?;
    let catalogue = load_catalogue(&config, &root)?;

    let buckets = classify(&catalogue);

    if let Some(domain) = args.domain {
        let bucket = &buckets[&domain];
        if args.json {
            println!("{}", serde_json::to_string_pretty(bucket)?);
        } else {
            for name in bucket {
                println!("{}", name);
            }
        }
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&buckets)?);
        return Ok(());
    }

    println!("Catalogue: {} classes", catalogue.len());
    for domain in Domain::ALL {
        println!("{:>12}  {:>6}", domain.as_str(), buckets[&domain].len());
    }

    Ok(())
}
