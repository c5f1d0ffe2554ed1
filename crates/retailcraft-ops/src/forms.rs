use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Args;
use retailcraft_core::{Address, LocationDirectory, LocationSelection};

#[derive(Args, Debug, Clone)]
pub struct AddressArgs {
    #[arg(long)]
    pub line1: String,
    #[arg(long)]
    pub line2: Option<String>,
    #[arg(long)]
    pub country: String,
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub postal_code: Option<String>,
}

pub fn load_directory(path: Option<&Path>) -> Result<Option<LocationDirectory>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading location directory {}", path.display()))?;
    let directory = LocationDirectory::from_json_str(&raw)
        .with_context(|| format!("parsing location directory {}", path.display()))?;
    Ok(Some(directory))
}

pub fn build_address(args: &AddressArgs, directory: Option<&LocationDirectory>) -> Result<Address> {
    let address = Address {
        line1: args.line1.clone(),
        line2: args.line2.clone(),
        country: args.country.clone(),
        state: args.state.clone(),
        city: args.city.clone(),
        postal_code: args.postal_code.clone(),
    };
    let Some(directory) = directory else {
        return Ok(address);
    };

    let mut selection = LocationSelection::default();
    selection.select_country(args.country.as_str());
    selection.select_state(args.state.as_str());
    selection.select_city(args.city.as_str());
    selection.reconcile(directory);

    if selection.country().is_none() {
        bail!(
            "unknown country {:?}; choose one of: {}",
            args.country,
            directory.country_names().collect::<Vec<_>>().join(", ")
        );
    }
    if selection.state().is_none() {
        let options: Vec<_> = selection
            .state_options(directory)
            .iter()
            .map(|region| region.name.as_str())
            .collect();
        bail!(
            "{:?} is not a state of {}; choose one of: {}",
            args.state,
            args.country,
            options.join(", ")
        );
    }
    if selection.city().is_none() {
        bail!(
            "{:?} is not a city of {}; choose one of: {}",
            args.city,
            args.state,
            selection.city_options(directory).join(", ")
        );
    }

    selection
        .into_address(address)
        .context("location selection is incomplete")
}
