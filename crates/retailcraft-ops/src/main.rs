mod forms;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use retailcraft_core::{
    AuthBackend, BusinessDetails, Credentials, CustomerType, DirectoryBackend, NewBranch,
    NewBranchUser, NewCustomer, NewProduct, Portal, Principal, Size, StockBackend,
};
use retailcraft_desk::StockDesk;
use retailcraft_inventory::{InventoryQuery, StockStatus, parse_quantity};
use retailcraft_platform::{ClientConfig, RetailClient};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info};

use crate::forms::{AddressArgs, build_address, load_directory};

const DEFAULT_LOG_FILTER: &str = "retailcraft_ops=info,retailcraft_platform=info,retailcraft_desk=info";

#[derive(Parser)]
#[command(name = "retailcraft-ops")]
#[command(about = "Operator console for RetailCraft branches and inventory")]
struct Cli {
    #[arg(long, env = "RETAILCRAFT_EMAIL")]
    email: String,

    #[arg(long, env = "RETAILCRAFT_PASSWORD", hide_env_values = true)]
    password: String,

    /// admin or branch
    #[arg(long, env = "RETAILCRAFT_ROLE", default_value = "admin")]
    portal: Portal,

    /// JSON file of countries, states and cities used to check addresses
    #[arg(long, env = "RETAILCRAFT_LOCATIONS")]
    locations: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Per-product stock grouped by size
    Inventory {
        /// all, in, low or out
        #[arg(long, default_value = "all")]
        status: StockStatus,
        /// Case-insensitive match on product name or barcode
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        size: Option<Size>,
        /// Total each product from its size map instead of summing raw records
        #[arg(long)]
        deduplicated: bool,
    },
    /// Add units to a product size
    Add {
        #[arg(long)]
        product: String,
        #[arg(long)]
        size: Size,
        #[arg(long, value_parser = parse_quantity)]
        quantity: u32,
    },
    /// Remove units from a product size
    Reduce {
        #[arg(long)]
        product: String,
        #[arg(long)]
        size: Size,
        #[arg(long, value_parser = parse_quantity)]
        quantity: u32,
    },
    /// Backend totals and low-stock count
    Dashboard,
    Branches,
    /// Users of a branch (defaults to the signed-in user's branch)
    Users {
        #[arg(long)]
        branch: Option<String>,
    },
    Customers,
    Products,
    CreateBranch {
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        branch_email: Option<String>,
        #[command(flatten)]
        address: AddressArgs,
    },
    CreateUser {
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        user_email: String,
        #[arg(long)]
        user_password: String,
        #[arg(long)]
        phone: Option<String>,
        #[command(flatten)]
        address: AddressArgs,
    },
    CreateCustomer {
        #[arg(long)]
        branch: Option<String>,
        /// B2B or B2C
        #[arg(long = "type")]
        customer_type: CustomerType,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        customer_email: Option<String>,
        /// Required for B2B customers
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        gst_number: Option<String>,
        #[arg(long)]
        contact_person: Option<String>,
        #[command(flatten)]
        address: AddressArgs,
    },
    CreateProduct {
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        bar_code: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        b2b_price: Decimal,
        #[arg(long)]
        b2c_price: Decimal,
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        )
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let client = Arc::new(RetailClient::new(&config)?);

    let credentials = Credentials {
        portal: cli.portal,
        email: cli.email.clone(),
        password: cli.password.clone(),
    };
    let principal = client
        .sign_in(&credentials)
        .await
        .context("sign in failed")?;
    info!(user = %principal.email, api = %config.api_base_url, "session started");

    let outcome = run(&cli, &client, &principal).await;
    client.sign_out().await;
    if let Err(err) = &outcome {
        error!("{err:#}");
    }
    outcome
}

async fn run(cli: &Cli, client: &Arc<RetailClient>, principal: &Principal) -> Result<()> {
    match &cli.command {
        Command::Inventory {
            status,
            search,
            size,
            deduplicated,
        } => {
            let mut desk = StockDesk::new(client.clone());
            desk.refresh().await?;
            let query = InventoryQuery {
                status: *status,
                search: search.clone(),
                size: *size,
            };
            let rows = desk.view(&query);
            if cli.json {
                print_json(&rows)?;
            } else {
                println!("{}", render::inventory(&rows, *deduplicated));
            }
        }
        Command::Add {
            product,
            size,
            quantity,
        } => {
            let mut desk = StockDesk::new(client.clone());
            desk.refresh().await?;
            let outcome = desk.add_stock(product, *size, i64::from(*quantity)).await;
            report(cli, &mut desk)?;
            outcome?;
        }
        Command::Reduce {
            product,
            size,
            quantity,
        } => {
            let mut desk = StockDesk::new(client.clone());
            desk.refresh().await?;
            let outcome = desk
                .reduce_stock(product, *size, i64::from(*quantity))
                .await;
            report(cli, &mut desk)?;
            outcome?;
        }
        Command::Dashboard => {
            let mut desk = StockDesk::new(client.clone());
            let tiles = desk.dashboard().await?;
            if cli.json {
                print_json(&tiles)?;
            } else {
                println!("{}", render::dashboard(&tiles));
            }
        }
        Command::Branches => {
            if !principal.can_manage_branches() {
                bail!("only administrators can list branches");
            }
            let branches = client.list_branches().await?;
            output(cli, branches.as_slice(), render::branches)?;
        }
        Command::Users { branch } => {
            let branch_id = resolve_branch(branch.as_deref(), principal)?;
            let users = client.list_branch_users(&branch_id).await?;
            output(cli, users.as_slice(), render::users)?;
        }
        Command::Customers => {
            let customers = client.list_customers().await?;
            output(cli, customers.as_slice(), render::customers)?;
        }
        Command::Products => {
            let products = client.list_products().await?;
            output(cli, products.as_slice(), render::products)?;
        }
        Command::CreateBranch {
            name,
            code,
            phone,
            branch_email,
            address,
        } => {
            if !principal.can_manage_branches() {
                bail!("only administrators can create branches");
            }
            let directory = load_directory(cli.locations.as_deref())?;
            let branch = client
                .create_branch(&NewBranch {
                    name: name.clone(),
                    code: code.clone(),
                    phone: phone.clone(),
                    email: branch_email.clone(),
                    address: build_address(address, directory.as_ref())?,
                })
                .await?;
            info!(branch_id = %branch.id, "branch created");
            output(cli, std::slice::from_ref(&branch), render::branches)?;
        }
        Command::CreateUser {
            branch,
            name,
            user_email,
            user_password,
            phone,
            address,
        } => {
            let branch_id = resolve_branch(branch.as_deref(), principal)?;
            let directory = load_directory(cli.locations.as_deref())?;
            let user = client
                .create_branch_user(&NewBranchUser {
                    branch_id,
                    name: name.clone(),
                    email: user_email.clone(),
                    password: user_password.clone(),
                    phone: phone.clone(),
                    address: Some(build_address(address, directory.as_ref())?),
                })
                .await?;
            info!(user_id = %user.id, "branch user created");
            output(cli, std::slice::from_ref(&user), render::users)?;
        }
        Command::CreateCustomer {
            branch,
            customer_type,
            name,
            phone,
            customer_email,
            company,
            gst_number,
            contact_person,
            address,
        } => {
            let branch_id = resolve_branch(branch.as_deref(), principal)?;
            let business = match (customer_type, company) {
                (CustomerType::B2B, None) => bail!("B2B customers need --company"),
                (CustomerType::B2B, Some(company)) => Some(BusinessDetails {
                    company_name: company.clone(),
                    gst_number: gst_number.clone(),
                    contact_person: contact_person.clone(),
                }),
                (CustomerType::B2C, _) => None,
            };
            let directory = load_directory(cli.locations.as_deref())?;
            let customer = client
                .create_customer(
                    &NewCustomer {
                        branch_id,
                        customer_type: *customer_type,
                        name: name.clone(),
                        phone: phone.clone(),
                        email: customer_email.clone(),
                        address: build_address(address, directory.as_ref())?,
                        business,
                    }
                    .normalized(),
                )
                .await?;
            info!(customer_id = %customer.id, "customer created");
            output(cli, std::slice::from_ref(&customer), render::customers)?;
        }
        Command::CreateProduct {
            branch,
            name,
            bar_code,
            category,
            b2b_price,
            b2c_price,
            description,
        } => {
            if b2b_price.is_sign_negative() || b2c_price.is_sign_negative() {
                bail!("prices cannot be negative");
            }
            let branch_id = resolve_branch(branch.as_deref(), principal)?;
            let product = client
                .create_product(&NewProduct {
                    branch_id,
                    name: name.clone(),
                    bar_code: bar_code.clone(),
                    category: category.clone(),
                    b2b_price: *b2b_price,
                    b2c_price: *b2c_price,
                    description: description.clone(),
                })
                .await?;
            info!(product_id = %product.id, "product created");
            output(cli, std::slice::from_ref(&product), render::products)?;
        }
    }

    Ok(())
}

// branch users are pinned to their own branch; admins must name one
fn resolve_branch(requested: Option<&str>, principal: &Principal) -> Result<String> {
    match (requested, principal.branch_scope()) {
        (Some(requested), Some(own)) if requested != own => {
            bail!("branch users can only act on their own branch ({own})")
        }
        (_, Some(own)) => Ok(own.to_string()),
        (Some(requested), None) => Ok(requested.to_string()),
        (None, None) => bail!("--branch is required when signed in as admin"),
    }
}

fn report<B: StockBackend>(cli: &Cli, desk: &mut StockDesk<B>) -> Result<()> {
    match desk.take_notice() {
        Some(notice) if cli.json => print_json(&notice),
        Some(notice) => {
            println!("{notice}");
            Ok(())
        }
        None => Ok(()),
    }
}

fn output<T: Serialize>(cli: &Cli, items: &[T], table: fn(&[T]) -> String) -> Result<()> {
    if cli.json {
        print_json(&items)
    } else {
        println!("{}", table(items));
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
