use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;

mod command_handler;

use command_handler::{
    create_customer,
    create_order,
    create_transaction,
    fetch_catalog,
    fetch_catalogs,
    list_devices,
    print_assertion,
    run_demo,
    search_orders,
};

#[derive(Parser, Debug)]
#[command(version = "0.1.0", about = "Command-line client for the Poynt commerce platform")]
pub struct Arguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the business's catalogs
    #[clap(name = "catalogs")]
    Catalogs,
    /// Fetch the catalog with the given id
    #[clap(name = "catalog")]
    Catalog {
        #[arg(required = true, index = 1)]
        id: String,
    },
    /// Search the business's orders by the card they were paid with
    #[clap(name = "orders")]
    Orders(OrdersParams),
    /// Create a new customer record
    #[clap(name = "new-customer")]
    NewCustomer(NewCustomerParams),
    /// Create an order and push it to the store's terminals
    #[clap(name = "new-order")]
    NewOrder(NewOrderParams),
    /// Charge a keyed-in card
    #[clap(name = "new-transaction")]
    NewTransaction(NewTransactionParams),
    /// List the store's activated terminals
    #[clap(name = "devices")]
    Devices,
    /// Sign and print an identity assertion without calling the platform
    #[clap(name = "token")]
    Token,
    /// Run the full demo flow: catalog, order search, customer and order creation
    #[clap(name = "demo")]
    Demo,
}

#[derive(Debug, Args)]
pub struct OrdersParams {
    /// First six digits of the card number
    #[arg(short = 'f', long = "first6", default_value = "439341")]
    first6: String,
    /// Last four digits of the card number
    #[arg(short = 'l', long = "last4", default_value = "9403")]
    last4: String,
    /// Two-digit expiry month
    #[arg(short = 'm', long = "month", default_value = "06")]
    month: String,
    /// Four-digit expiry year
    #[arg(short = 'y', long = "year", default_value = "2017")]
    year: String,
}

#[derive(Debug, Args)]
pub struct NewCustomerParams {
    #[arg(required = true, index = 1)]
    first_name: String,
    #[arg(required = true, index = 2)]
    last_name: String,
    /// Profile image to attach to the customer record
    #[arg(short = 'i', long = "image-url")]
    image_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct NewOrderParams {
    /// Attach the order to an existing customer
    #[arg(short = 'c', long = "customer")]
    customer_id: Option<i64>,
    /// Note shown to the store staff
    #[arg(short = 'n', long = "notes", default_value = "will pick up at 5pm")]
    notes: String,
}

#[derive(Debug, Args)]
pub struct NewTransactionParams {
    /// Full card number, keyed in
    #[arg(short = 'c', long = "card", default_value = "4111111111111111")]
    card: String,
    /// Expiry month of the card
    #[arg(short = 'm', long = "month", default_value = "6")]
    month: u8,
    /// Expiry year of the card
    #[arg(short = 'y', long = "year", default_value = "2017")]
    year: u16,
    /// The sale amount, in cents
    #[arg(short = 'a', long = "amount", default_value = "550")]
    amount: i64,
    #[arg(long = "currency", default_value = "USD")]
    currency: String,
    /// Link the charge to an existing order
    #[arg(short = 'o', long = "order")]
    order_id: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    match cli.command {
        Command::Catalogs => fetch_catalogs().await,
        Command::Catalog { id } => fetch_catalog(id).await,
        Command::Orders(params) => search_orders(params).await,
        Command::NewCustomer(params) => create_customer(params).await,
        Command::NewOrder(params) => create_order(params).await,
        Command::NewTransaction(params) => create_transaction(params).await,
        Command::Devices => list_devices().await,
        Command::Token => print_assertion(),
        Command::Demo => run_demo().await,
    }
}
