use anyhow::{Context, Result};
use log::info;
use poynt_api::{
    AssertionSigner,
    Card,
    ClientContext,
    Customer,
    Order,
    OrderBuilder,
    OrderItem,
    OrderItemStatus,
    PoyntApi,
    PoyntConfig,
    Transaction,
    TransactionSource,
};
use poynt_common::Cents;
use uuid::Uuid;

use crate::{NewCustomerParams, NewOrderParams, NewTransactionParams, OrdersParams};

/// Profile image attached to the demo customer.
const DEMO_IMAGE_URL: &str = "https://pbs.twimg.com/media/ChfXfnMUoAAmQl5.jpg";

fn load_config() -> PoyntConfig {
    match PoyntConfig::try_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        },
    }
}

async fn new_poynt_api() -> PoyntApi {
    match PoyntApi::connect(load_config()).await {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error authenticating against the platform: {e}");
            std::process::exit(1);
        },
    }
}

pub async fn fetch_catalogs() {
    let api = new_poynt_api().await;
    match api.get_catalogs().await {
        Ok(catalogs) => {
            let json = serde_json::to_string_pretty(&catalogs)
                .unwrap_or_else(|e| format!("Could not represent catalogs as JSON. {e}"));
            println!("Catalogs\n{json}");
        },
        Err(e) => {
            eprintln!("Error fetching catalogs: {e}");
        },
    }
}

pub async fn fetch_catalog(id: String) {
    let api = new_poynt_api().await;
    match api.get_catalog_by_id(&id).await {
        Ok(catalog) => {
            let json = serde_json::to_string_pretty(&catalog)
                .unwrap_or_else(|e| format!("Could not represent catalog as JSON. {e}"));
            println!("Catalog {id}\n{json}");
        },
        Err(e) => {
            eprintln!("Error fetching catalog {id}: {e}");
        },
    }
}

pub async fn search_orders(params: OrdersParams) {
    let api = new_poynt_api().await;
    match api.orders_for_card(&params.first6, &params.last4, &params.month, &params.year).await {
        Ok(orders) => {
            println!("Found {} orders", orders.len());
            for order in &orders {
                if let Some(id) = order.id {
                    println!("found order: {id}");
                }
            }
        },
        Err(e) => {
            eprintln!("Error searching orders: {e}");
        },
    }
}

pub async fn create_customer(params: NewCustomerParams) {
    let api = new_poynt_api().await;
    let mut customer = Customer::new(&params.first_name, &params.last_name);
    if let Some(url) = &params.image_url {
        customer = customer.with_attribute("imageUrl", url);
    }
    match api.create_customer(&customer).await {
        Ok(created) => {
            let json = serde_json::to_string_pretty(&created)
                .unwrap_or_else(|e| format!("Could not represent customer as JSON. {e}"));
            println!("Created customer\n{json}");
        },
        Err(e) => {
            eprintln!("Error creating customer: {e}");
        },
    }
}

pub async fn create_order(params: NewOrderParams) {
    let api = new_poynt_api().await;
    match demo_order(&api, params.customer_id, &params.notes).await {
        Ok(order) => {
            let json = serde_json::to_string_pretty(&order)
                .unwrap_or_else(|e| format!("Could not represent order as JSON. {e}"));
            println!("Created order\n{json}");
        },
        Err(e) => {
            eprintln!("Error creating order: {e}");
        },
    }
}

pub async fn create_transaction(params: NewTransactionParams) {
    let api = new_poynt_api().await;
    let card = Card::keyed(&params.card, params.month, params.year);
    let mut tx = Transaction::keyed_sale(Cents::from(params.amount), &params.currency, card);
    if let Some(order_id) = &params.order_id {
        tx = tx.for_order(order_id);
    }
    match api.create_transaction(&tx).await {
        Ok(created) => {
            let json = serde_json::to_string_pretty(&created)
                .unwrap_or_else(|e| format!("Could not represent transaction as JSON. {e}"));
            println!("Created transaction\n{json}");
        },
        Err(e) => {
            eprintln!("Error creating transaction: {e}");
        },
    }
}

pub async fn list_devices() {
    let api = new_poynt_api().await;
    match api.store_devices().await {
        Ok(devices) => {
            let json = serde_json::to_string_pretty(&devices)
                .unwrap_or_else(|e| format!("Could not represent devices as JSON. {e}"));
            println!("Active store devices\n{json}");
        },
        Err(e) => {
            eprintln!("Error fetching store devices: {e}");
        },
    }
}

/// Signs an assertion locally so it can be inspected or replayed with curl. Nothing is sent to the platform.
pub fn print_assertion() {
    let config = load_config();
    let signer =
        match AssertionSigner::from_pem(config.private_key_pem.reveal(), &config.application_id, &config.api_endpoint)
        {
            Ok(signer) => signer,
            Err(e) => {
                eprintln!("Error loading the signing key: {e}");
                std::process::exit(1);
            },
        };
    match signer.sign() {
        Ok(assertion) => {
            println!("--------------------------- Identity Assertion ---------------------------");
            println!("application: {}", config.application_id);
            println!("audience: {}", config.api_endpoint);
            println!("assertion:\n{assertion}");
            println!("---------------------------------------------------------------------------");
        },
        Err(e) => {
            eprintln!("Error signing the assertion: {e}");
            std::process::exit(1);
        },
    }
}

pub async fn run_demo() {
    let api = new_poynt_api().await;
    if let Err(e) = demo_sequence(&api).await {
        eprintln!("Demo aborted: {e}");
        std::process::exit(1);
    }
}

/// Walks the whole platform surface: browse the catalog, look up past orders by card, then register a customer and
/// push an order for them to the store.
async fn demo_sequence(api: &PoyntApi) -> Result<()> {
    match api.get_catalog().await? {
        Some(catalog) => {
            for category in &catalog.categories {
                println!("category: {}", category.name);
            }
        },
        None => println!("The business has no catalog"),
    }

    let orders = api.orders_for_card("439341", "9403", "06", "2017").await?;
    for order in &orders {
        if let Some(id) = order.id {
            println!("found order: {id}");
        }
    }

    let customer = Customer::new("John", "Smith").with_attribute("imageUrl", DEMO_IMAGE_URL);
    let customer = api.create_customer(&customer).await?;
    let customer_id = customer.id.context("The created customer came back without an id")?;
    println!("created customer: {customer_id}");

    let order = demo_order(api, Some(customer_id), "will pick up at 5pm").await?;
    match order.id {
        Some(id) => println!("created order: {id}"),
        None => println!("created order"),
    }
    info!("Demo sequence complete");
    Ok(())
}

/// Ten small coffees with an item discount and an order discount. The order context carries the application id as
/// the device id, which the platform accepts for server-created orders.
async fn demo_order(api: &PoyntApi, customer_id: Option<i64>, notes: &str) -> Result<Order> {
    let business_id = Uuid::parse_str(api.business_id()).context("The configured business id is not a UUID")?;
    let store_id = Uuid::parse_str(api.store_id()).context("The configured store id is not a UUID")?;
    let context = ClientContext {
        business_id,
        store_id,
        store_device_id: api.application_id().to_string(),
        source: TransactionSource::Mobile,
    };
    let item = OrderItem::new("Small coffee", "sku12348", Cents::from(100))
        .quantity(10.0)
        .status(OrderItemStatus::Fulfilled)
        .with_discount("custom discount", Cents::from(-50));
    let mut builder = OrderBuilder::new()
        .add_item(item)
        .add_discount("Order level discount", Cents::from(-400))
        .context(context)
        .notes(notes);
    if let Some(id) = customer_id {
        builder = builder.for_customer(id);
    }
    let order = api.create_order(&builder.build()).await?;
    Ok(order)
}
