use std::sync::Arc;

use log::*;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;

use crate::{
    assertion::AssertionSigner,
    config::PoyntConfig,
    data_objects::{Catalog, Customer, StoreDevice, StoreDeviceStatus},
    error::PoyntApiError,
    order::{Order, OrdersResponse},
    token::exchange_access_token,
    transaction::Transaction,
};

/// Protocol version sent with every request.
pub const API_VERSION: &str = "1.2";

//--------------------------------------     ApiResponse     ---------------------------------------------------------

/// Raw result of an authorized call. Transport never fails a call on a non-2xx status; interpreting the status is
/// the caller's job, and [`ApiResponse::decode`] is the typed path the facade methods take.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as `T`. A non-2xx status becomes [`PoyntApiError::Query`] carrying the status and the
    /// body text; a body that does not match `T` becomes [`PoyntApiError::Payload`].
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, PoyntApiError> {
        if self.is_success() {
            serde_json::from_str(&self.body).map_err(|e| PoyntApiError::Payload(e.to_string()))
        } else {
            Err(PoyntApiError::Query { status: self.status, message: self.body })
        }
    }
}

//--------------------------------------       PoyntApi      ---------------------------------------------------------

/// Authenticated client for the commerce platform.
///
/// [`PoyntApi::connect`] runs the whole JWT-bearer handshake: it signs an identity assertion with the configured
/// private key, trades it for an access token at the token endpoint, and captures that token for the lifetime of the
/// value. There is no re-authentication; once the token expires server-side, authorized calls start coming back 401
/// and a new client must be connected. Clones share the token and the underlying connection pool.
#[derive(Clone)]
pub struct PoyntApi {
    config: PoyntConfig,
    client: Arc<Client>,
    access_token: String,
}

impl PoyntApi {
    /// Sign, exchange, and store the access token. Any failure along the way aborts construction, so a `PoyntApi`
    /// value is always authenticated.
    pub async fn connect(config: PoyntConfig) -> Result<Self, PoyntApiError> {
        let signer =
            AssertionSigner::from_pem(config.private_key_pem.reveal(), &config.application_id, &config.api_endpoint)?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PoyntApiError::Initialization(e.to_string()))?;
        let access_token = exchange_access_token(&client, &config.api_endpoint, &signer).await?;
        info!("Authenticated against {}", config.api_endpoint);
        Ok(Self { config, client: Arc::new(client), access_token })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_endpoint)
    }

    pub fn application_id(&self) -> &str {
        &self.config.application_id
    }

    pub fn business_id(&self) -> &str {
        &self.config.business_id
    }

    pub fn store_id(&self) -> &str {
        &self.config.store_id
    }

    /// Issue an authorized GET against `{endpoint}{path}`.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, PoyntApiError> {
        let url = self.url(path);
        trace!("GET {url}");
        self.send(self.client.get(&url)).await
    }

    /// Issue an authorized POST with a JSON body against `{endpoint}{path}`. The body bytes are sent exactly as
    /// given; the facade serializes payloads before calling this.
    pub async fn post_json(&self, path: &str, body: &str) -> Result<ApiResponse, PoyntApiError> {
        let url = self.url(path);
        trace!("POST {url}");
        let request =
            self.client.post(&url).header("Content-Type", "application/json; charset=utf-8").body(body.to_string());
        self.send(request).await
    }

    /// Attach the per-request headers, send, and read the body back. Every call gets a fresh correlation id; the
    /// bearer token is the one captured at construction.
    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse, PoyntApiError> {
        let request_id = Uuid::new_v4().to_string();
        let response = request
            .header("api-version", API_VERSION)
            .header("Poynt-Request-Id", &request_id)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| PoyntApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        debug!("Response status {status} [{request_id}]");
        let body = response.text().await.map_err(|e| PoyntApiError::Transport(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }

    pub async fn get_catalogs(&self) -> Result<Vec<Catalog>, PoyntApiError> {
        #[derive(Deserialize)]
        struct CatalogsResponse {
            catalogs: Vec<Catalog>,
        }
        let path = format!("/businesses/{}/catalogs", self.config.business_id);
        debug!("Fetching merchant catalogs");
        let result = self.get(&path).await?.decode::<CatalogsResponse>()?;
        info!("Fetched {} catalogs", result.catalogs.len());
        Ok(result.catalogs)
    }

    /// The merchant's first catalog, for businesses that keep a single one.
    pub async fn get_catalog(&self) -> Result<Option<Catalog>, PoyntApiError> {
        Ok(self.get_catalogs().await?.into_iter().next())
    }

    pub async fn get_catalog_by_id(&self, catalog_id: &str) -> Result<Catalog, PoyntApiError> {
        let path = format!("/businesses/{}/catalogs/{catalog_id}", self.config.business_id);
        debug!("Fetching catalog {catalog_id}");
        self.get(&path).await?.decode()
    }

    /// Search the business's orders by the card they were paid with.
    pub async fn orders_for_card(
        &self,
        first6: &str,
        last4: &str,
        exp_month: &str,
        exp_year: &str,
    ) -> Result<Vec<Order>, PoyntApiError> {
        let path = format!(
            "/businesses/{}/orders?cardNumberFirst6={first6}&cardNumberLast4={last4}&cardExpirationMonth={exp_month}\
             &cardExpirationYear={exp_year}",
            self.config.business_id
        );
        debug!("Searching orders for card {first6}******{last4}");
        let result: OrdersResponse = self.get(&path).await?.decode()?;
        info!("Found {} orders", result.count);
        Ok(result.orders)
    }

    pub async fn create_order(&self, order: &Order) -> Result<Order, PoyntApiError> {
        let path = format!("/businesses/{}/orders", self.config.business_id);
        let body = serde_json::to_string(order).map_err(|e| PoyntApiError::Payload(e.to_string()))?;
        debug!("Creating order");
        let created: Order = self.post_json(&path, &body).await?.decode()?;
        match created.id {
            Some(id) => info!("Created order {id}"),
            None => warn!("The created order came back without an id"),
        }
        Ok(created)
    }

    pub async fn create_customer(&self, customer: &Customer) -> Result<Customer, PoyntApiError> {
        let path = format!("/businesses/{}/customers", self.config.business_id);
        let body = serde_json::to_string(customer).map_err(|e| PoyntApiError::Payload(e.to_string()))?;
        debug!("Creating customer {} {}", customer.first_name, customer.last_name);
        let created: Customer = self.post_json(&path, &body).await?.decode()?;
        info!("Created customer {:?}", created.id);
        Ok(created)
    }

    pub async fn create_transaction(&self, transaction: &Transaction) -> Result<Transaction, PoyntApiError> {
        let path = format!("/businesses/{}/transactions", self.config.business_id);
        let body = serde_json::to_string(transaction).map_err(|e| PoyntApiError::Payload(e.to_string()))?;
        debug!("Creating transaction");
        let created: Transaction = self.post_json(&path, &body).await?.decode()?;
        info!("Created transaction {:?} with status {:?}", created.id, created.status);
        Ok(created)
    }

    /// The store's terminals that are currently activated.
    pub async fn store_devices(&self) -> Result<Vec<StoreDevice>, PoyntApiError> {
        let path = format!("/businesses/{}/stores/{}/storeDevices", self.config.business_id, self.config.store_id);
        debug!("Fetching store devices");
        let devices: Vec<StoreDevice> = self.get(&path).await?.decode()?;
        let active = devices.into_iter().filter(|d| d.status == StoreDeviceStatus::Activated).collect::<Vec<_>>();
        info!("{} active store devices", active.len());
        Ok(active)
    }

    /// The catalog assigned to the store's first active terminal.
    pub async fn store_device_catalog(&self) -> Result<Catalog, PoyntApiError> {
        let devices = self.store_devices().await?;
        let catalog_id = devices
            .first()
            .and_then(|d| d.catalog_id.clone())
            .ok_or_else(|| PoyntApiError::EmptyResponse("No active store device advertises a catalog".to_string()))?;
        self.get_catalog_by_id(&catalog_id).await
    }
}
