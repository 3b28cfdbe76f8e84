mod api;
mod assertion;
mod config;
mod error;
mod order;
mod token;
mod transaction;

mod data_objects;

pub use api::{ApiResponse, PoyntApi, API_VERSION};
pub use assertion::{AssertionClaims, AssertionSigner, ASSERTION_TTL_SECS};
pub use config::{PoyntConfig, DEFAULT_REQUEST_TIMEOUT};
pub use data_objects::{Catalog, Category, Customer, Link, StoreDevice, StoreDeviceStatus};
pub use error::PoyntApiError;
pub use order::{
    ClientContext,
    Discount,
    Order,
    OrderAmounts,
    OrderBuilder,
    OrderItem,
    OrderItemStatus,
    OrderStatus,
    OrderStatuses,
    OrdersResponse,
    TransactionSource,
    UnitOfMeasure,
};
pub use token::{exchange_access_token, JWT_BEARER_GRANT_TYPE};
pub use transaction::{
    Card,
    CustomerPresenceStatus,
    EntryDetails,
    EntryMode,
    FundingSource,
    FundingSourceType,
    ReferenceType,
    Transaction,
    TransactionAction,
    TransactionAmounts,
    TransactionReference,
    TransactionStatus,
};
