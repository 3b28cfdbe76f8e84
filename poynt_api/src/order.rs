use chrono::{DateTime, Utc};
use poynt_common::{Cents, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data_objects::Link;

//--------------------------------------        Order       ----------------------------------------------------------

/// An order as sent to and returned by the platform. Only the fields this client reads or writes are mapped; unknown
/// response fields are ignored on deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderItem>,
    /// Order-level discounts. Item-level discounts live on the items themselves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discounts: Vec<Discount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amounts: Option<OrderAmounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<OrderStatuses>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ClientContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_user_id: Option<i64>,
    /// Set by the platform; never sent on creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub sku: String,
    pub unit_price: Cents,
    /// Fractional quantities are allowed for weighed goods.
    pub quantity: f32,
    pub unit_of_measure: UnitOfMeasure,
    pub status: OrderItemStatus,
    pub tax: Cents,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discounts: Vec<Discount>,
}

impl OrderItem {
    /// A single unit of measure `EACH` in the `ORDERED` state with no tax or discounts.
    pub fn new(name: &str, sku: &str, unit_price: Cents) -> Self {
        Self {
            name: name.to_string(),
            sku: sku.to_string(),
            unit_price,
            quantity: 1.0,
            unit_of_measure: UnitOfMeasure::Each,
            status: OrderItemStatus::Ordered,
            tax: Cents::from(0),
            discounts: Vec::new(),
        }
    }

    pub fn quantity(mut self, quantity: f32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn unit_of_measure(mut self, unit: UnitOfMeasure) -> Self {
        self.unit_of_measure = unit;
        self
    }

    pub fn status(mut self, status: OrderItemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn tax(mut self, tax: Cents) -> Self {
        self.tax = tax;
        self
    }

    /// Attach an item-level discount. The amount is negative.
    pub fn with_discount(mut self, name: &str, amount: Cents) -> Self {
        self.discounts.push(Discount::new(name, amount));
        self
    }

    /// Price of the line before discounts, rounded to the nearest cent.
    pub fn line_total(&self) -> Cents {
        #[allow(clippy::cast_possible_truncation)]
        Cents::from((self.unit_price.value() as f64 * f64::from(self.quantity)).round() as i64)
    }

    pub fn discount_total(&self) -> Cents {
        self.discounts.iter().map(|d| d.amount).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub custom_name: String,
    pub amount: Cents,
}

impl Discount {
    pub fn new(custom_name: &str, amount: Cents) -> Self {
        Self { custom_name: custom_name.to_string(), amount }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAmounts {
    pub currency: String,
    pub sub_total: Cents,
    pub discount_total: Cents,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_total: Option<Cents>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatuses {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Opened,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderItemStatus {
    Ordered,
    Fulfilled,
    Returned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitOfMeasure {
    Each,
    Hours,
    Days,
    Gram,
    Kilogram,
    Pound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionSource {
    Instore,
    Web,
    Mobile,
    Callin,
}

/// Identifies where an order originates. Setting a store device id makes the store's terminals pick the order up as
/// a push notification; the application id is accepted there for server-created orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    pub business_id: Uuid,
    pub store_id: Uuid,
    pub store_device_id: String,
    pub source: TransactionSource,
}

/// Envelope of the order-search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub count: i64,
}

//--------------------------------------    OrderBuilder    ----------------------------------------------------------

/// Assembles an [`Order`] and derives the amounts block from the line items, so that the totals can never drift from
/// the items they summarize.
#[derive(Debug, Clone, Default)]
pub struct OrderBuilder {
    currency: String,
    items: Vec<OrderItem>,
    discounts: Vec<Discount>,
    context: Option<ClientContext>,
    notes: Option<String>,
    customer_user_id: Option<i64>,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self { currency: DEFAULT_CURRENCY.to_string(), ..Default::default() }
    }

    pub fn currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn add_item(mut self, item: OrderItem) -> Self {
        self.items.push(item);
        self
    }

    /// Add an order-level discount. The amount is negative.
    pub fn add_discount(mut self, name: &str, amount: Cents) -> Self {
        self.discounts.push(Discount::new(name, amount));
        self
    }

    pub fn context(mut self, context: ClientContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn for_customer(mut self, customer_user_id: i64) -> Self {
        self.customer_user_id = Some(customer_user_id);
        self
    }

    /// Build an order in the `OPENED` state. `subTotal` is the sum of the line totals, `discountTotal` the sum of
    /// every item-level and order-level discount, and `taxTotal` the sum of the line taxes.
    pub fn build(self) -> Order {
        let sub_total = self.items.iter().map(OrderItem::line_total).sum();
        let item_discounts: Cents = self.items.iter().map(OrderItem::discount_total).sum();
        let order_discounts: Cents = self.discounts.iter().map(|d| d.amount).sum();
        let tax_total = self.items.iter().map(|i| i.tax).sum();
        let amounts = OrderAmounts {
            currency: self.currency,
            sub_total,
            discount_total: item_discounts + order_discounts,
            tax_total: Some(tax_total),
        };
        Order {
            id: None,
            items: self.items,
            discounts: self.discounts,
            amounts: Some(amounts),
            statuses: Some(OrderStatuses { status: OrderStatus::Opened }),
            context: self.context,
            notes: self.notes,
            customer_user_id: self.customer_user_id,
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn coffee_order() -> Order {
        let item = OrderItem::new("Small coffee", "sku12348", Cents::from(100))
            .quantity(10.0)
            .status(OrderItemStatus::Fulfilled)
            .with_discount("custom discount", Cents::from(-50));
        OrderBuilder::new()
            .add_item(item)
            .add_discount("Order level discount", Cents::from(-400))
            .notes("will pick up at 5pm")
            .for_customer(12345)
            .build()
    }

    #[test]
    fn totals_are_derived_from_the_items() {
        let order = coffee_order();
        let amounts = order.amounts.expect("Amounts were not set");
        assert_eq!(amounts.currency, "USD");
        assert_eq!(amounts.sub_total, Cents::from(1000));
        assert_eq!(amounts.discount_total, Cents::from(-450));
        assert_eq!(amounts.tax_total, Some(Cents::from(0)));
        assert_eq!(order.statuses.expect("Statuses were not set").status, OrderStatus::Opened);
    }

    #[test]
    fn fractional_quantities_round_to_whole_cents() {
        let item = OrderItem::new("Coffee beans", "sku900", Cents::from(199))
            .quantity(2.5)
            .unit_of_measure(UnitOfMeasure::Pound);
        assert_eq!(item.line_total(), Cents::from(498));
        let order = OrderBuilder::new().add_item(item).build();
        assert_eq!(order.amounts.expect("Amounts were not set").sub_total, Cents::from(498));
    }

    #[test]
    fn taxes_and_currency_flow_into_the_totals() {
        let item = OrderItem::new("Espresso beans", "sku777", Cents::from(1500))
            .quantity(2.0)
            .tax(Cents::from(240));
        let order = OrderBuilder::new().currency("EUR").add_item(item).build();
        let amounts = order.amounts.expect("Amounts were not set");
        assert_eq!(amounts.currency, "EUR");
        assert_eq!(amounts.sub_total, Cents::from(3000));
        assert_eq!(amounts.tax_total, Some(Cents::from(240)));
    }

    #[test]
    fn serializes_with_platform_field_names() {
        let json = serde_json::to_value(coffee_order()).unwrap();
        assert_eq!(json["amounts"]["subTotal"], 1000);
        assert_eq!(json["amounts"]["discountTotal"], -450);
        assert_eq!(json["statuses"]["status"], "OPENED");
        assert_eq!(json["items"][0]["unitOfMeasure"], "EACH");
        assert_eq!(json["items"][0]["status"], "FULFILLED");
        assert_eq!(json["items"][0]["unitPrice"], 100);
        assert_eq!(json["customerUserId"], 12345);
        assert!(json.get("id").is_none(), "An unsaved order must not carry an id");
    }

    #[test]
    fn client_context_serializes_ids_as_strings() {
        let context = ClientContext {
            business_id: Uuid::parse_str("469e957c-57a7-4d54-a72a-9e8f2d2779a0").unwrap(),
            store_id: Uuid::parse_str("c2855b41-1dd5-4ecc-8258-f0f89cbaf051").unwrap(),
            store_device_id: "urn:aid:8a3e8d36-ef8b-42b3-b45c-d21c1f7f4e29".to_string(),
            source: TransactionSource::Mobile,
        };
        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["businessId"], "469e957c-57a7-4d54-a72a-9e8f2d2779a0");
        assert_eq!(json["storeDeviceId"], "urn:aid:8a3e8d36-ef8b-42b3-b45c-d21c1f7f4e29");
        assert_eq!(json["source"], "MOBILE");
    }

    #[test]
    fn order_search_envelope_tolerates_missing_fields() {
        let response: OrdersResponse = serde_json::from_str("{}").unwrap();
        assert!(response.orders.is_empty());
        assert_eq!(response.count, 0);

        let json = r#"{
            "links": [{"href": "/businesses/b/orders?startAt=x", "rel": "next", "method": "GET"}],
            "orders": [{
                "id": "b2a95e29-0956-44ec-8c86-91dd6d977374",
                "notes": "first order",
                "createdAt": "2017-06-01T17:49:41Z"
            }],
            "count": 1
        }"#;
        let response: OrdersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.count, 1);
        assert_eq!(response.links[0].rel, "next");
        assert_eq!(response.orders[0].notes.as_deref(), Some("first order"));
        let created_at = response.orders[0].created_at.expect("createdAt was not parsed");
        assert_eq!(created_at.to_rfc3339(), "2017-06-01T17:49:41+00:00");
    }
}
