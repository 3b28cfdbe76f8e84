use chrono::{DateTime, Utc};
use poynt_common::Cents;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A payment transaction posted directly to the platform, such as a card-not-present sale keyed in by this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub action: TransactionAction,
    pub amounts: TransactionAmounts,
    pub funding_source: FundingSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<TransactionReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    /// Set by the platform once the transaction has been processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// A card-not-present sale with manually entered card details.
    pub fn keyed_sale(amount: Cents, currency: &str, card: Card) -> Self {
        Self {
            id: None,
            action: TransactionAction::Sale,
            amounts: TransactionAmounts {
                currency: currency.to_string(),
                order_amount: amount,
                transaction_amount: amount,
                tip_amount: None,
                cashback_amount: None,
            },
            funding_source: FundingSource {
                source_type: FundingSourceType::CreditDebit,
                card,
                entry_details: EntryDetails {
                    entry_mode: EntryMode::Keyed,
                    customer_presence_status: CustomerPresenceStatus::Ecommerce,
                },
            },
            references: Vec::new(),
            status: None,
            created_at: None,
        }
    }

    /// Link the transaction to the order it settles.
    pub fn for_order(mut self, order_id: &str) -> Self {
        self.references.push(TransactionReference {
            reference_type: ReferenceType::PoyntOrder,
            id: order_id.to_string(),
            custom_type: None,
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionAction {
    Authorize,
    Sale,
    Capture,
    Void,
    Refund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Created,
    Authorized,
    Captured,
    Declined,
    Voided,
    Refunded,
    Settled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAmounts {
    pub currency: String,
    pub order_amount: Cents,
    pub transaction_amount: Cents,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip_amount: Option<Cents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashback_amount: Option<Cents>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingSource {
    #[serde(rename = "type")]
    pub source_type: FundingSourceType,
    pub card: Card,
    pub entry_details: EntryDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundingSourceType {
    CreditDebit,
    Cash,
    Check,
}

/// Card details for a keyed transaction. The full number is only ever sent; responses echo the masked
/// `numberFirst6`/`numberLast4` forms instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub expiration_month: u8,
    pub expiration_year: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_first6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_last4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_holder_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_holder_last_name: Option<String>,
}

impl Card {
    pub fn keyed(number: &str, expiration_month: u8, expiration_year: u16) -> Self {
        Self { number: Some(number.to_string()), expiration_month, expiration_year, ..Default::default() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetails {
    pub entry_mode: EntryMode,
    pub customer_presence_status: CustomerPresenceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryMode {
    Keyed,
    IntegratedCircuitCard,
    ContactlessMagstripe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerPresenceStatus {
    Present,
    Ecommerce,
    Moto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReference {
    #[serde(rename = "type")]
    pub reference_type: ReferenceType,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceType {
    PoyntOrder,
    Custom,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keyed_sale_charges_the_full_amount_once() {
        let card = Card::keyed("4111111111111111", 6, 2017);
        let tx = Transaction::keyed_sale(Cents::from(550), "USD", card);
        assert_eq!(tx.action, TransactionAction::Sale);
        assert_eq!(tx.amounts.order_amount, Cents::from(550));
        assert_eq!(tx.amounts.transaction_amount, Cents::from(550));
        assert!(tx.amounts.tip_amount.is_none());
        assert_eq!(tx.funding_source.entry_details.entry_mode, EntryMode::Keyed);
    }

    #[test]
    fn serializes_with_platform_wire_casing() {
        let card = Card::keyed("4111111111111111", 6, 2017);
        let tx = Transaction::keyed_sale(Cents::from(550), "USD", card)
            .for_order("b2a95e29-0956-44ec-8c86-91dd6d977374");
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["action"], "SALE");
        assert_eq!(json["fundingSource"]["type"], "CREDIT_DEBIT");
        assert_eq!(json["fundingSource"]["entryDetails"]["entryMode"], "KEYED");
        assert_eq!(json["fundingSource"]["entryDetails"]["customerPresenceStatus"], "ECOMMERCE");
        assert_eq!(json["references"][0]["type"], "POYNT_ORDER");
        assert_eq!(json["references"][0]["id"], "b2a95e29-0956-44ec-8c86-91dd6d977374");
        assert_eq!(json["amounts"]["transactionAmount"], 550);
    }

    #[test]
    fn decodes_a_processed_response() {
        let json = r#"{
            "id": "fca12593-3ff1-4f31-9a29-19e44b7312ad",
            "action": "SALE",
            "status": "CAPTURED",
            "createdAt": "2017-06-01T17:49:41Z",
            "amounts": {"currency": "USD", "orderAmount": 550, "transactionAmount": 550},
            "fundingSource": {
                "type": "CREDIT_DEBIT",
                "card": {"numberFirst6": "411111", "numberLast4": "1111", "expirationMonth": 6, "expirationYear": 2017},
                "entryDetails": {"entryMode": "KEYED", "customerPresenceStatus": "ECOMMERCE"}
            }
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.status, Some(TransactionStatus::Captured));
        assert!(tx.created_at.is_some());
        assert!(tx.funding_source.card.number.is_none());
        assert_eq!(tx.funding_source.card.number_last4.as_deref(), Some("1111"));
    }
}
