//! Field classification: deciding which collection owns a condition's field.

use crate::condition::Collection;
use ahash::AHashSet;

/// Collection used when neither the field tables nor the condition name one.
pub const DEFAULT_COLLECTION: Collection = Collection::Contacts;

const CONTACT_FIELDS: &[&str] = &[
    "user_id",
    "first_name",
    "last_name",
    "email",
    "phone",
    "point_balance",
    "points_balance",
    "status",
    "created_date",
    "gender",
    "id_card",
    "id",
];

const ORDER_FIELDS: &[&str] = &[
    "net_amount",
    "grand_total",
    "order_date",
    "order_status",
    "quantity",
    "discount_amount",
    "id",
];

const POINT_HISTORY_FIELDS: &[&str] = &[
    "point",
    "points",
    "transaction_date",
    "transaction_type",
    "expire_date",
    "expiring_points",
];

/// Resolves the collection a condition belongs to.
///
/// Implementations must be total: an unknown field resolves to some collection, never an error.
pub trait FieldResolver: Send + Sync {
    fn resolve(&self, field: &str, explicit: Option<&Collection>) -> Collection;

    /// Classifies a bare field name with no explicit collection.
    fn classify(&self, field: &str) -> Collection {
        self.resolve(field, None)
    }
}

/// Membership tables checked in a fixed priority order.
#[derive(Debug, Clone)]
pub struct FieldTables {
    tables: Vec<(Collection, AHashSet<String>)>,
    default: Collection,
}

impl FieldTables {
    /// An empty resolver that routes everything to `default` unless a condition names its collection.
    pub fn empty(default: Collection) -> Self {
        Self {
            tables: Vec::new(),
            default,
        }
    }

    /// Appends a table with lower priority than every table already registered.
    pub fn with_table<I, S>(mut self, collection: Collection, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.tables.push((collection, fields));
        self
    }

    /// The first table that lists `field`, if any.
    pub fn owner(&self, field: &str) -> Option<&Collection> {
        self.tables
            .iter()
            .find(|(_, fields)| fields.contains(field))
            .map(|(collection, _)| collection)
    }
}

impl Default for FieldTables {
    fn default() -> Self {
        Self::empty(DEFAULT_COLLECTION)
            .with_table(Collection::Contacts, CONTACT_FIELDS.iter().copied())
            .with_table(Collection::Orders, ORDER_FIELDS.iter().copied())
            .with_table(
                Collection::PointHistories,
                POINT_HISTORY_FIELDS.iter().copied(),
            )
    }
}

impl FieldResolver for FieldTables {
    /// At each priority level a collection wins if the condition names it explicitly or its
    /// table lists the field. Fields no table knows fall through to the explicit collection,
    /// then to the default. An empty collection name counts as no collection.
    fn resolve(&self, field: &str, explicit: Option<&Collection>) -> Collection {
        let explicit = explicit.filter(|c| !c.as_str().is_empty());
        self.tables
            .iter()
            .find(|(collection, fields)| explicit == Some(collection) || fields.contains(field))
            .map(|(collection, _)| collection.clone())
            .or_else(|| explicit.cloned())
            .unwrap_or_else(|| self.default.clone())
    }
}
