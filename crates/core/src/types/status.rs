//! Status and kind enums for store entities.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// The usual progression is pending -> confirmed -> shipped -> delivered,
/// with cancelled possible at any point. Transitions are not enforced: an
/// admin may set any status at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// An order status as stored.
///
/// Older stores accepted free-form status strings. Values outside
/// [`OrderStatus`] are kept as written instead of failing the whole load;
/// API input still goes through the strict enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordedStatus {
    Known(OrderStatus),
    Other(String),
}

impl RecordedStatus {
    /// The status if it is one the storefront knows.
    #[must_use]
    pub const fn known(&self) -> Option<OrderStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(status) => status.as_str(),
            Self::Other(raw) => raw,
        }
    }
}

impl Default for RecordedStatus {
    fn default() -> Self {
        Self::Known(OrderStatus::default())
    }
}

impl From<OrderStatus> for RecordedStatus {
    fn from(status: OrderStatus) -> Self {
        Self::Known(status)
    }
}

impl PartialEq<OrderStatus> for RecordedStatus {
    fn eq(&self, other: &OrderStatus) -> bool {
        self.known() == Some(*other)
    }
}

impl std::fmt::Display for RecordedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a homepage setting's value should be interpreted by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    #[default]
    Text,
    /// Value is an `/images/...` URL.
    Image,
    /// Value is `"true"` or `"false"`.
    Boolean,
}

/// Account role. Admins manage the catalog, orders and homepage content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Shipped).unwrap(),
            "\"shipped\""
        );
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_recorded_status_keeps_unknown_values() {
        let known: RecordedStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(known, OrderStatus::Shipped);

        let legacy: RecordedStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(legacy, RecordedStatus::Other("processing".to_owned()));
        assert_eq!(legacy.known(), None);
        assert_eq!(serde_json::to_string(&legacy).unwrap(), "\"processing\"");

        assert_eq!(RecordedStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_setting_type_wire_format() {
        let parsed: SettingType = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(parsed, SettingType::Image);
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("root".parse::<UserRole>().is_err());
    }
}
