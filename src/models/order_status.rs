use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::line_item_status::LineItemStatus;

/// Overall order status, derived from line-item state after every mutation.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Pending,
    Confirmed,
    Processing,
    PartiallyShipped,
    Shipped,
    InTransit,
    Delivered,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Position along the fulfillment pipeline; cancelled/refunded sit outside it.
    pub fn pipeline_rank(self) -> Option<u8> {
        match self {
            Self::Draft => Some(0),
            Self::Pending => Some(1),
            Self::Confirmed => Some(2),
            Self::Processing => Some(3),
            Self::PartiallyShipped => Some(4),
            Self::Shipped => Some(5),
            Self::InTransit => Some(6),
            Self::Delivered => Some(7),
            Self::Completed => Some(8),
            Self::Cancelled | Self::Refunded => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Refunded)
    }

    /// Cancellation (and refund) are rejected once the order is delivered or
    /// completed, and are no longer meaningful once already cancelled/refunded.
    pub fn can_cancel(self) -> bool {
        !matches!(
            self,
            Self::Delivered | Self::Completed | Self::Cancelled | Self::Refunded
        )
    }

    /// Recomputes the order status from its line items, never regressing.
    ///
    /// The derivation is idempotent: with no intervening line-item change,
    /// applying it twice yields the same status.
    pub fn derive(current: Self, items: &[LineItemStatus]) -> Self {
        if matches!(current, Self::Cancelled | Self::Refunded | Self::Completed) {
            return current;
        }
        let Some(candidate) = Self::candidate_from_items(items) else {
            return current;
        };
        match (current.pipeline_rank(), candidate.pipeline_rank()) {
            (Some(cur), Some(cand)) if cand > cur => candidate,
            _ => current,
        }
    }

    fn candidate_from_items(items: &[LineItemStatus]) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        if items.iter().all(|s| *s == LineItemStatus::Delivered) {
            return Some(Self::Delivered);
        }
        if items.iter().any(|s| s.has_shipped()) {
            return Some(Self::PartiallyShipped);
        }
        let all_confirmed = items
            .iter()
            .all(|s| s.chain_rank().is_some_and(|r| r >= 1));
        if all_confirmed {
            return Some(Self::Confirmed);
        }
        None
    }
}

/// Handling priority of an order (display/scheduling hint, not used by the
/// state machine).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use LineItemStatus as L;

    #[test]
    fn all_delivered_derives_delivered() {
        let derived = OrderStatus::derive(OrderStatus::PartiallyShipped, &[L::Delivered, L::Delivered]);
        assert_eq!(derived, OrderStatus::Delivered);
    }

    #[test]
    fn any_shipped_derives_partially_shipped() {
        let derived = OrderStatus::derive(OrderStatus::Pending, &[L::Shipped, L::Pending]);
        assert_eq!(derived, OrderStatus::PartiallyShipped);
        let derived = OrderStatus::derive(OrderStatus::Pending, &[L::Delivered, L::Packed]);
        assert_eq!(derived, OrderStatus::PartiallyShipped);
    }

    #[test]
    fn all_confirmed_without_shipping_derives_confirmed() {
        let derived = OrderStatus::derive(OrderStatus::Pending, &[L::Confirmed, L::Allocated]);
        assert_eq!(derived, OrderStatus::Confirmed);
    }

    #[test]
    fn mixed_pending_items_keep_current_status() {
        let derived = OrderStatus::derive(OrderStatus::Pending, &[L::Pending, L::Confirmed]);
        assert_eq!(derived, OrderStatus::Pending);
    }

    #[test]
    fn derivation_never_regresses() {
        // Items all confirmed, but the order already progressed further.
        let derived = OrderStatus::derive(OrderStatus::Processing, &[L::Confirmed, L::Confirmed]);
        assert_eq!(derived, OrderStatus::Processing);
    }

    #[test]
    fn derivation_is_idempotent() {
        let items = [L::Shipped, L::Confirmed];
        let once = OrderStatus::derive(OrderStatus::Pending, &items);
        let twice = OrderStatus::derive(once, &items);
        assert_eq!(once, twice);
    }

    #[test]
    fn terminal_states_are_sticky() {
        let items = [L::Delivered];
        assert_eq!(
            OrderStatus::derive(OrderStatus::Cancelled, &items),
            OrderStatus::Cancelled
        );
        assert_eq!(
            OrderStatus::derive(OrderStatus::Completed, &items),
            OrderStatus::Completed
        );
        assert_eq!(
            OrderStatus::derive(OrderStatus::Refunded, &items),
            OrderStatus::Refunded
        );
    }

    #[test]
    fn cancel_gate_matches_pipeline_position() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::PartiallyShipped.can_cancel());
        assert!(!OrderStatus::Delivered.can_cancel());
        assert!(!OrderStatus::Completed.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
        assert!(!OrderStatus::Refunded.can_cancel());
    }
}
