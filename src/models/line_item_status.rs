use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a single order line item.
///
/// Forward chain: pending → confirmed → allocated → picked → packed →
/// shipped → delivered. `cancelled` and `returned` are reachable from any
/// non-terminal state. Terminal states: delivered, cancelled, returned.
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
pub enum LineItemStatus {
    Pending,
    Confirmed,
    Allocated,
    Picked,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl LineItemStatus {
    /// Position within the forward fulfillment chain. Cancelled/returned sit
    /// outside the chain.
    pub fn chain_rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Allocated => Some(2),
            Self::Picked => Some(3),
            Self::Packed => Some(4),
            Self::Shipped => Some(5),
            Self::Delivered => Some(6),
            Self::Cancelled | Self::Returned => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Returned)
    }

    /// The next status along the forward chain, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Allocated),
            Self::Allocated => Some(Self::Picked),
            Self::Picked => Some(Self::Packed),
            Self::Packed => Some(Self::Shipped),
            Self::Shipped => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled | Self::Returned => None,
        }
    }

    /// Whether an explicit `update_status` call may move from `self` to `to`.
    /// Only single forward steps are allowed; skipping must happen through the
    /// shipment flow, which records each intermediate step.
    pub fn can_transition_to(self, to: Self) -> bool {
        if to == Self::Cancelled || to == Self::Returned {
            return !self.is_terminal();
        }
        self.next() == Some(to)
    }

    /// Statuses walked (exclusive of `self`, inclusive of `target`) when a
    /// shipment advances this line item forward through intermediate states.
    /// Empty when the item is already at or past `target`.
    pub fn path_to(self, target: Self) -> Vec<Self> {
        let (Some(from), Some(to)) = (self.chain_rank(), target.chain_rank()) else {
            return Vec::new();
        };
        if from >= to {
            return Vec::new();
        }
        let mut path = Vec::with_capacity((to - from) as usize);
        let mut cursor = self;
        while let Some(next) = cursor.next() {
            path.push(next);
            cursor = next;
            if next == target {
                break;
            }
        }
        path
    }

    /// True once the item has physically shipped (shipped or delivered).
    pub fn has_shipped(self) -> bool {
        matches!(self, Self::Shipped | Self::Delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn forward_single_steps_are_allowed() {
        assert!(LineItemStatus::Pending.can_transition_to(LineItemStatus::Confirmed));
        assert!(LineItemStatus::Packed.can_transition_to(LineItemStatus::Shipped));
        assert!(LineItemStatus::Shipped.can_transition_to(LineItemStatus::Delivered));
    }

    #[test]
    fn skipping_and_backward_transitions_are_rejected() {
        assert!(!LineItemStatus::Pending.can_transition_to(LineItemStatus::Delivered));
        assert!(!LineItemStatus::Shipped.can_transition_to(LineItemStatus::Confirmed));
        assert!(!LineItemStatus::Delivered.can_transition_to(LineItemStatus::Shipped));
    }

    #[test]
    fn cancellation_only_from_non_terminal() {
        assert!(LineItemStatus::Packed.can_transition_to(LineItemStatus::Cancelled));
        assert!(LineItemStatus::Pending.can_transition_to(LineItemStatus::Returned));
        assert!(!LineItemStatus::Delivered.can_transition_to(LineItemStatus::Cancelled));
        assert!(!LineItemStatus::Returned.can_transition_to(LineItemStatus::Cancelled));
    }

    #[test]
    fn path_to_shipped_walks_every_intermediate_step() {
        let path = LineItemStatus::Pending.path_to(LineItemStatus::Shipped);
        assert_eq!(
            path,
            vec![
                LineItemStatus::Confirmed,
                LineItemStatus::Allocated,
                LineItemStatus::Picked,
                LineItemStatus::Packed,
                LineItemStatus::Shipped,
            ]
        );
        assert!(LineItemStatus::Shipped
            .path_to(LineItemStatus::Shipped)
            .is_empty());
        assert_eq!(
            LineItemStatus::Packed.path_to(LineItemStatus::Shipped),
            vec![LineItemStatus::Shipped]
        );
    }

    #[test]
    fn round_trips_through_strings() {
        for status in [
            LineItemStatus::Pending,
            LineItemStatus::Picked,
            LineItemStatus::Delivered,
            LineItemStatus::Returned,
        ] {
            let text = status.to_string();
            assert_eq!(LineItemStatus::from_str(&text).unwrap(), status);
        }
        assert_eq!(LineItemStatus::Packed.to_string(), "packed");
    }
}
