use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a physical consignment, driven by carrier tracking events.
///
/// Forward chain: preparing → dispatched → in_transit → out_for_delivery →
/// delivered; `failed` and `returned` are reachable from any non-terminal
/// state.
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
pub enum ShipmentStatus {
    Preparing,
    Dispatched,
    InTransit,
    OutForDelivery,
    Delivered,
    Failed,
    Returned,
}

impl ShipmentStatus {
    fn chain_rank(self) -> Option<u8> {
        match self {
            Self::Preparing => Some(0),
            Self::Dispatched => Some(1),
            Self::InTransit => Some(2),
            Self::OutForDelivery => Some(3),
            Self::Delivered => Some(4),
            Self::Failed | Self::Returned => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Failed | Self::Returned)
    }

    /// Carrier events may skip intermediate stops (a shipment can go straight
    /// from dispatched to delivered) but never move backwards.
    pub fn can_transition_to(self, to: Self) -> bool {
        if to == Self::Failed || to == Self::Returned {
            return !self.is_terminal();
        }
        match (self.chain_rank(), to.chain_rank()) {
            (Some(from), Some(target)) => target > from,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_may_skip_but_not_regress() {
        assert!(ShipmentStatus::Preparing.can_transition_to(ShipmentStatus::Dispatched));
        assert!(ShipmentStatus::Dispatched.can_transition_to(ShipmentStatus::Delivered));
        assert!(!ShipmentStatus::InTransit.can_transition_to(ShipmentStatus::Dispatched));
        assert!(!ShipmentStatus::Delivered.can_transition_to(ShipmentStatus::InTransit));
    }

    #[test]
    fn failure_and_return_only_from_active_shipments() {
        assert!(ShipmentStatus::InTransit.can_transition_to(ShipmentStatus::Failed));
        assert!(ShipmentStatus::OutForDelivery.can_transition_to(ShipmentStatus::Returned));
        assert!(!ShipmentStatus::Delivered.can_transition_to(ShipmentStatus::Failed));
        assert!(!ShipmentStatus::Failed.can_transition_to(ShipmentStatus::Returned));
    }
}
