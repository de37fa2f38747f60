use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub mod line_items;
pub mod orders;
pub mod shipments;
pub mod temperature;

pub use line_items::LineItemService;
pub use orders::OrderService;
pub use shipments::ShipmentService;
pub use temperature::TemperatureMonitor;

/// Per-order mutual exclusion. Every mutation of an order aggregate holds the
/// order's lock for the duration of its transaction; operations on different
/// orders never contend. The version column on the order row is the second,
/// optimistic line of defense.
#[derive(Clone, Debug, Default)]
pub struct OrderLockRegistry {
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

/// Idle entries are swept once the map grows past this size, so a long-lived
/// server does not keep one mutex per historical order.
const EVICT_SWEEP_THRESHOLD: usize = 1024;

impl OrderLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mutex for one order, creating it on first use.
    pub fn lock_for(&self, order_id: Uuid) -> Arc<Mutex<()>> {
        if self.locks.len() > EVICT_SWEEP_THRESHOLD {
            self.evict_unused();
        }
        self.locks
            .entry(order_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops entries nobody holds a handle to. A strong count of 1 means only
    /// the map references the lock, and `retain` holds the shard lock while it
    /// checks, so no handle can appear mid-sweep.
    pub fn evict_unused(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}
