// ============================================================================
// spark-toggles - Constants
// Flag constants for state cell bookkeeping
// ============================================================================

// =============================================================================
// CELL STATE FLAGS
// =============================================================================

/// Cell is clean (subscribers have seen the latest committed value)
pub const CLEAN: u32 = 1 << 0;

/// Cell committed a change whose notification is still pending
pub const DIRTY: u32 = 1 << 1;

/// Cell is applying queued update requests
pub const DRAINING: u32 = 1 << 2;

/// Cell is registered with the batch for a deferred flush
pub const QUEUED: u32 = 1 << 3;

// =============================================================================
// STATUS MASK (for clearing status bits)
// =============================================================================

/// Mask to clear the notification status bits (CLEAN, DIRTY)
pub const STATUS_MASK: u32 = !(DIRTY | CLEAN);

// =============================================================================
// TESTS
// =============================================================================
