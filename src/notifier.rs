//! Error notifier interface (spec §6 "Error notifier interface", §7
//! "Lateness is surfaced via the error notifier *and* counted").
//!
//! The upstream consumer of these events (alarming, upper-PHY signalling) is
//! an external collaborator out of scope for this crate; handlers only need
//! a trait object to call into.

use crate::timing::SlotPoint;

/// Context passed to an [`ErrorNotifier`] callback.
#[derive(Debug, Clone, Copy)]
pub struct ErrorContext {
    pub slot: SlotPoint,
    pub sector_id: usize,
}

/// Notified on late grants for each of the three producer flows.
pub trait ErrorNotifier: Send + Sync {
    fn on_late_downlink_message(&self, context: ErrorContext);
    fn on_late_uplink_message(&self, context: ErrorContext);
    fn on_late_prach_message(&self, context: ErrorContext);
}

/// An [`ErrorNotifier`] that drops every event; useful where a cell is
/// configured without an upstream alarming sink wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullErrorNotifier;

impl ErrorNotifier for NullErrorNotifier {
    fn on_late_downlink_message(&self, _context: ErrorContext) {}
    fn on_late_uplink_message(&self, _context: ErrorContext) {}
    fn on_late_prach_message(&self, _context: ErrorContext) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::SubcarrierSpacing;

    #[test]
    fn null_notifier_accepts_every_call() {
        let notifier = NullErrorNotifier;
        let ctx = ErrorContext { slot: SlotPoint::new(SubcarrierSpacing::KHZ30, 0, 0), sector_id: 0 };
        notifier.on_late_downlink_message(ctx);
        notifier.on_late_uplink_message(ctx);
        notifier.on_late_prach_message(ctx);
    }
}
