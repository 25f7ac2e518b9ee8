//! Ethernet send gateway interface (spec §1 "Ethernet send/recv syscall
//! wrapper", external collaborator; spec §4.11, component C11).
//!
//! Grounded on `srsran::ofh::ether::transmitter`
//! (`examples/original_source/lib/ofh/transmitter/ofh_message_transmitter_impl.cpp`,
//! `eth_transmitter->send(frame_burst)`): the gateway owns the actual socket
//! and is responsible for syscall batching (e.g. `sendmmsg`); this crate only
//! needs a trait object to hand a burst of frame slices to.

/// Sends a burst of already-framed Ethernet frames.
///
/// Implementations are expected to batch the underlying `send`/`sendmmsg`
/// syscalls; that batching strategy is out of scope here (spec §1 Non-goals:
/// "the Ethernet send/recv syscall wrapper").
pub trait EthernetGateway: Send + Sync {
    fn send(&self, frames: &[&[u8]]);
}

/// An [`EthernetGateway`] that discards every burst, useful for tests and for
/// cells configured without a live NIC.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEthernetGateway;

impl EthernetGateway for NullEthernetGateway {
    fn send(&self, _frames: &[&[u8]]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_gateway_accepts_any_burst() {
        let gateway = NullEthernetGateway;
        gateway.send(&[&[1, 2, 3], &[4, 5]]);
    }
}
