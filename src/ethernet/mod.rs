//! Lock-free Ethernet frame buffer pool (spec §3, component C7).

mod frame_buffer;
mod pool;

pub use frame_buffer::{BufferState, FrameBuffer};
pub use pool::{EthFramePool, ScopedFrameBuffer};
