//! The owned Ethernet frame buffer and its lock-free state machine (spec
//! §3 "Frame buffer", component C7).
//!
//! Grounded on `srsran::ether::frame_buffer`
//! (`examples/original_source/include/srsran/ofh/ethernet/ethernet_frame_pool.h`):
//! storage plus a written-size counter plus a reservation timestamp, with an
//! atomic `state` tag that the pool CASes between `free`/`reserved`/
//! `pending`/`queued`. Contents and size are *not* atomic — ownership is
//! always exclusive, handed off through the atomic `state` transition plus
//! the lock-free free/pending queues, exactly as in the original.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU8, Ordering};

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::constants::{MAX_ETH_FRAME_LENGTH, MIN_ETH_FRAME_LENGTH};
use crate::timing::SlotSymbolPoint;

/// Buffer lifecycle state (spec §3, the `free → reserved → pending → queued
/// → free` table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum BufferState {
    Free = 0,
    Reserved = 1,
    Pending = 2,
    Queued = 3,
}

struct Contents {
    data: Box<[u8]>,
    size: usize,
    reservation_symbol_point: Option<SlotSymbolPoint>,
}

/// One Ethernet frame's worth of owned storage plus the atomic state tag
/// that the pool's CAS loop serializes ownership transfer through.
///
/// # Safety
///
/// `contents` is accessed through the raw pointer returned by
/// [`UnsafeCell::get`] rather than a `Mutex`: at any instant at most one
/// thread holds a [`super::ScopedFrameBuffer`] for a given index (the pool
/// only ever hands one out per `free_list` pop and never pops the same index
/// twice), so the accesses are never concurrent. The pool's lock-free queues
/// supply the happens-before edge between the writer that releases an index
/// and the next thread that pops it.
pub struct FrameBuffer {
    state: AtomicU8,
    contents: UnsafeCell<Contents>,
}

// SAFETY: see the struct-level safety note; `Contents` is only ever touched
// by the single thread that currently owns the index in a non-free state.
unsafe impl Sync for FrameBuffer {}

impl FrameBuffer {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity <= MAX_ETH_FRAME_LENGTH);
        Self {
            state: AtomicU8::new(BufferState::Free as u8),
            contents: UnsafeCell::new(Contents {
                data: vec![0u8; capacity].into_boxed_slice(),
                size: 0,
                reservation_symbol_point: None,
            }),
        }
    }

    pub(super) fn state(&self) -> BufferState {
        BufferState::try_from(self.state.load(Ordering::Acquire)).expect("corrupt buffer state tag")
    }

    pub(super) fn cas_state(&self, current: BufferState, new: BufferState) -> bool {
        self.state
            .compare_exchange_weak(current as u8, new as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(super) fn force_state(&self, new: BufferState) {
        self.state.store(new as u8, Ordering::Release);
    }

    /// Resets written size to zero and records the reservation timepoint.
    /// Only valid to call immediately after winning the `free -> reserved` CAS.
    pub(super) fn reset_for_reservation(&self, symbol_point: SlotSymbolPoint) {
        // SAFETY: called only by the thread that just won the free->reserved
        // transition, before publishing the handle anywhere else.
        let contents = unsafe { &mut *self.contents.get() };
        contents.size = 0;
        contents.reservation_symbol_point = Some(symbol_point);
    }

    pub fn is_empty(&self) -> bool {
        // SAFETY: called by the current owner of a reserved/pending handle.
        unsafe { (*self.contents.get()).size == 0 }
    }

    pub fn size(&self) -> usize {
        unsafe { (*self.contents.get()).size }
    }

    pub fn reservation_symbol_point(&self) -> Option<SlotSymbolPoint> {
        unsafe { (*self.contents.get()).reservation_symbol_point }
    }

    /// The full writable storage, for an encoder to fill in place.
    pub fn buffer_mut(&self) -> &mut [u8] {
        unsafe { &mut (*self.contents.get()).data }
    }

    /// Sets the size of data written into the buffer. Per spec §6, frames
    /// shorter than the 802.3 minimum are zero-padded up to it.
    pub fn set_size(&self, new_size: usize) {
        debug_assert!(new_size <= MAX_ETH_FRAME_LENGTH);
        let contents = unsafe { &mut *self.contents.get() };
        let written_size = new_size.max(MIN_ETH_FRAME_LENGTH);
        if new_size < MIN_ETH_FRAME_LENGTH {
            contents.data[new_size..MIN_ETH_FRAME_LENGTH].fill(0);
        }
        contents.size = written_size;
    }

    /// Read-only view of the data actually written (`0..size()`).
    pub fn data(&self) -> &[u8] {
        let contents = unsafe { &*self.contents.get() };
        &contents.data[..contents.size]
    }
}
