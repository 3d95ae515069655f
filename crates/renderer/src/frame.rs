//! Frame-slot bookkeeping.
//!
//! The renderer cycles through a fixed number of frame slots, each with
//! its own sync objects, while the swapchain has its own (usually
//! different) number of images. [`FrameCursor`] tracks the slot,
//! [`ImageGuards`] tracks which slot last targeted each image, and
//! [`FrameManager`] ties both to the actual `FrameSync` bundles.

use std::sync::Arc;

use tracing::debug;

use glint_rhi::RhiResult;
use glint_rhi::device::Device;
use glint_rhi::sync::FrameSync;

/// Index cycling through the frame slots, modulo the slot count.
#[derive(Clone, Copy, Debug)]
pub struct FrameCursor {
    current: usize,
    count: usize,
}

impl FrameCursor {
    /// `count` must be at least 1 (enforced by config validation).
    pub fn new(count: usize) -> Self {
        debug_assert!(count > 0);
        Self { current: 0, count }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Moves to the next slot, wrapping at the slot count.
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.count;
    }
}

/// Which frame slot last submitted work targeting each swapchain image.
///
/// Bridges the fixed slot count to the driver-chosen image count: before
/// a slot reuses an image, the previous owner's fence must have been
/// waited on, or its command buffer could still be reading the image.
#[derive(Clone, Debug)]
pub struct ImageGuards {
    owners: Vec<Option<usize>>,
}

impl ImageGuards {
    pub fn new(image_count: usize) -> Self {
        Self {
            owners: vec![None; image_count],
        }
    }

    /// Clears all ownership and resizes for a recreated swapchain.
    ///
    /// Valid only after a device-idle barrier, when no slot has pending
    /// work on any image.
    pub fn reset(&mut self, image_count: usize) {
        self.owners.clear();
        self.owners.resize(image_count, None);
    }

    /// Records `slot` as the new owner of `image_index` and returns the
    /// slot whose fence must be waited on first, if any.
    ///
    /// Returns `None` when the image was unowned or already owned by
    /// `slot` itself (its fence was already waited on this tick).
    pub fn acquire(&mut self, image_index: usize, slot: usize) -> Option<usize> {
        let previous = self.owners[image_index].replace(slot);
        previous.filter(|&p| p != slot)
    }

    #[inline]
    pub fn image_count(&self) -> usize {
        self.owners.len()
    }
}

/// Sync objects for every frame slot plus the cursor and guard table.
pub struct FrameManager {
    frames: Vec<FrameSync>,
    cursor: FrameCursor,
    guards: ImageGuards,
}

impl FrameManager {
    pub fn new(
        device: Arc<Device>,
        frames_in_flight: usize,
        image_count: usize,
    ) -> RhiResult<Self> {
        let mut frames = Vec::with_capacity(frames_in_flight);
        for _ in 0..frames_in_flight {
            frames.push(FrameSync::new(device.clone())?);
        }
        debug!("frame manager: {frames_in_flight} slots, {image_count} images");

        Ok(Self {
            frames,
            cursor: FrameCursor::new(frames_in_flight),
            guards: ImageGuards::new(image_count),
        })
    }

    /// Sync objects for the current slot.
    #[inline]
    pub fn current(&self) -> &FrameSync {
        &self.frames[self.cursor.index()]
    }

    /// Index of the current slot.
    #[inline]
    pub fn slot(&self) -> usize {
        self.cursor.index()
    }

    /// Blocks until the current slot's previous submission has retired.
    pub fn wait_current(&self) -> RhiResult<()> {
        self.current().in_flight.wait(u64::MAX)
    }

    /// Claims `image_index` for the current slot, waiting out whichever
    /// slot targeted it last.
    pub fn guard_image(&mut self, image_index: usize) -> RhiResult<()> {
        if let Some(owner) = self.guards.acquire(image_index, self.cursor.index()) {
            self.frames[owner].in_flight.wait(u64::MAX)?;
        }
        Ok(())
    }

    /// Clears image ownership after swapchain recreation.
    pub fn reset_guards(&mut self, image_count: usize) {
        self.guards.reset(image_count);
    }

    /// Moves on to the next frame slot.
    pub fn advance(&mut self) {
        self.cursor.advance();
    }

    /// Waits on every slot's fence.
    pub fn wait_all(&self) -> RhiResult<()> {
        for frame in &self.frames {
            frame.in_flight.wait(u64::MAX)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_at_count() {
        let mut cursor = FrameCursor::new(2);
        assert_eq!(cursor.index(), 0);
        cursor.advance();
        assert_eq!(cursor.index(), 1);
        cursor.advance();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn cursor_visits_slots_evenly() {
        let mut cursor = FrameCursor::new(3);
        let mut visits = [0u32; 3];
        for _ in 0..999 {
            visits[cursor.index()] += 1;
            cursor.advance();
        }
        assert_eq!(visits, [333; 3]);
    }

    #[test]
    fn guard_on_fresh_image_needs_no_wait() {
        let mut guards = ImageGuards::new(3);
        assert_eq!(guards.acquire(0, 0), None);
        assert_eq!(guards.acquire(1, 1), None);
    }

    #[test]
    fn guard_reports_previous_owner() {
        let mut guards = ImageGuards::new(3);
        assert_eq!(guards.acquire(2, 0), None);
        // Slot 1 reuses image 2 while slot 0 may still be rendering to it.
        assert_eq!(guards.acquire(2, 1), Some(0));
        assert_eq!(guards.acquire(2, 0), Some(1));
    }

    #[test]
    fn guard_ignores_same_slot_reuse() {
        let mut guards = ImageGuards::new(2);
        assert_eq!(guards.acquire(0, 1), None);
        // Same slot cycling back onto the same image: its own fence wait
        // already covers this.
        assert_eq!(guards.acquire(0, 1), None);
    }

    #[test]
    fn guard_reset_forgets_owners_and_resizes() {
        let mut guards = ImageGuards::new(2);
        guards.acquire(0, 0);
        guards.acquire(1, 1);
        guards.reset(4);
        assert_eq!(guards.image_count(), 4);
        for image in 0..4 {
            assert_eq!(guards.acquire(image, 0), None);
        }
    }

    #[test]
    fn two_slots_three_images_never_collide_unwaited() {
        // Simulate many ticks of a 2-slot renderer over 3 images with a
        // rotating acquire pattern; whenever the table reports a previous
        // owner, that owner is a different slot by construction.
        let mut guards = ImageGuards::new(3);
        let mut cursor = FrameCursor::new(2);
        for tick in 0..1000 {
            let image = tick % 3;
            let slot = cursor.index();
            if let Some(owner) = guards.acquire(image, slot) {
                assert_ne!(owner, slot);
            }
            cursor.advance();
        }
    }
}
