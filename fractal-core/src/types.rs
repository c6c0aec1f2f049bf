/// Identifier for a slot in a [`crate::queue::SegmentQueue`].
///
/// This is an index into the queue's slot arena. Slots are recycled once
/// their segment has been popped, so an id is only meaningful while the
/// segment it names is still pending.
pub type SegmentId = usize;
