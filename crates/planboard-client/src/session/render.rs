//! Seam between subscription bookkeeping and whatever draws rows.

use planboard_core::{EntityKey, EntityPlan};

/// Opaque ticket for one drawn row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// What the registry needs from a row renderer.
///
/// The registry decides which rows exist and at which position; the
/// adapter decides how they look. A handle is created on the first
/// plan delivery for a row and stays valid until `remove_row`.
pub trait RenderAdapter {
    /// First plan data for a row: draw it and hand back a ticket.
    fn draw_row(&mut self, index: u64, key: &EntityKey, plan: &EntityPlan) -> RenderHandle;

    /// Fresh plan data for an already drawn row.
    fn update_row(&mut self, handle: RenderHandle, key: &EntityKey, plan: &EntityPlan);

    /// The row kept its drawing but sits at a new position.
    fn move_row(&mut self, handle: RenderHandle, new_index: u64);

    /// The row is gone; the ticket dies with it.
    fn remove_row(&mut self, handle: RenderHandle);
}
