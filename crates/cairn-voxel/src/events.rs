//! Synchronous change notification for voxel writes.
//!
//! [`ChangeListeners`] is a plain observer list: callbacks are invoked in
//! registration order, synchronously, with no buffering. Downstream
//! collaborators (meshing, physics, networking) subscribe to learn about
//! every [`set_voxel`](crate::store::ChunkStore::set_voxel) call.

use glam::IVec3;

/// Payload delivered to listeners for every voxel write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelChange {
    /// World voxel coordinate that was written.
    pub position: IVec3,
    /// The voxel id that was written.
    pub value: u8,
}

/// Handle returned by [`ChangeListeners::add`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&VoxelChange)>;

/// Ordered list of change callbacks.
///
/// Dispatch is synchronous and follows registration order. A listener
/// registered while an event is being dispatched is not invoked for that
/// event (registration requires exclusive access to the list, so it cannot
/// happen from inside a callback).
#[derive(Default)]
pub struct ChangeListeners {
    entries: Vec<(ListenerId, Callback)>,
    next_id: u64,
}

impl ChangeListeners {
    /// Creates an empty listener list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback and returns its handle.
    pub fn add(&mut self, callback: impl FnMut(&VoxelChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Unregisters a callback. Returns `false` if the handle was unknown.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Invokes every registered callback with the change, in registration
    /// order.
    pub fn dispatch(&mut self, change: &VoxelChange) {
        for (_, callback) in &mut self.entries {
            callback(change);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
