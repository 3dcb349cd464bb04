//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Ordered, type-tagged ownership of registered subsystems."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::any::TypeId;

use crate::subsystem::Subsystem;

/// A registered subsystem together with the type tag captured at registration.
pub struct SubsystemEntry {
    tag: TypeId,
    type_name: &'static str,
    subsystem: Box<dyn Subsystem>,
}

impl SubsystemEntry {
    fn new<T: Subsystem>(subsystem: T) -> Self {
        Self {
            tag: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            subsystem: Box::new(subsystem),
        }
    }

    pub fn name(&self) -> &str {
        self.subsystem.name()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn subsystem_mut(&mut self) -> &mut dyn Subsystem {
        self.subsystem.as_mut()
    }

    fn downcast_ref<T: Subsystem>(&self) -> Option<&T> {
        if self.tag != TypeId::of::<T>() {
            return None;
        }
        // Go through `&dyn Subsystem` so the vtable's `as_any` runs, not the
        // blanket impl on the `Box` itself.
        let subsystem: &dyn Subsystem = self.subsystem.as_ref();
        subsystem.as_any().downcast_ref::<T>()
    }

    fn downcast_mut<T: Subsystem>(&mut self) -> Option<&mut T> {
        if self.tag != TypeId::of::<T>() {
            return None;
        }
        let subsystem: &mut dyn Subsystem = self.subsystem.as_mut();
        subsystem.as_any_mut().downcast_mut::<T>()
    }
}

impl std::fmt::Debug for SubsystemEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubsystemEntry")
            .field("name", &self.name())
            .field("type", &self.type_name)
            .finish()
    }
}

/// Insertion-ordered collection of owned subsystems.
///
/// Ownership moves in on [`push`](Self::push), so one instance can never be
/// registered twice. Lookup compares registration tags and returns the first
/// match.
#[derive(Debug, Default)]
pub struct SubsystemRegistry {
    entries: Vec<SubsystemEntry>,
}

impl SubsystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `subsystem` and return a typed reference to it.
    pub fn push<T: Subsystem>(&mut self, subsystem: T) -> &mut T {
        self.entries.push(SubsystemEntry::new(subsystem));
        match self.entries.last_mut().and_then(SubsystemEntry::downcast_mut::<T>) {
            Some(registered) => registered,
            None => unreachable!("entry was just registered with the tag of T"),
        }
    }

    /// First subsystem registered as `T`.
    pub fn first<T: Subsystem>(&self) -> Option<&T> {
        self.entries.iter().find_map(SubsystemEntry::downcast_ref::<T>)
    }

    /// First subsystem registered as `T`, mutably.
    pub fn first_mut<T: Subsystem>(&mut self) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find_map(SubsystemEntry::downcast_mut::<T>)
    }

    /// Entries in registration order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, SubsystemEntry> {
        self.entries.iter_mut()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(SubsystemEntry::name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every subsystem, last registered first.
    pub fn clear(&mut self) {
        while self.entries.pop().is_some() {}
    }
}
