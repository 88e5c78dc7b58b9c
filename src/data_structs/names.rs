//! Session-scoped string interning for feature types, tracks, contig names
//! and attribute keys.
//!
//! A [`NameRegistry`] is created once per load session and shared by every
//! reader and feature of that session through [`NamesRef`] handles. Each
//! handle holds one reference; the registry drops its tables when the last
//! reference is released.

use std::cell::{
    Cell,
    RefCell,
};
use std::ops::Deref;
use std::rc::Rc;

use arcstr::ArcStr;
use hashbrown::HashMap;
use log::trace;

use crate::error::{
    GffError,
    Result,
};

/// Feature-type id of transcript-kind features.
pub const FID_MRNA: usize = 0;
/// Feature-type id of the default transcript subfeature.
pub const FID_EXON: usize = 1;

/// One interning table: ids are dense indices in insertion order.
#[derive(Debug, Default)]
pub struct NameTable {
    label:   &'static str,
    names:   Vec<ArcStr>,
    lookup:  HashMap<ArcStr, usize>,
    last_id: Option<usize>,
}

impl NameTable {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            ..Default::default()
        }
    }

    /// Returns the id of `name`, interning it first if needed.
    pub fn add_name(
        &mut self,
        name: &str,
    ) -> usize {
        let id = match self.lookup.get(name) {
            Some(id) => *id,
            None => {
                let id = self.names.len();
                let name = ArcStr::from(name);
                self.names.push(name.clone());
                self.lookup.insert(name, id);
                trace!("Interned {} '{}' as {}", self.label, self.names[id], id);
                id
            },
        };
        self.last_id = Some(id);
        id
    }

    pub fn get_name(
        &self,
        id: usize,
    ) -> Result<ArcStr> {
        self.names
            .get(id)
            .cloned()
            .ok_or(GffError::InvalidNameId {
                table: self.label,
                id,
            })
    }

    pub fn get_id(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// Id returned by the most recent [`NameTable::add_name`] call.
    pub fn last_id(&self) -> Option<usize> { self.last_id }

    pub fn len(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }

    fn clear(&mut self) {
        self.names.clear();
        self.lookup.clear();
        self.last_id = None;
    }
}

#[derive(Debug)]
pub struct NameRegistry {
    feats:  RefCell<NameTable>,
    tracks: RefCell<NameTable>,
    seqs:   RefCell<NameTable>,
    attrs:  RefCell<NameTable>,
    refs:   Cell<usize>,
}

impl NameRegistry {
    /// Creates an unreferenced registry. Use [`NameRegistry::acquire`] to
    /// obtain handles.
    pub fn new() -> Rc<Self> {
        let registry = Self {
            feats:  RefCell::new(NameTable::new("feature type")),
            tracks: RefCell::new(NameTable::new("track")),
            seqs:   RefCell::new(NameTable::new("contig")),
            attrs:  RefCell::new(NameTable::new("attribute")),
            refs:   Cell::new(0),
        };
        registry.seed();
        Rc::new(registry)
    }

    fn seed(&self) {
        let mut feats = self.feats.borrow_mut();
        feats.add_name("mRNA");
        feats.add_name("exon");
    }

    /// Takes one reference on the registry and returns a handle that gives
    /// it back on drop.
    pub fn acquire(self: &Rc<Self>) -> NamesRef {
        if self.refs.get() == 0 && self.feats.borrow().is_empty() {
            self.seed();
        }
        self.refs.set(self.refs.get() + 1);
        NamesRef(Rc::clone(self))
    }

    /// Gives back one reference. Releasing the last reference clears every
    /// table; releasing an unreferenced registry is an error.
    pub fn release(&self) -> Result<usize> {
        let refs = self.refs.get();
        if refs == 0 {
            return Err(GffError::UnreferencedRegistry);
        }
        self.refs.set(refs - 1);
        if refs == 1 {
            self.feats.borrow_mut().clear();
            self.tracks.borrow_mut().clear();
            self.seqs.borrow_mut().clear();
            self.attrs.borrow_mut().clear();
        }
        Ok(refs - 1)
    }

    pub fn ref_count(&self) -> usize { self.refs.get() }

    pub fn add_feature_type(
        &self,
        name: &str,
    ) -> usize {
        self.feats.borrow_mut().add_name(name)
    }

    pub fn add_track(
        &self,
        name: &str,
    ) -> usize {
        self.tracks.borrow_mut().add_name(name)
    }

    pub fn add_seq(
        &self,
        name: &str,
    ) -> usize {
        self.seqs.borrow_mut().add_name(name)
    }

    pub fn add_attr(
        &self,
        name: &str,
    ) -> usize {
        self.attrs.borrow_mut().add_name(name)
    }

    pub fn feature_type(
        &self,
        id: usize,
    ) -> Result<ArcStr> {
        self.feats.borrow().get_name(id)
    }

    pub fn track(
        &self,
        id: usize,
    ) -> Result<ArcStr> {
        self.tracks.borrow().get_name(id)
    }

    pub fn seq(
        &self,
        id: usize,
    ) -> Result<ArcStr> {
        self.seqs.borrow().get_name(id)
    }

    pub fn attr(
        &self,
        id: usize,
    ) -> Result<ArcStr> {
        self.attrs.borrow().get_name(id)
    }

    pub fn attr_id(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.attrs.borrow().get_id(name)
    }

    pub fn seq_count(&self) -> usize { self.seqs.borrow().len() }
}

/// Counted handle on a shared [`NameRegistry`].
#[derive(Debug)]
pub struct NamesRef(Rc<NameRegistry>);

impl NamesRef {
    pub fn registry(&self) -> &Rc<NameRegistry> { &self.0 }

    pub fn ptr_eq(
        &self,
        other: &NamesRef,
    ) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for NamesRef {
    type Target = NameRegistry;

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl Clone for NamesRef {
    fn clone(&self) -> Self { self.0.acquire() }
}

impl Drop for NamesRef {
    fn drop(&mut self) {
        // A failure here means somebody released a reference they never
        // acquired; the count is already wrong for every other holder.
        if let Err(e) = self.0.release() {
            if !std::thread::panicking() {
                panic!("{}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let registry = NameRegistry::new();
        let names = registry.acquire();
        let a = names.add_seq("chr1");
        let b = names.add_seq("chr2");
        assert_ne!(a, b);
        assert_eq!(names.add_seq("chr1"), a);
        assert_eq!(names.seq(b).unwrap().as_str(), "chr2");
        assert_eq!(names.seq_count(), 2);
    }

    #[test]
    fn tables_are_independent() {
        let registry = NameRegistry::new();
        let names = registry.acquire();
        assert_eq!(names.add_track("chr1"), 0);
        assert_eq!(names.add_seq("chr1"), 0);
        assert_eq!(names.add_feature_type("mRNA"), FID_MRNA);
        assert_eq!(names.add_feature_type("exon"), FID_EXON);
        assert_eq!(names.add_feature_type("gene"), 2);
    }

    #[test]
    fn invalid_id_is_an_error() {
        let registry = NameRegistry::new();
        let names = registry.acquire();
        assert!(matches!(
            names.attr(7),
            Err(GffError::InvalidNameId { id: 7, .. })
        ));
    }

    #[test]
    fn last_owner_clears_tables() {
        let registry = NameRegistry::new();
        let first = registry.acquire();
        let second = first.clone();
        first.add_seq("chrX");
        assert_eq!(registry.ref_count(), 2);
        drop(first);
        assert_eq!(second.seq(0).unwrap().as_str(), "chrX");
        drop(second);
        assert_eq!(registry.ref_count(), 0);
        assert_eq!(registry.seq_count(), 0);
    }

    #[test]
    fn releasing_unreferenced_registry_fails() {
        let registry = NameRegistry::new();
        assert!(matches!(
            registry.release(),
            Err(GffError::UnreferencedRegistry)
        ));
    }
}
