use k8s_openapi::api::core::v1::Namespace;
use kube::runtime::reflector::{ObjectRef, Store};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;

/// A read-only point lookup of namespaces by name.
///
/// The lookup is expected to be backed by a cache owned elsewhere (typically an
/// informer-fed reflector store); implementations must not block on the API
/// server for long, since lookups happen on the admission path.
pub trait NamespaceLookup {
    fn namespace(&self, name: &str) -> Result<Arc<Namespace>, LookupError>;
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("namespace not found")]
    NotFound,

    #[error("namespace lookup failed: {0}")]
    Unavailable(#[source] anyhow::Error),
}

// === impl NamespaceLookup ===

impl NamespaceLookup for Store<Namespace> {
    fn namespace(&self, name: &str) -> Result<Arc<Namespace>, LookupError> {
        self.get(&ObjectRef::new(name)).ok_or(LookupError::NotFound)
    }
}

impl<S: std::hash::BuildHasher> NamespaceLookup for HashMap<String, Arc<Namespace>, S> {
    fn namespace(&self, name: &str) -> Result<Arc<Namespace>, LookupError> {
        self.get(name).cloned().ok_or(LookupError::NotFound)
    }
}

impl<L: NamespaceLookup + ?Sized> NamespaceLookup for Arc<L> {
    #[inline]
    fn namespace(&self, name: &str) -> Result<Arc<Namespace>, LookupError> {
        (**self).namespace(name)
    }
}

impl<L: NamespaceLookup + ?Sized> NamespaceLookup for &L {
    #[inline]
    fn namespace(&self, name: &str) -> Result<Arc<Namespace>, LookupError> {
        (**self).namespace(name)
    }
}
