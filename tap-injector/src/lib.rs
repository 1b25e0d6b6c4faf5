#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Decides whether a meshed pod's proxy should serve tap and patches the proxy
//! container's environment accordingly.
//!
//! The [`Mutator`] is invoked once per pod admission request. It locates the
//! `linkerd-proxy` container, skips pods that were already handled, consults
//! the pod's namespace, and answers with a JSON patch that appends either
//! `LINKERD2_PROXY_TAP_SVC_NAME` or `LINKERD2_PROXY_TAP_DISABLED` to the
//! proxy's env list.

pub mod annotation;
mod args;
mod mutate;
pub mod namespace;
pub mod patch;
pub mod proxy;

pub use self::{
    args::Args,
    mutate::{DecodeError, Error, Mutator},
    namespace::{LookupError, NamespaceLookup},
    patch::{Decision, TemplateError},
};

pub type AdmissionRequest = kube::core::admission::AdmissionRequest<kube::core::DynamicObject>;
pub type AdmissionResponse = kube::core::admission::AdmissionResponse;
pub type AdmissionReview = kube::core::admission::AdmissionReview<kube::core::DynamicObject>;
