use crate::{
    annotation::is_tap_disabled,
    namespace::{LookupError, NamespaceLookup},
    patch::{self, Decision, TemplateError},
    proxy, AdmissionRequest, AdmissionResponse, AdmissionReview,
};
use json_patch::Patch;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Mutates pod admission requests so that the proxy learns whether to serve
/// tap.
///
/// A `Mutator` holds no per-request state and may be shared freely across
/// concurrent requests.
#[derive(Clone, Debug)]
pub struct Mutator<L> {
    tap_svc_name: String,
    namespaces: L,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to decode pod: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to look up namespace {namespace}: {source}")]
    NamespaceLookup {
        namespace: String,
        #[source]
        source: LookupError,
    },

    #[error("failed to render patch: {0}")]
    Template(#[from] TemplateError),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("admission request missing 'object'")]
    MissingObject,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// === impl Mutator ===

impl<L: NamespaceLookup> Mutator<L> {
    pub fn new(tap_svc_name: impl Into<String>, namespaces: L) -> Self {
        Self {
            tap_svc_name: tap_svc_name.into(),
            namespaces,
        }
    }

    pub fn tap_svc_name(&self) -> &str {
        &self.tap_svc_name
    }

    /// Answers a pod admission request.
    ///
    /// Pods without a proxy, or whose proxy was already patched, are admitted
    /// unchanged. Otherwise the response carries a JSON patch that appends the
    /// tap env var to the proxy container.
    pub fn mutate(&self, req: &AdmissionRequest) -> Result<AdmissionResponse, Error> {
        let rsp = AdmissionResponse::from(req);
        match self.patch(req)? {
            Some(patch) => Ok(rsp.with_patch(patch).map_err(TemplateError::from)?),
            None => Ok(rsp),
        }
    }

    /// Computes the patch for a pod admission request, or `None` when the pod
    /// should be admitted unchanged.
    pub fn patch(&self, req: &AdmissionRequest) -> Result<Option<Patch>, Error> {
        let pod = parse_pod(req)?;
        let containers = pod
            .spec
            .as_ref()
            .map(|spec| spec.containers.as_slice())
            .unwrap_or_default();

        let Some(proxy_index) = proxy::proxy_index(containers) else {
            trace!(pod = %pod.name_any(), "No proxy container");
            return Ok(None);
        };
        if proxy::is_already_mutated(&containers[proxy_index]) {
            debug!(pod = %pod.name_any(), "Proxy already mutated");
            return Ok(None);
        }

        let ns_name = req
            .namespace
            .clone()
            .or_else(|| pod.namespace())
            .unwrap_or_default();
        let ns = self
            .namespaces
            .namespace(&ns_name)
            .map_err(|source| Error::NamespaceLookup {
                namespace: ns_name.clone(),
                source,
            })?;

        let decision = Decision::from_disabled(is_tap_disabled(&*ns) || is_tap_disabled(&pod));
        let patch = patch::compose(decision, proxy_index, &self.tap_svc_name)?;
        debug!(ns = %ns_name, pod = %pod.name_any(), ?decision, ?patch);
        Ok(Some(patch))
    }

    /// Answers an admission review envelope.
    ///
    /// Malformed reviews are answered as invalid. Failures to mutate deny the
    /// request with the error's message so that the API server reports it to
    /// the client.
    pub fn review(&self, review: AdmissionReview) -> AdmissionReview {
        let req: AdmissionRequest = match review.try_into() {
            Ok(req) => req,
            Err(error) => {
                warn!(%error, "Invalid admission request");
                return AdmissionResponse::invalid(error).into_review();
            }
        };
        trace!(?req);

        let rsp = match self.mutate(&req) {
            Ok(rsp) => rsp,
            Err(error) => {
                info!(%error, uid = %req.uid, "Failed to mutate pod");
                AdmissionResponse::from(&req).deny(error)
            }
        };
        debug!(?rsp);
        rsp.into_review()
    }
}

fn parse_pod(req: &AdmissionRequest) -> Result<Pod, DecodeError> {
    let obj = req.object.as_ref().ok_or(DecodeError::MissingObject)?;
    let pod = serde_json::to_value(obj).and_then(serde_json::from_value)?;
    Ok(pod)
}
