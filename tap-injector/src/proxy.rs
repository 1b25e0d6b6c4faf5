use k8s_openapi::api::core::v1::Container;

/// The name of the container injected into meshed pods.
pub const PROXY_CONTAINER_NAME: &str = "linkerd-proxy";

/// Set on the proxy when tap is enabled; its value names the tap service.
pub const TAP_SVC_NAME_ENV: &str = "LINKERD2_PROXY_TAP_SVC_NAME";

/// Set on the proxy when tap is disabled.
pub const TAP_DISABLED_ENV: &str = "LINKERD2_PROXY_TAP_DISABLED";

/// Returns the position of the proxy container in a pod's container list.
///
/// Pods that were not injected have no proxy container, so `None` is an
/// ordinary result.
pub fn proxy_index(containers: &[Container]) -> Option<usize> {
    containers
        .iter()
        .position(|c| c.name == PROXY_CONTAINER_NAME)
}

/// Indicates whether the proxy already carries one of the tap env vars, i.e.
/// whether a prior admission already patched it.
pub fn is_already_mutated(container: &Container) -> bool {
    container
        .env
        .iter()
        .flatten()
        .any(|env| env.name == TAP_SVC_NAME_ENV || env.name == TAP_DISABLED_ENV)
}
