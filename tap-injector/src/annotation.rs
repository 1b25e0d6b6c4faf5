use kube::ResourceExt;

/// Disables tap on the annotated pod, or on every pod in the annotated
/// namespace.
pub const DISABLE_TAP_ANNOTATION: &str = "config.linkerd.io/disable-tap";

/// Indicates whether the resource's annotations disable tap.
///
/// The annotation must hold a true boolean (`true`, `True`, `TRUE`, `t`, `T`
/// or `1`). Any other value, including one that fails to parse, leaves tap
/// enabled.
pub fn is_tap_disabled<T: ResourceExt>(resource: &T) -> bool {
    resource
        .annotations()
        .get(DISABLE_TAP_ANNOTATION)
        .is_some_and(|v| parse_bool(v) == Some(true))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Some(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}
