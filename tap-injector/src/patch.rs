use crate::proxy::{TAP_DISABLED_ENV, TAP_SVC_NAME_ENV};
use json_patch::{jsonptr::PointerBuf, AddOperation, Patch, PatchOperation};
use k8s_openapi::api::core::v1::EnvVar;
use thiserror::Error;

/// Whether the proxy should serve tap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Enable,
    Disable,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to encode env var: {0}")]
    Env(#[from] serde_json::Error),

    #[error(transparent)]
    Patch(#[from] kube::core::admission::SerializePatchError),
}

// === impl Decision ===

impl Decision {
    pub fn from_disabled(disabled: bool) -> Self {
        if disabled {
            Self::Disable
        } else {
            Self::Enable
        }
    }

    fn env(self, tap_svc_name: &str) -> EnvVar {
        let (name, value) = match self {
            Self::Enable => (TAP_SVC_NAME_ENV, tap_svc_name),
            Self::Disable => (TAP_DISABLED_ENV, "true"),
        };
        EnvVar {
            name: name.to_string(),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }
}

/// Builds a patch appending the decision's env var to the proxy container.
///
/// The variable is appended (`env/-`) rather than replacing the env list so the
/// patch composes with other mutations applied in the same review.
pub fn compose(
    decision: Decision,
    proxy_index: usize,
    tap_svc_name: &str,
) -> Result<Patch, TemplateError> {
    let value = serde_json::to_value(decision.env(tap_svc_name))?;
    Ok(Patch(vec![PatchOperation::Add(AddOperation {
        path: env_path(proxy_index),
        value,
    })]))
}

fn env_path(proxy_index: usize) -> PointerBuf {
    let index = proxy_index.to_string();
    PointerBuf::from_tokens(["spec", "containers", index.as_str(), "env", "-"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn enabled() -> Result<()> {
        let patch = compose(
            Decision::Enable,
            1,
            "linkerd-tap.linkerd-viz.serviceaccount.identity.linkerd.cluster.local",
        )?;
        let patch_str = serde_json::to_string(&patch)?;
        assert_eq!(
            patch_str,
            r#"
[
    {
        "op": "add",
        "path": "/spec/containers/1/env/-",
        "value": {
            "name": "LINKERD2_PROXY_TAP_SVC_NAME",
            "value": "linkerd-tap.linkerd-viz.serviceaccount.identity.linkerd.cluster.local"
        }
    }
]
"#
            .replace('\n', "")
            .replace(' ', "")
        );
        Ok(())
    }

    #[test]
    fn disabled() -> Result<()> {
        let patch = compose(Decision::Disable, 0, "linkerd-tap")?;
        let patch_str = serde_json::to_string(&patch)?;
        assert_eq!(
            patch_str,
            r#"
[
    {
        "op": "add",
        "path": "/spec/containers/0/env/-",
        "value": {
            "name": "LINKERD2_PROXY_TAP_DISABLED",
            "value": "true"
        }
    }
]
"#
            .replace('\n', "")
            .replace(' ', "")
        );
        Ok(())
    }

    #[test]
    fn service_name_is_not_interpreted() -> Result<()> {
        let name = r#"svc","name":"evil"#;
        let patch = compose(Decision::Enable, 12, name)?;
        let ops = serde_json::to_value(&patch)?;
        assert_eq!(
            ops,
            serde_json::json!([{
                "op": "add",
                "path": "/spec/containers/12/env/-",
                "value": { "name": TAP_SVC_NAME_ENV, "value": name },
            }])
        );
        Ok(())
    }

    #[test]
    fn decision_from_disabled() {
        assert_eq!(Decision::from_disabled(true), Decision::Disable);
        assert_eq!(Decision::from_disabled(false), Decision::Enable);
    }
}
