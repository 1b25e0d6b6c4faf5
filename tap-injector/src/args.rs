use crate::{namespace::NamespaceLookup, Mutator};
use anyhow::{anyhow, Result};
use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[clap(name = "tap-injector", about = "Configures tap on injected proxies")]
pub struct Args {
    #[clap(
        long,
        default_value = "linkerd=info,warn",
        env = "LINKERD_TAP_INJECTOR_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    /// Name of the tap service that proxies should accept tap requests from
    #[clap(long, env = "LINKERD_TAP_INJECTOR_TAP_SVC_NAME")]
    tap_svc_name: String,
}

impl Args {
    /// Installs the global tracing subscriber.
    pub fn init_logging(&self) -> Result<()> {
        self.log_format
            .clone()
            .try_init(self.log_level.clone())
            .map_err(|e| anyhow!("failed to initialize logging: {e}"))
    }

    pub fn mutator<L: NamespaceLookup>(&self, namespaces: L) -> Mutator<L> {
        Mutator::new(self.tap_svc_name.clone(), namespaces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::Namespace;
    use std::{collections::HashMap, sync::Arc};

    #[test]
    fn tap_svc_name_required() {
        assert!(Args::try_parse_from(["tap-injector"]).is_err());
    }

    #[test]
    fn builds_mutator() {
        let args = Args::try_parse_from(["tap-injector", "--tap-svc-name", "linkerd-tap"])
            .expect("args must parse");
        let mutator = args.mutator(HashMap::<String, Arc<Namespace>>::new());
        assert_eq!(mutator.tap_svc_name(), "linkerd-tap");
    }
}
