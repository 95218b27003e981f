// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Kubernetes client construction

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::{debug, info};

/// Timeout for connecting to K8s API
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a client for `context`, or infer one (kubeconfig current context, then in-cluster)
pub async fn connect(context: Option<&str>) -> Result<Client> {
    let mut config = match context {
        Some(context) => {
            let kubeconfig = Kubeconfig::read().context("Failed to read kubeconfig")?;
            if !kubeconfig.contexts.iter().any(|c| c.name == context) {
                return Err(anyhow!("Context '{}' not found in kubeconfig", context));
            }
            Config::from_custom_kubeconfig(
                kubeconfig,
                &KubeConfigOptions {
                    context: Some(context.to_string()),
                    ..Default::default()
                },
            )
            .await
            .with_context(|| format!("Failed to load kubeconfig for context '{}'", context))?
        }
        None => Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration")?,
    };

    // Watches are long-lived, so only the connect phase gets a tight bound
    config.connect_timeout = Some(CONNECT_TIMEOUT);

    debug!(cluster_url = %config.cluster_url, "Creating Kubernetes client");
    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    info!(context = ?context, "Kubernetes client ready");
    Ok(client)
}
