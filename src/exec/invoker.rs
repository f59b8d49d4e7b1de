// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};

use super::response::{RawResponse, HEADER_LOCKED, HEADER_STATE};
use crate::error::InvokeError;
use crate::model::ActivationTarget;

/// Performs the remote call behind a command activation.
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(&self, target: &ActivationTarget) -> Result<RawResponse, InvokeError>;
}

/// `POST <target>` with an empty body.
#[derive(Debug, Clone)]
pub struct HttpInvoker {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl Default for HttpInvoker {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl HttpInvoker {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client, timeout: None }
    }

    /// Requests that take longer than `timeout` are reported as connectivity failures.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Invoker for HttpInvoker {
    async fn invoke(&self, target: &ActivationTarget) -> Result<RawResponse, InvokeError> {
        let mut request = self.client.post(target.url().clone());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| InvokeError::Transport {
            target: target.to_string(),
            reason: err.to_string(),
        })?;

        let status = response.status().as_u16();
        let headers = response.headers();
        let content_type = header_text(headers, CONTENT_TYPE.as_str());
        let state = header_text(headers, HEADER_STATE);
        let locked = header_text(headers, HEADER_LOCKED);

        let body = response.text().await.map_err(|err| InvokeError::Body {
            target: target.to_string(),
            reason: err.to_string(),
        })?;

        tracing::debug!(%target, status, body_len = body.len(), "trigger response received");

        Ok(RawResponse { status, content_type, state, locked, body })
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
