// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Engine Configuration
//!
//! The typed knobs this engine needs at runtime. Loading values from
//! environment variables or files is external to this crate (out of
//! scope, per the admission layer being interfaces-only); this module
//! only owns the struct, its defaults, and validation.

use std::collections::HashMap;
use std::time::Duration;

/// Validated, immutable runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    bind_address: String,
    bind_port: u16,
    tls_cert_path: Option<String>,
    tls_key_path: Option<String>,
    auth_verification_disabled: bool,
    issuer_jwks_urls: HashMap<String, String>,
    authorization_base_url: String,
    cookie_domain_override: Option<String>,
    credentials_key_material: String,
    datasource_pool_size: u32,
    llm_endpoint: String,
    llm_request_timeout: Duration,
    relationship_discovery_batch_size: usize,
    relationship_discovery_worker_count: usize,
    dag_lease_timeout: chrono::Duration,
    dag_heartbeat_interval: Duration,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    pub fn bind_port(&self) -> u16 {
        self.bind_port
    }

    pub fn tls_cert_path(&self) -> Option<&str> {
        self.tls_cert_path.as_deref()
    }

    pub fn tls_key_path(&self) -> Option<&str> {
        self.tls_key_path.as_deref()
    }

    pub fn auth_verification_disabled(&self) -> bool {
        self.auth_verification_disabled
    }

    pub fn jwks_url_for_issuer(&self, issuer: &str) -> Option<&str> {
        self.issuer_jwks_urls.get(issuer).map(String::as_str)
    }

    pub fn authorization_base_url(&self) -> &str {
        &self.authorization_base_url
    }

    pub fn cookie_domain_override(&self) -> Option<&str> {
        self.cookie_domain_override.as_deref()
    }

    pub fn credentials_key_material(&self) -> &str {
        &self.credentials_key_material
    }

    pub fn datasource_pool_size(&self) -> u32 {
        self.datasource_pool_size
    }

    pub fn llm_endpoint(&self) -> &str {
        &self.llm_endpoint
    }

    pub fn llm_request_timeout(&self) -> Duration {
        self.llm_request_timeout
    }

    pub fn relationship_discovery_batch_size(&self) -> usize {
        self.relationship_discovery_batch_size
    }

    pub fn relationship_discovery_worker_count(&self) -> usize {
        self.relationship_discovery_worker_count
    }

    pub fn dag_lease_timeout(&self) -> chrono::Duration {
        self.dag_lease_timeout
    }

    pub fn dag_heartbeat_interval(&self) -> Duration {
        self.dag_heartbeat_interval
    }
}

#[derive(Debug)]
pub struct ConfigBuilder {
    bind_address: String,
    bind_port: u16,
    tls_cert_path: Option<String>,
    tls_key_path: Option<String>,
    auth_verification_disabled: bool,
    issuer_jwks_urls: HashMap<String, String>,
    authorization_base_url: Option<String>,
    cookie_domain_override: Option<String>,
    credentials_key_material: Option<String>,
    datasource_pool_size: u32,
    llm_endpoint: Option<String>,
    llm_request_timeout: Duration,
    relationship_discovery_batch_size: usize,
    relationship_discovery_worker_count: usize,
    dag_lease_timeout: chrono::Duration,
    dag_heartbeat_interval: Duration,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 8443,
            tls_cert_path: None,
            tls_key_path: None,
            auth_verification_disabled: false,
            issuer_jwks_urls: HashMap::new(),
            authorization_base_url: None,
            cookie_domain_override: None,
            credentials_key_material: None,
            datasource_pool_size: 10,
            llm_endpoint: None,
            llm_request_timeout: Duration::from_secs(30),
            relationship_discovery_batch_size: 8,
            relationship_discovery_worker_count: 4,
            dag_lease_timeout: chrono::Duration::seconds(60),
            dag_heartbeat_interval: Duration::from_secs(15),
        }
    }
}

impl ConfigBuilder {
    pub fn bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = address.into();
        self
    }

    pub fn bind_port(mut self, port: u16) -> Self {
        self.bind_port = port;
        self
    }

    pub fn tls(mut self, cert_path: impl Into<String>, key_path: impl Into<String>) -> Self {
        self.tls_cert_path = Some(cert_path.into());
        self.tls_key_path = Some(key_path.into());
        self
    }

    pub fn auth_verification_disabled(mut self, disabled: bool) -> Self {
        self.auth_verification_disabled = disabled;
        self
    }

    pub fn issuer_jwks_url(mut self, issuer: impl Into<String>, jwks_url: impl Into<String>) -> Self {
        self.issuer_jwks_urls.insert(issuer.into(), jwks_url.into());
        self
    }

    pub fn authorization_base_url(mut self, url: impl Into<String>) -> Self {
        self.authorization_base_url = Some(url.into());
        self
    }

    pub fn cookie_domain_override(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain_override = Some(domain.into());
        self
    }

    pub fn credentials_key_material(mut self, key_material: impl Into<String>) -> Self {
        self.credentials_key_material = Some(key_material.into());
        self
    }

    pub fn datasource_pool_size(mut self, size: u32) -> Self {
        self.datasource_pool_size = size;
        self
    }

    pub fn llm_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.llm_endpoint = Some(endpoint.into());
        self
    }

    pub fn llm_request_timeout(mut self, timeout: Duration) -> Self {
        self.llm_request_timeout = timeout;
        self
    }

    pub fn relationship_discovery_batch_size(mut self, size: usize) -> Self {
        self.relationship_discovery_batch_size = size;
        self
    }

    pub fn relationship_discovery_worker_count(mut self, count: usize) -> Self {
        self.relationship_discovery_worker_count = count;
        self
    }

    pub fn dag_lease_timeout(mut self, timeout: chrono::Duration) -> Self {
        self.dag_lease_timeout = timeout;
        self
    }

    pub fn dag_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.dag_heartbeat_interval = interval;
        self
    }

    /// Validates required fields and cross-field constraints (spec §2.3).
    pub fn try_build(self) -> Result<Config, String> {
        let authorization_base_url = self.authorization_base_url.ok_or("authorization_base_url is required")?;
        let credentials_key_material = self.credentials_key_material.ok_or("credentials_key_material is required")?;
        let llm_endpoint = self.llm_endpoint.ok_or("llm_endpoint is required")?;

        if self.datasource_pool_size == 0 {
            return Err("datasource_pool_size must be at least 1".to_string());
        }
        if self.relationship_discovery_worker_count == 0 {
            return Err("relationship_discovery_worker_count must be at least 1".to_string());
        }
        if self.tls_cert_path.is_some() != self.tls_key_path.is_some() {
            return Err("tls cert and key paths must be set together".to_string());
        }
        if self.dag_heartbeat_interval.as_secs() as i64 * 2 > self.dag_lease_timeout.num_seconds() {
            return Err("dag_heartbeat_interval must be at most half of dag_lease_timeout".to_string());
        }

        Ok(Config {
            bind_address: self.bind_address,
            bind_port: self.bind_port,
            tls_cert_path: self.tls_cert_path,
            tls_key_path: self.tls_key_path,
            auth_verification_disabled: self.auth_verification_disabled,
            issuer_jwks_urls: self.issuer_jwks_urls,
            authorization_base_url,
            cookie_domain_override: self.cookie_domain_override,
            credentials_key_material,
            datasource_pool_size: self.datasource_pool_size,
            llm_endpoint,
            llm_request_timeout: self.llm_request_timeout,
            relationship_discovery_batch_size: self.relationship_discovery_batch_size,
            relationship_discovery_worker_count: self.relationship_discovery_worker_count,
            dag_lease_timeout: self.dag_lease_timeout,
            dag_heartbeat_interval: self.dag_heartbeat_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_builder() -> ConfigBuilder {
        Config::builder()
            .authorization_base_url("https://auth.example")
            .credentials_key_material("key-material")
            .llm_endpoint("https://llm.example")
    }

    #[test]
    fn minimal_config_builds_with_defaults() {
        let config = minimal_builder().try_build().unwrap();
        assert_eq!(config.bind_port(), 8443);
        assert_eq!(config.datasource_pool_size(), 10);
    }

    #[test]
    fn missing_required_field_fails() {
        let result = Config::builder().try_build();
        assert!(result.is_err());
    }

    #[test]
    fn mismatched_tls_paths_fail() {
        let result = minimal_builder().tls_cert_path_only_for_test().try_build();
        assert!(result.is_err());
    }

    #[test]
    fn zero_pool_size_fails() {
        let result = minimal_builder().datasource_pool_size(0).try_build();
        assert!(result.is_err());
    }

    impl ConfigBuilder {
        fn tls_cert_path_only_for_test(mut self) -> Self {
            self.tls_cert_path = Some("/cert.pem".to_string());
            self
        }
    }
}
