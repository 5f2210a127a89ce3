//! Runtime wiring: credential store, transport, gateway, and observability.

use std::sync::Arc;

use uchat::{ChatPolicy, ChatSessionDriver, ChatViewPort};
use ugateway::{
    FailureSink, FileTokenStorage, GatewayHooks, HttpTransport, InMemoryTokenStorage,
    RequestGateway, SessionContext, TokenStorage,
};
use uobserve::{SafeFailureSink, SafeGatewayHooks, TracingFailureSink, TracingGatewayHooks};
use uviews::{MeetingRow, NotificationLine, TaskRow, TeamRow};

use crate::{ClientConfig, ConfigError};

/// One dashboard client: a session credential and the gateway that carries it.
pub struct ClientRuntime {
    config: ClientConfig,
    session: Arc<SessionContext>,
    storage: Arc<dyn TokenStorage>,
    gateway: Arc<RequestGateway>,
}

impl ClientRuntime {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Self::builder(config.clone()).build()
    }

    pub fn builder(config: ClientConfig) -> ClientRuntimeBuilder {
        ClientRuntimeBuilder::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn gateway(&self) -> &Arc<RequestGateway> {
        &self.gateway
    }

    /// Stores the credential for subsequent calls and persists it.
    pub fn sign_in(&self, token: impl Into<String>) -> Result<(), ConfigError> {
        self.session.set_token(token)?;
        self.session
            .persist_to_key(self.storage.as_ref(), &self.config.credential_key)?;
        tracing::info!(phase = "session", event = "sign_in");
        Ok(())
    }

    /// Drops the credential; returns whether one was set.
    pub fn sign_out(&self) -> Result<bool, ConfigError> {
        let removed = self.session.clear_token()?;
        self.session
            .persist_to_key(self.storage.as_ref(), &self.config.credential_key)?;
        tracing::info!(phase = "session", event = "sign_out", removed);
        Ok(removed)
    }

    pub fn chat_driver(&self, view: Arc<dyn ChatViewPort>) -> ChatSessionDriver {
        self.chat_driver_with_policy(view, ChatPolicy::default())
    }

    pub fn chat_driver_with_policy(
        &self,
        view: Arc<dyn ChatViewPort>,
        policy: ChatPolicy,
    ) -> ChatSessionDriver {
        ChatSessionDriver::builder(self.gateway.clone(), view)
            .policy(policy)
            .build()
    }

    pub async fn load_meetings(&self) -> Vec<MeetingRow> {
        uviews::load_meetings(self.gateway.as_ref()).await
    }

    pub async fn load_tasks(&self) -> Vec<TaskRow> {
        uviews::load_tasks(self.gateway.as_ref()).await
    }

    pub async fn load_teams(&self) -> Vec<TeamRow> {
        uviews::load_teams(self.gateway.as_ref()).await
    }

    pub async fn load_notifications(&self) -> Vec<NotificationLine> {
        uviews::load_notifications(self.gateway.as_ref()).await
    }
}

impl std::fmt::Debug for ClientRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRuntime")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

pub struct ClientRuntimeBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    storage: Option<Arc<dyn TokenStorage>>,
    hooks: Arc<dyn GatewayHooks>,
    failure_sink: Arc<dyn FailureSink>,
}

impl ClientRuntimeBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            storage: None,
            hooks: Arc::new(SafeGatewayHooks::new(TracingGatewayHooks)),
            failure_sink: Arc::new(SafeFailureSink::new(TracingFailureSink)),
        }
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[cfg(feature = "reqwest-transport")]
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.transport(Arc::new(ugateway::ReqwestTransport::new(client)))
    }

    /// Overrides the credential store derived from `token_file`.
    pub fn storage(mut self, storage: Arc<dyn TokenStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn GatewayHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn failure_sink(mut self, failure_sink: Arc<dyn FailureSink>) -> Self {
        self.failure_sink = failure_sink;
        self
    }

    pub fn build(self) -> Result<ClientRuntime, ConfigError> {
        self.config.validate()?;

        let storage = match self.storage {
            Some(storage) => storage,
            None => match &self.config.token_file {
                Some(path) => Arc::new(FileTokenStorage::new(path)) as Arc<dyn TokenStorage>,
                None => Arc::new(InMemoryTokenStorage::new()),
            },
        };

        let session = Arc::new(SessionContext::load_from_key(
            storage.as_ref(),
            &self.config.credential_key,
        )?);

        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport()?,
        };

        let gateway = RequestGateway::builder(self.config.api_base_url.clone(), transport)
            .session(session.clone())
            .hooks(self.hooks)
            .failure_sink(self.failure_sink)
            .build();

        tracing::info!(
            phase = "runtime",
            event = "built",
            api_base_url = self.config.api_base_url.as_str(),
            authenticated = session.has_token().unwrap_or(false)
        );

        Ok(ClientRuntime {
            config: self.config,
            session,
            storage,
            gateway: Arc::new(gateway),
        })
    }
}

#[cfg(feature = "reqwest-transport")]
fn default_transport() -> Result<Arc<dyn HttpTransport>, ConfigError> {
    Ok(Arc::new(ugateway::ReqwestTransport::default()))
}

#[cfg(not(feature = "reqwest-transport"))]
fn default_transport() -> Result<Arc<dyn HttpTransport>, ConfigError> {
    Err(ConfigError::invalid(
        "no HTTP transport configured; enable `reqwest-transport` or call `transport`",
    ))
}
