//! Pager engine: collection endpoints and effect execution.
mod credentials;
mod endpoint;
mod engine;
mod http;

pub use credentials::{CredentialProvider, EnvToken, NoCredentials, StaticToken};
pub use endpoint::{CollectionEndpoint, EndpointSettings};
pub use engine::{ChannelEventSink, EngineError, EngineEvent, EngineHandle, EventSink};
pub use http::HttpCollection;
