//! # noterag-cli
//!
//! A terminal client for `noterag-server`: a small form, a query controller
//! that tracks the `Idle → Loading → Success | Failure` lifecycle, and a
//! plain-text renderer for answers.

pub mod api_client;
pub mod form;
pub mod query_state;
pub mod render;

pub use api_client::{ApiClient, ClientError, QueryTransport};
pub use form::SearchForm;
pub use query_state::{QuerySnapshot, QueryState, RagQuery};
