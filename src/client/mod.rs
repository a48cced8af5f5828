//! Client side of Ecoleta: HTTP clients for the API and IBGE, and the state held by the
//! registration and browse screens.

pub mod api;
pub mod browse;
pub mod error;
pub mod form;
pub mod ibge;
pub mod selection;

pub use api::EcoletaClient;
pub use browse::PointsBrowser;
pub use error::ClientError;
pub use form::{CreatePointForm, FormField, ImageFile, PointSubmission};
pub use ibge::IbgeClient;
pub use selection::ItemSelection;
