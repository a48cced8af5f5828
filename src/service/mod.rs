//! Item and point services plus request validation.

mod crud;
mod validation;
pub use crud::{ItemService, PointService};
pub use validation::{validate_point_form, FieldKind, FieldRule, RequestValidator, POINT_RULES};
