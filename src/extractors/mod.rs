pub mod point_form;

pub use point_form::{PointForm, IMAGE_FIELD};
