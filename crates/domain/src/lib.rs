pub mod entities;
pub mod repositories;
pub mod services;
pub mod update_value;
pub mod validation;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use services::*;
pub use taskboard_core::{TaskboardError, TaskboardResult};
pub use update_value::UpdateValue;
pub use value_objects::*;
