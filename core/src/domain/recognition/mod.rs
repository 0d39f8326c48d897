pub mod entities;
pub mod errors;
pub mod normalizer;
pub mod ports;
pub mod schema;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use ports::*;
pub use value_objects::*;
