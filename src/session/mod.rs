pub mod manager;
pub mod record;
pub mod types;


pub use manager::*;
pub use record::*;
pub use types::*;
