mod factory;
mod log;
mod lot;
mod order;
mod product;
mod template;
mod transaction;

pub use factory::*;
pub use log::*;
pub use lot::*;
pub use order::*;
pub use product::*;
pub use template::*;
pub use transaction::*;
