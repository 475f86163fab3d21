mod profile;
mod session;
mod user;

pub use profile::*;
pub use session::*;
pub use user::*;
