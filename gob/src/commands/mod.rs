pub mod append;
pub mod create;
pub mod extract;
pub mod list;
pub mod remove;
pub mod shell;

pub use append::run as append;
pub use create::run as create;
pub use extract::run as extract;
pub use list::run as list;
pub use remove::run as remove;
pub use shell::run as shell;
