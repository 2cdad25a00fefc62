pub mod flow;
pub mod pagination;
pub mod preview;
pub mod session;
pub mod staging;
pub mod workspace;
