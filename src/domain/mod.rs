pub mod completion;
pub mod idea;
pub mod routing;
pub mod ticket;
