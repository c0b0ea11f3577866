pub mod prospecting;
pub mod snapshot;
