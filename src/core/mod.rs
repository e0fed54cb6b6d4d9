pub mod aggregate;
pub mod backup;
pub mod cache;
pub mod gate;
pub mod log;
pub mod normalize;
pub mod previous;
pub mod publish;
pub mod reconcile;
pub mod roster;
pub mod session;
