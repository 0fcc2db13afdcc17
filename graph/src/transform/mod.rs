pub mod crunch;
pub mod prune;
pub mod squash;

pub use crunch::crunch;
pub use prune::prune;
pub use squash::squash;
