pub mod loader;
pub mod propagator;
pub mod ranker;
