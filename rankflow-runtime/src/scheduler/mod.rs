pub mod convergence_driver;
