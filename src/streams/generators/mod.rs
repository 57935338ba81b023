mod imbalanced_gaussian_generator;

pub use imbalanced_gaussian_generator::ImbalancedGaussianGenerator;
