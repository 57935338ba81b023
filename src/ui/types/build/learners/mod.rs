use crate::classifiers::{GaussianHellingerTree, TreeConfig};
use crate::ui::types::build::BuildError;

pub fn build_tree(config: TreeConfig) -> Result<GaussianHellingerTree, BuildError> {
    Ok(GaussianHellingerTree::new(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::hoeffding_tree::ConfigError;

    #[test]
    fn test_builds_default_tree() {
        let tree = build_tree(TreeConfig::default()).unwrap();
        assert_eq!(tree.config(), &TreeConfig::default());
    }

    #[test]
    fn test_invalid_config_is_a_build_error() {
        let err = build_tree(TreeConfig {
            grace_period: 0,
            ..TreeConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, BuildError::Config(ConfigError::GracePeriod)));
        assert!(err.to_string().starts_with("invalid tree configuration"));
    }
}
