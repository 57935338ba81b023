use crate::streams::generators::ImbalancedGaussianGenerator;
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::ImbalancedGaussianParameters;

impl TryFrom<ImbalancedGaussianParameters> for ImbalancedGaussianGenerator {
    type Error = BuildError;

    fn try_from(p: ImbalancedGaussianParameters) -> Result<Self, Self::Error> {
        let max_instances = p
            .max_instances
            .map(usize::try_from)
            .transpose()
            .map_err(|_| BuildError::InvalidParameter("max_instances does not fit in usize".into()))?;
        ImbalancedGaussianGenerator::new(
            p.num_features,
            p.minority_fraction,
            p.separation,
            max_instances,
            p.seed,
        )
        .map_err(BuildError::from)
    }
}
