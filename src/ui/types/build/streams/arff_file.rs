use crate::streams::arff::ArffFileStream;
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::ArffParameters;

impl TryFrom<ArffParameters> for ArffFileStream {
    type Error = BuildError;

    fn try_from(p: ArffParameters) -> Result<Self, Self::Error> {
        if p.path.as_os_str().is_empty() {
            return Err(BuildError::InvalidParameter("ARFF path is empty".into()));
        }
        ArffFileStream::new(p.path, p.class_index).map_err(BuildError::from)
    }
}
