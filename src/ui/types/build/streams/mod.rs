use crate::streams::Stream;
use crate::streams::arff::ArffFileStream;
use crate::streams::generators::ImbalancedGaussianGenerator;
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::StreamChoice;

mod arff_file;
mod imbalanced_gaussian;

pub fn build_stream(choice: StreamChoice) -> Result<Box<dyn Stream>, BuildError> {
    match choice {
        StreamChoice::ArffFile(p) => {
            let s = ArffFileStream::try_from(p)?;
            Ok(Box::new(s))
        }
        StreamChoice::ImbalancedGaussian(p) => {
            let s = ImbalancedGaussianGenerator::try_from(p)?;
            Ok(Box::new(s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::types::choices::{ArffParameters, ImbalancedGaussianParameters};
    use std::io::{ErrorKind, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_builds_generator() {
        let mut s = build_stream(StreamChoice::ImbalancedGaussian(ImbalancedGaussianParameters {
            max_instances: Some(2),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(s.header().number_of_attributes(), 3);
        assert!(s.next_instance().is_some());
        assert!(s.next_instance().is_some());
        assert!(s.next_instance().is_none());
    }

    #[test]
    fn test_bad_generator_params_are_io_errors() {
        let err = build_stream(StreamChoice::ImbalancedGaussian(ImbalancedGaussianParameters {
            minority_fraction: 1.5,
            ..Default::default()
        }))
        .err()
        .unwrap();
        assert!(matches!(err, BuildError::Io(e) if e.kind() == ErrorKind::InvalidInput));
    }

    #[test]
    fn test_builds_arff_stream() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"@relation r\n@attribute x numeric\n@attribute c {0,1}\n@data\n1,0\n")
            .unwrap();
        let s = build_stream(StreamChoice::ArffFile(ArffParameters {
            path: f.path().to_path_buf(),
            class_index: None,
        }))
        .unwrap();
        assert_eq!(s.header().relation_name(), "r");
    }

    #[test]
    fn test_arff_errors() {
        let err = build_stream(StreamChoice::ArffFile(ArffParameters::default()))
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::InvalidParameter(_)));

        let err = build_stream(StreamChoice::ArffFile(ArffParameters {
            path: "missing/file.arff".into(),
            class_index: None,
        }))
        .err()
        .unwrap();
        assert!(matches!(err, BuildError::Io(e) if e.kind() == ErrorKind::NotFound));
    }
}
