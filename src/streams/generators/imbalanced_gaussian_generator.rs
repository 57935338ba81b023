use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::stream::Stream;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

/// Binary stream with a rare positive class.
///
/// Every feature is drawn from a unit-variance Gaussian centred on 0 for
/// the majority class and on `separation` for the minority class. The class
/// is the last attribute.
#[derive(Debug)]
pub struct ImbalancedGaussianGenerator {
    seed: u64,
    rng: StdRng,
    num_features: usize,
    minority_fraction: f64,
    separation: f64,
    header: Arc<InstanceHeader>,
    max_instances: Option<usize>,
    produced: usize,
}

impl ImbalancedGaussianGenerator {
    pub fn new(
        num_features: usize,
        minority_fraction: f64,
        separation: f64,
        max_instances: Option<usize>,
        seed: u64,
    ) -> Result<Self, Error> {
        if num_features == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "At least one feature is required",
            ));
        }
        if !(minority_fraction > 0.0 && minority_fraction < 1.0) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Minority fraction must be in (0, 1)",
            ));
        }
        if !separation.is_finite() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Separation must be finite",
            ));
        }

        let mut attributes: Vec<AttributeRef> = (1..=num_features)
            .map(|i| Arc::new(NumericAttribute::new(format!("attrib{i}"))) as AttributeRef)
            .collect();
        attributes.push(Arc::new(NominalAttribute::from_labels(
            "class".into(),
            vec!["majority".into(), "minority".into()],
        )));
        let header = Arc::new(InstanceHeader::with_last_class(
            "ImbalancedGaussian".into(),
            attributes,
        ));

        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            num_features,
            minority_fraction,
            separation,
            header,
            max_instances,
            produced: 0,
        })
    }

    pub fn shared_header(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    /// Standard normal draw (Box-Muller).
    fn standard_normal(&mut self) -> f64 {
        let u1: f64 = 1.0 - self.rng.random::<f64>();
        let u2: f64 = self.rng.random();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }
}

impl Stream for ImbalancedGaussianGenerator {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.max_instances.is_none_or(|max| self.produced < max)
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        if !self.has_more_instances() {
            return None;
        }

        let minority = self.rng.random_bool(self.minority_fraction);
        let mean = if minority { self.separation } else { 0.0 };
        let mut values: Vec<f64> = (0..self.num_features)
            .map(|_| mean + self.standard_normal())
            .collect();
        values.push(if minority { 1.0 } else { 0.0 });

        self.produced += 1;
        Some(Box::new(DenseInstance::new(
            Arc::clone(&self.header),
            values,
            1.0,
        )))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(generator: &mut ImbalancedGaussianGenerator, n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|_| {
                let inst = generator.next_instance().expect("instance");
                (0..inst.number_of_attributes())
                    .map(|i| inst.value_at_index(i).unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_header_shape() {
        let generator = ImbalancedGaussianGenerator::new(3, 0.1, 2.0, None, 42).unwrap();
        let h = generator.header();
        assert_eq!(h.number_of_attributes(), 4);
        assert_eq!(h.class_index(), 3);
        assert_eq!(h.number_of_classes(), 2);
        assert_eq!(h.attribute_at_index(0).unwrap().name(), "attrib1");
        assert_eq!(h.class_label_index("minority"), Some(1));
    }

    #[test]
    fn test_minority_share_and_means() {
        let mut generator = ImbalancedGaussianGenerator::new(1, 0.1, 4.0, None, 7).unwrap();
        let rows = draw(&mut generator, 20_000);
        let (minority, majority): (Vec<_>, Vec<_>) = rows.iter().partition(|r| r[1] == 1.0);

        let share = minority.len() as f64 / rows.len() as f64;
        assert!((share - 0.1).abs() < 0.02, "share={share}");

        let mean = |rows: &[&Vec<f64>]| rows.iter().map(|r| r[0]).sum::<f64>() / rows.len() as f64;
        assert!(mean(&majority).abs() < 0.1);
        assert!((mean(&minority) - 4.0).abs() < 0.2);
    }

    #[test]
    fn test_max_instances_ends_stream() {
        let mut generator = ImbalancedGaussianGenerator::new(2, 0.5, 1.0, Some(3), 1).unwrap();
        assert_eq!(draw(&mut generator, 3).len(), 3);
        assert!(!generator.has_more_instances());
        assert!(generator.next_instance().is_none());
    }

    #[test]
    fn test_restart_replays_sequence() {
        let mut generator = ImbalancedGaussianGenerator::new(2, 0.2, 1.5, Some(100), 12345).unwrap();
        let first = draw(&mut generator, 30);
        generator.restart().unwrap();
        let second = draw(&mut generator, 30);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        for result in [
            ImbalancedGaussianGenerator::new(0, 0.1, 1.0, None, 1),
            ImbalancedGaussianGenerator::new(1, 0.0, 1.0, None, 1),
            ImbalancedGaussianGenerator::new(1, 1.0, 1.0, None, 1),
            ImbalancedGaussianGenerator::new(1, 0.1, f64::NAN, None, 1),
        ] {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);
        }
    }
}
