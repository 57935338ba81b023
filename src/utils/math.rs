/// Standard normal cumulative distribution evaluated at `a`.
pub fn normal_probability(a: f64) -> f64 {
    0.5 * (1.0 + libm::erf(a / (2.0f64).sqrt()))
}

pub fn log2(a: f64) -> f64 {
    a.ln() / std::f64::consts::LN_2
}

/// Index of the largest entry. The first maximum wins on ties and an empty
/// slice yields 0.
pub fn max_index(values: &[f64]) -> usize {
    let mut best = 0;
    let mut maximum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        if i == 0 || v > maximum {
            best = i;
            maximum = v;
        }
    }
    best
}
