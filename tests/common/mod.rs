#![allow(dead_code)]

use firefly_opt::core::domain::{FaParams, SearchSpace};
use nalgebra::{DMatrix, DVector};

pub fn sphere(x: &DVector<f64>) -> f64 {
    x.norm_squared()
}

pub fn neg_sphere(x: &DVector<f64>) -> f64 {
    -x.norm_squared()
}

pub fn seeded(d: usize, iters: usize, seed: u64) -> FaParams {
    FaParams {
        d,
        n: 30,
        iters,
        seed: Some(seed),
        ..Default::default()
    }
}

pub fn unit_box(d: usize) -> SearchSpace {
    SearchSpace::new(vec![-1.0; d], vec![1.0; d]).expect("valid box")
}

pub fn matrix_within(m: &DMatrix<f64>, lower: f64, upper: f64) -> bool {
    m.iter().all(|v| *v >= lower && *v <= upper)
}
