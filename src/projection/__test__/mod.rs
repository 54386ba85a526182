use super::*;
use crate::config::SupportPolicy;
use crate::error::ZernikeError;
use crate::index::ZernikeIndex;
use crate::ops::zernike::zernike_coeff_lm;
use approx::assert_relative_eq;
use ndarray::{arr1, Array1};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use std::f64::consts::PI;


pub(super) struct Cloud {
    pub r: Array1<f64>,
    pub t: Array1<f64>,
    pub p: Array1<f64>,
    pub w: Array1<f64>,
}

impl Cloud {
    pub fn random(seed: u64, n_points: usize, r_max: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            r: Array1::random_using(n_points, Uniform::new(0.0, 0.95 * r_max), &mut rng),
            t: Array1::random_using(n_points, Uniform::new(0.0, PI), &mut rng),
            p: Array1::random_using(n_points, Uniform::new(0.0, 2.0 * PI), &mut rng),
            w: Array1::random_using(n_points, Uniform::new(-2.0, 2.0), &mut rng),
        }
    }

    pub fn neighborhood(&self) -> Neighborhood<'_> {
        Neighborhood::new(self.r.view(), self.t.view(), self.p.view())
            .unwrap()
            .with_weights(self.w.view())
            .unwrap()
    }
}

/// Every valid triple with `n <= n_max`, vanishing ones included.
fn all_triples(n_max: u32) -> IndexSupport {
    let mut indices = Vec::new();
    for n in 0..=n_max {
        for l in 0..=n {
            for m in -(l as i32)..=l as i32 {
                indices.push(ZernikeIndex { n, l, m });
            }
        }
    }
    IndexSupport::new(indices).unwrap()
}

fn assert_coeffs_close(a: &Array1<Complex64>, b: &Array1<Complex64>) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(x.re, y.re, epsilon = 1e-12, max_relative = 1e-9);
        assert_relative_eq!(x.im, y.im, epsilon = 1e-12, max_relative = 1e-9);
    }
}

#[test]
fn test_batched_matches_single_term_oracle() {
    let config = ProjectionConfig::default();
    let support = all_triples(4);
    let plan = ProjectionPlan::new(support.clone()).unwrap();

    for seed in 0..5 {
        let cloud = Cloud::random(seed, 40, config.r_max);
        let nb = cloud.neighborhood();
        let batched = plan.project(&nb, &config).unwrap();

        let oracle: Array1<Complex64> = support
            .iter()
            .map(|idx| zernike_coeff_lm(&nb, idx.n, idx.l, idx.m, &config).unwrap())
            .collect();
        assert_coeffs_close(&batched.coefficients, &oracle);
        assert_eq!(batched.excluded, 0);
    }
}

#[test]
fn test_dedup_counts() {
    let plan = ProjectionPlan::new(IndexSupport::hologram(&[0, 1, 2, 3, 4], 4)).unwrap();
    assert_eq!(plan.len(), 35);
    assert_eq!(plan.unique_nl(), 9);
    assert_eq!(plan.unique_l(), 5);
    assert_eq!(plan.unique_lm(), 25);

    // vanishing terms never reach the tables
    let support = IndexSupport::from_arrays(&[3, 2, 3], &[0, 0, 2], &[0, 0, 1]).unwrap();
    let plan = ProjectionPlan::new(support).unwrap();
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.unique_nl(), 1);
    assert_eq!(plan.unique_lm(), 1);
}

#[test]
fn test_parity_zero_in_batched_path() {
    let cloud = Cloud::random(11, 25, 10.0);
    let support = all_triples(5);
    let projection = project(&cloud.neighborhood(), &support, &ProjectionConfig::default()).unwrap();

    for (idx, coeff) in support.iter().zip(projection.coefficients.iter()) {
        if idx.is_vanishing() {
            assert_eq!(*coeff, Complex64::zero(), "{} should vanish", idx);
        }
    }
}

#[test]
fn test_output_follows_request_order() {
    let cloud = Cloud::random(3, 12, 10.0);
    let nb = cloud.neighborhood();
    let config = ProjectionConfig::default();

    let forward = IndexSupport::from_arrays(&[4, 2, 0, 3], &[2, 2, 0, 1], &[-1, 2, 0, 1]).unwrap();
    let reversed = IndexSupport::from_arrays(&[3, 0, 2, 4], &[1, 0, 2, 2], &[1, 0, 2, -1]).unwrap();

    let a = project(&nb, &forward, &config).unwrap().coefficients;
    let b = project(&nb, &reversed, &config).unwrap().coefficients;
    for k in 0..4 {
        assert_eq!(a[k], b[3 - k]);
    }
}

#[test]
fn test_single_point_regression() {
    let r = arr1(&[5.0]);
    let t = arr1(&[PI / 2.0]);
    let p = arr1(&[0.0]);
    let nb = Neighborhood::new(r.view(), t.view(), p.view()).unwrap();
    let support = IndexSupport::from_arrays(&[0], &[0], &[0]).unwrap();

    let projection = project(&nb, &support, &ProjectionConfig::new(10.0).unwrap()).unwrap();
    assert_relative_eq!(projection.coefficients[0].re, 0.4886025119029199, epsilon = 1e-15);
    assert_relative_eq!(projection.coefficients[0].im, 0.0);
}

#[test]
fn test_scale_invariance() {
    let support = all_triples(4);
    let cloud = Cloud::random(7, 30, 10.0);
    let base = project(&cloud.neighborhood(), &support, &ProjectionConfig::new(10.0).unwrap()).unwrap();

    let scaled = Cloud {
        r: &cloud.r * 2.5,
        t: cloud.t.clone(),
        p: cloud.p.clone(),
        w: cloud.w.clone(),
    };
    let rescaled = project(&scaled.neighborhood(), &support, &ProjectionConfig::new(25.0).unwrap()).unwrap();

    assert_coeffs_close(&base.coefficients, &rescaled.coefficients);
}

#[test]
fn test_weight_linearity() {
    let support = all_triples(4);
    let config = ProjectionConfig::default();
    let cloud = Cloud::random(21, 20, config.r_max);
    let base = project(&cloud.neighborhood(), &support, &config).unwrap();

    let doubled = Cloud {
        r: cloud.r.clone(),
        t: cloud.t.clone(),
        p: cloud.p.clone(),
        w: &cloud.w * 2.0,
    };
    let twice = project(&doubled.neighborhood(), &support, &config).unwrap();
    assert_eq!(twice.coefficients, base.coefficients.mapv(|c| c * 2.0));

    // unweighted == weights of one
    let ones = Cloud {
        r: cloud.r.clone(),
        t: cloud.t.clone(),
        p: cloud.p.clone(),
        w: Array1::ones(cloud.r.len()),
    };
    let unweighted = Neighborhood::new(cloud.r.view(), cloud.t.view(), cloud.p.view()).unwrap();
    assert_eq!(
        project(&unweighted, &support, &config).unwrap(),
        project(&ones.neighborhood(), &support, &config).unwrap()
    );
}

#[test]
fn test_split_point_reproduces_coefficient() {
    let support = all_triples(4);
    let config = ProjectionConfig::default();
    let cloud = Cloud::random(5, 10, config.r_max);
    let base = project(&cloud.neighborhood(), &support, &config).unwrap();

    // point 0 split into two coincident halves, kept at the front
    let mut r = vec![cloud.r[0]];
    let mut t = vec![cloud.t[0]];
    let mut p = vec![cloud.p[0]];
    let mut w = vec![cloud.w[0] / 2.0, cloud.w[0] / 2.0];
    r.extend(cloud.r.iter());
    t.extend(cloud.t.iter());
    p.extend(cloud.p.iter());
    w.extend(cloud.w.iter().skip(1));
    let split = Cloud {
        r: Array1::from(r),
        t: Array1::from(t),
        p: Array1::from(p),
        w: Array1::from(w),
    };

    let rebuilt = project(&split.neighborhood(), &support, &config).unwrap();
    assert_eq!(rebuilt.coefficients, base.coefficients);
}

#[test]
fn test_empty_cloud_yields_zeros() {
    let empty = Array1::<f64>::zeros(0);
    let nb = Neighborhood::new(empty.view(), empty.view(), empty.view()).unwrap();
    let projection = project(&nb, &all_triples(4), &ProjectionConfig::default()).unwrap();

    assert_eq!(projection.coefficients.len(), 55);
    assert!(projection.coefficients.iter().all(|c| *c == Complex64::zero()));
    assert_eq!(projection.excluded, 0);
}

#[test]
fn test_out_of_range_points() {
    let support = all_triples(3);
    let inside = Cloud::random(9, 8, 10.0);

    let mut r = inside.r.to_vec();
    let mut t = inside.t.to_vec();
    let mut p = inside.p.to_vec();
    let mut w = inside.w.to_vec();
    // boundary point and one beyond
    r.extend([10.0, 13.0]);
    t.extend([0.5, 1.5]);
    p.extend([0.1, 0.2]);
    w.extend([1.0, 1.0]);
    let outside = Cloud {
        r: Array1::from(r),
        t: Array1::from(t),
        p: Array1::from(p),
        w: Array1::from(w),
    };

    let exclude = ProjectionConfig::default();
    let expected = project(&inside.neighborhood(), &support, &exclude).unwrap();
    let got = project(&outside.neighborhood(), &support, &exclude).unwrap();
    assert_eq!(got.coefficients, expected.coefficients);
    assert_eq!(got.excluded, 2);

    let reject = exclude.with_policy(SupportPolicy::Reject);
    assert_eq!(
        project(&outside.neighborhood(), &support, &reject).unwrap_err(),
        ZernikeError::OutOfSupport {
            point: 8,
            r: 10.0,
            r_max: 10.0
        }
    );
}

#[test]
fn test_non_finite_prefactor_is_reported() {
    let huge = IndexSupport::new(vec![ZernikeIndex { n: 3000, l: 1000, m: 0 }]).unwrap();
    assert!(matches!(
        ProjectionPlan::new(huge),
        Err(ZernikeError::NonFinite { factor: "prefactor", point: None, .. })
    ));

    let r = arr1(&[5.0]);
    let t = arr1(&[1.0]);
    let nb = Neighborhood::new(r.view(), t.view(), t.view()).unwrap();
    assert!(matches!(
        zernike_coeff_lm(&nb, 3000, 1000, 0, &ProjectionConfig::default()),
        Err(ZernikeError::NonFinite { .. })
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let cloud = Cloud::random(1, 4, 10.0);
    let config = ProjectionConfig {
        r_max: -1.0,
        policy: SupportPolicy::Exclude,
    };
    assert!(matches!(
        project(&cloud.neighborhood(), &all_triples(1), &config),
        Err(ZernikeError::InvalidConfig(_))
    ));
}

#[test]
fn test_reconstruct_at_source_point() {
    // one unit-weight point: c_k = conj(Z_k(x)), so f(x) = Σ |c_k|²
    let r = arr1(&[4.2]);
    let t = arr1(&[1.1]);
    let p = arr1(&[2.7]);
    let nb = Neighborhood::new(r.view(), t.view(), p.view()).unwrap();
    let config = ProjectionConfig::default();
    let plan = ProjectionPlan::new(all_triples(6)).unwrap();

    let coeffs = plan.project(&nb, &config).unwrap().coefficients;
    let value = plan.reconstruct(&coeffs.view(), &nb, &config).unwrap();
    let energy: f64 = coeffs.iter().map(|c| c.norm_sqr()).sum();

    assert_eq!(value.len(), 1);
    assert_relative_eq!(value[0].re, energy, max_relative = 1e-9);
    assert_relative_eq!(value[0].im, 0.0, epsilon = 1e-9 * energy);
}

#[test]
fn test_reconstruct_is_hermitian() {
    let config = ProjectionConfig::default();
    let plan = ProjectionPlan::new(IndexSupport::hologram(&[0, 1, 2, 3, 4, 5], 5)).unwrap();

    let (ra, ta, pa) = (arr1(&[2.0]), arr1(&[0.6]), arr1(&[1.0]));
    let (rb, tb, pb) = (arr1(&[7.0]), arr1(&[2.4]), arr1(&[5.1]));
    let a = Neighborhood::new(ra.view(), ta.view(), pa.view()).unwrap();
    let b = Neighborhood::new(rb.view(), tb.view(), pb.view()).unwrap();

    let ca = plan.project(&a, &config).unwrap().coefficients;
    let cb = plan.project(&b, &config).unwrap().coefficients;
    let ab = plan.reconstruct(&ca.view(), &b, &config).unwrap()[0];
    let ba = plan.reconstruct(&cb.view(), &a, &config).unwrap()[0];

    assert_relative_eq!(ab.re, ba.re, epsilon = 1e-9);
    assert_relative_eq!(ab.im, -ba.im, epsilon = 1e-9);
}

#[test]
fn test_reconstruct_outside_support_and_shape() {
    let config = ProjectionConfig::default();
    let plan = ProjectionPlan::new(all_triples(3)).unwrap();
    let cloud = Cloud::random(13, 6, config.r_max);
    let coeffs = plan.project(&cloud.neighborhood(), &config).unwrap().coefficients;

    let r = arr1(&[3.0, 10.0, 14.0]);
    let t = arr1(&[0.5, 0.5, 0.5]);
    let points = Neighborhood::new(r.view(), t.view(), t.view()).unwrap();
    let values = plan.reconstruct(&coeffs.view(), &points, &config).unwrap();
    assert_eq!(values[1], Complex64::zero());
    assert_eq!(values[2], Complex64::zero());

    let reject = config.with_policy(SupportPolicy::Reject);
    assert!(matches!(
        plan.reconstruct(&coeffs.view(), &points, &reject),
        Err(ZernikeError::OutOfSupport { point: 1, .. })
    ));

    let short = Array1::from_elem(3, Complex64::zero());
    assert_eq!(
        plan.reconstruct(&short.view(), &points, &config).unwrap_err(),
        ZernikeError::ShapeMismatch {
            what: "coefficients",
            expected: plan.len(),
            found: 3
        }
    );
}
