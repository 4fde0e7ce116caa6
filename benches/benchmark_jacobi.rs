use criterion::{black_box, criterion_group, criterion_main, Criterion};
use funspace_forms::jacobi::polynomial::jacobi_derivative_vandermonde;
use funspace_forms::jacobi::quadrature::gauss_jacobi;
use funspace_forms::jacobi::CompositeJacobi;
use funspace_forms::{Complex64, Transform};
use ndarray::{Array1, ArrayD};

const SIZES: [usize; 3] = [32, 64, 128];

pub fn bench_quadrature(c: &mut Criterion) {
    let mut group = c.benchmark_group("GaussJacobi");
    group.significance_level(0.1).sample_size(10);
    for n in SIZES.iter() {
        let name = format!("Size: {}", *n);
        group.bench_function(&name, |b| b.iter(|| gauss_jacobi(black_box(*n), 1., 1.)));
    }
    group.finish();
}

pub fn bench_vandermonde(c: &mut Criterion) {
    let mut group = c.benchmark_group("Vandermonde");
    group.significance_level(0.1).sample_size(10);
    for n in SIZES.iter() {
        let name = format!("Size: {}", *n);
        let x = Array1::linspace(-1., 1., *n);
        group.bench_function(&name, |b| {
            b.iter(|| jacobi_derivative_vandermonde(black_box(&x), 2., 2., *n, 2))
        });
    }
    group.finish();
}

pub fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("ForwardBackward");
    group.significance_level(0.1).sample_size(10);
    for n in SIZES.iter() {
        let name = format!("Size: {} x {}", *n, *n);
        let base = CompositeJacobi::dirichlet(*n).unwrap();
        let values = ArrayD::from_elem(vec![*n, *n], Complex64::new(1., 0.));
        group.bench_function(&name, |b| {
            b.iter(|| {
                let coeffs = base.forward_axis(black_box(&values), 0).unwrap();
                base.backward_axis(&coeffs, 1).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_quadrature, bench_vandermonde, bench_transform);
criterion_main!(benches);
