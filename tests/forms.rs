use funspace_forms::forms::{div, dx, grad, laplace, x, y, BasisFunction, Expr, Scale};
use funspace_forms::space::Space;
use funspace_forms::utils::approx_eq;
use funspace_forms::{dirichlet, fourier_r2c, legendre, Array, Complex64, FunspaceError};
use ndarray::{array, Array2};

fn space_3d() -> Space {
    Space::tensor(vec![
        dirichlet(8).unwrap(),
        legendre(6).unwrap(),
        fourier_r2c(8),
    ])
    .unwrap()
}

#[test]
fn add_then_subtract_restores_operand() {
    let space = space_3d();
    let u = BasisFunction::trial(&space);
    let first = Expr::from(&u) * (x() * y()) + dx(&Expr::from(&u), 2, 1).unwrap();
    let second = dx(&Expr::from(&u), 0, 2).unwrap() * 4.;
    let back = (first.clone() + second.clone()) - second;
    assert_eq!(back.terms(), first.terms());
    assert_eq!(back.scales(), first.scales());
    assert_eq!(back.indices(), first.indices());
}

#[test]
fn negation_is_involutive() {
    let space = space_3d();
    let v = BasisFunction::test(&space);
    let e = grad(&Expr::from(&v)).unwrap() * vec![x(), Scale::from(2.), y().sin()];
    let back = -(-e.clone());
    assert_eq!(back.terms(), e.terms());
    assert_eq!(back.scales(), e.scales());
    assert_eq!(back.indices(), e.indices());
}

#[test]
fn grad_in_3d() {
    let v = BasisFunction::test(&space_3d());
    let g = grad(&Expr::from(&v)).unwrap();
    assert_eq!(g.expr_rank().unwrap(), 1);
    assert_eq!(g.num_components(), 3);
    for c in 0..3 {
        assert_eq!(g.num_terms(), 1);
        let orders: Vec<usize> = g.terms().slice(ndarray::s![c, 0, ..]).to_vec();
        let mut expected = vec![0; 3];
        expected[c] = 1;
        assert_eq!(orders, expected);
    }
}

#[test]
fn div_grad_in_3d() {
    let v = BasisFunction::test(&space_3d());
    let l = div(&grad(&Expr::from(&v)).unwrap()).unwrap();
    assert_eq!(l.expr_rank().unwrap(), 0);
    assert_eq!(l.num_components(), 1);
    assert_eq!(l.terms(), array![[[2, 0, 0], [0, 2, 0], [0, 0, 2]]]);
    assert_eq!(laplace(&Expr::from(&v)).unwrap().terms(), l.terms());
}

#[test]
fn structural_mismatches_fail() {
    let space = space_3d();
    let v = BasisFunction::test(&space);
    let u = BasisFunction::trial(&space);
    assert!(Expr::from(&v).try_add(&Expr::from(&u)).is_err());
    assert!(matches!(v.get(0), Err(FunspaceError::NotComposite)));
    let w = BasisFunction::test(&Space::vector(&space));
    assert!(Expr::from(&v).try_add(&Expr::from(&w)).is_err());
}

#[test]
fn evaluate_known_function() {
    let space = Space::tensor(vec![dirichlet(10).unwrap(), fourier_r2c(8)]).unwrap();
    let mesh = space.mesh();
    let exact = |x: f64, y: f64| (1. - x * x) * (1. + x) * (2. * y).sin();
    let values = Array2::from_shape_fn((10, 8), |(i, j)| exact(mesh[0][i], mesh[1][j])).into_dyn();
    let f = Array::<f64>::from_array(&space, values)
        .unwrap()
        .forward::<Complex64>()
        .unwrap();
    let u = f.as_basis_function().unwrap();
    let points: Array2<f64> = array![[-0.4, 0.2, 0.75], [0.5, 3.0, 6.0]];
    let expected = points
        .columns()
        .into_iter()
        .map(|p| exact(p[0], p[1]))
        .collect::<ndarray::Array1<f64>>();
    approx_eq(&Expr::from(&u).eval::<f64>(&points).unwrap(), &expected);

    let uxy = dx(&dx(&Expr::from(&u), 0, 1).unwrap(), 1, 1).unwrap() * x();
    let expected = points
        .columns()
        .into_iter()
        .map(|p| p[0] * (1. - 2. * p[0] - 3. * p[0] * p[0]) * 2. * (2. * p[1]).cos())
        .collect::<ndarray::Array1<f64>>();
    approx_eq(&uxy.eval::<f64>(&points).unwrap(), &expected);
}
