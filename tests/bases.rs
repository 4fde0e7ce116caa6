use funspace_forms::enums::{BcKind, BcSpec};
use funspace_forms::jacobi::polynomial::jacobi;
use funspace_forms::jacobi::{CompositeJacobi, Jacobi};
use funspace_forms::space::Space;
use funspace_forms::utils::{approx_eq, approx_eq_tol};
use funspace_forms::{BaseBasics, Complex64, FunspaceError, Function};
use ndarray::{Array1, Axis};

fn constrained_bases(n: usize) -> Vec<CompositeJacobi> {
    vec![
        CompositeJacobi::dirichlet(n).unwrap(),
        CompositeJacobi::neumann(n).unwrap(),
        CompositeJacobi::biharmonic(n).unwrap(),
    ]
}

#[test]
fn to_ortho_reproduces_values() {
    let n = 14;
    let legendre = Jacobi::legendre(n).unwrap();
    let x = Array1::<f64>::linspace(-1., 1., 21);
    let ortho = legendre.evaluate_basis_all(&x);
    for base in constrained_bases(n) {
        let direct = base.evaluate_basis_all(&x);
        for i in base.slice() {
            let mut coeffs = Array1::<Complex64>::zeros(n);
            coeffs[i] = Complex64::new(1., 0.);
            let legendre_coeffs = base.to_ortho(&coeffs.view()).unwrap().mapv(|c| c.re);
            let values = ortho.dot(&legendre_coeffs);
            approx_eq_tol(&values, &direct.index_axis(Axis(1), i), 1e-10);
        }
    }
}

#[test]
fn boundary_conditions_hold() {
    let n = 16;
    let dirichlet = CompositeJacobi::dirichlet(n).unwrap();
    let neumann = CompositeJacobi::neumann(n).unwrap();
    let biharmonic = CompositeJacobi::biharmonic(n).unwrap();
    for x in [-1., 1.] {
        for i in dirichlet.slice() {
            assert!(dirichlet.evaluate_basis(i, x).abs() < 1e-12);
        }
        for i in neumann.slice() {
            assert!(neumann.evaluate_basis_derivative(i, x, 1).abs() < 1e-10);
        }
        for i in biharmonic.slice() {
            assert!(biharmonic.evaluate_basis(i, x).abs() < 1e-12);
            assert!(biharmonic.evaluate_basis_derivative(i, x, 1).abs() < 1e-10);
        }
    }
}

#[test]
fn biharmonic_first_mode_matches_closed_form() {
    let base = CompositeJacobi::biharmonic(32).unwrap();
    let (x, _) = base.points_and_weights();
    let values = base.evaluate_basis_all(&x).index_axis(Axis(1), 0).to_owned();
    let expected = x.mapv(|x| (1. - x * x).powi(2) * jacobi(0, 2., 2., x));
    approx_eq_tol(&values, &expected, 1e-10);
    assert!(base.evaluate_basis(0, -1.).abs() < 1e-14);
    assert!(base.evaluate_basis(0, 1.).abs() < 1e-14);
}

#[test]
fn inhomogeneous_dirichlet_is_rejected() {
    let result = CompositeJacobi::new(8, BcKind::Dirichlet, &BcSpec::from((1., 0.)));
    assert!(matches!(result, Err(FunspaceError::BoundaryCondition(_))));
    let wrong_arity = CompositeJacobi::new(8, BcKind::Dirichlet, &BcSpec::from(vec![0.; 4]));
    assert!(wrong_arity.is_err());
    assert!(CompositeJacobi::new(8, BcKind::Dirichlet, &"dirichlet".into()).is_ok());
}

#[test]
fn refine_roundtrip() {
    let space = Space::line(CompositeJacobi::biharmonic(10).unwrap().into()).unwrap();
    let mut f = Function::<f64>::new(&space).unwrap();
    for (i, v) in f.v.iter_mut().take(6).enumerate() {
        *v = 1. / (i + 1) as f64;
    }
    let large = f.refine(&[24]).unwrap();
    assert!(large.v.iter().skip(6).all(|v| *v == 0.));
    let back = large.refine(&[10]).unwrap();
    assert_eq!(back.v, f.v);
}

#[test]
fn order6_has_no_recurrence() {
    let base = CompositeJacobi::order6(12).unwrap();
    let coeffs = Array1::<Complex64>::zeros(12);
    assert!(matches!(
        base.to_ortho(&coeffs.view()),
        Err(FunspaceError::NotImplemented(_))
    ));
    let x = Array1::<f64>::linspace(-0.9, 0.9, 5);
    let expected = x.mapv(|x| (1. - x * x).powi(3));
    approx_eq(&base.evaluate_basis_all(&x).index_axis(Axis(1), 0), &expected);
}
