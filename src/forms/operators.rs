//! Differential operators in Cartesian coordinates
use super::expr::{Expr, Term};
use crate::error::{FunspaceError, Result};

/// Add `k` to the derivative order along `axis` of every term
///
/// # Errors
/// `axis` out of range.
pub fn dx(expr: &Expr, axis: usize, k: usize) -> Result<Expr> {
    let dim = expr.dimensions();
    if axis >= dim {
        return Err(FunspaceError::Index {
            index: axis,
            len: dim,
        });
    }
    let components = expr
        .components()
        .into_iter()
        .map(|component| differentiate(component, axis, k))
        .collect();
    Ok(Expr::from_components(components, expr.basis().clone()))
}

fn differentiate(component: Vec<Term>, axis: usize, k: usize) -> Vec<Term> {
    component
        .into_iter()
        .map(|(mut orders, index, scale)| {
            orders[axis] += k;
            (orders, index, scale)
        })
        .collect()
}

/// Gradient, raises the rank by one. In 1D this is [`dx`].
///
/// # Errors
/// Expression of rank 2.
pub fn grad(expr: &Expr) -> Result<Expr> {
    let dim = expr.dimensions();
    if dim == 1 {
        return dx(expr, 0, 1);
    }
    match expr.expr_rank()? {
        0 | 1 => {
            let components = expr
                .components()
                .into_iter()
                .flat_map(|component| {
                    (0..dim).map(move |axis| differentiate(component.clone(), axis, 1))
                })
                .collect();
            Ok(Expr::from_components(components, expr.basis().clone()))
        }
        rank => Err(FunspaceError::NotImplemented(format!(
            "gradient of rank {} expression",
            rank
        ))),
    }
}

/// Divergence, lowers the rank by one. In 1D this is [`dx`].
///
/// # Errors
/// Expression of rank 0.
pub fn div(expr: &Expr) -> Result<Expr> {
    let dim = expr.dimensions();
    if dim == 1 {
        return dx(expr, 0, 1);
    }
    match expr.expr_rank()? {
        1 | 2 => {
            let components = expr
                .components()
                .chunks(dim)
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .flat_map(|(axis, component)| differentiate(component.clone(), axis, 1))
                        .collect()
                })
                .collect();
            let basis = expr.basis().base();
            Ok(Expr::from_components(components, basis))
        }
        _ => Err(FunspaceError::NotImplemented(
            "divergence of rank 0 expression".to_string(),
        )),
    }
}

/// Laplacian, `div(grad(expr))`
///
/// # Errors
/// See [`grad`] and [`div`].
pub fn laplace(expr: &Expr) -> Result<Expr> {
    div(&grad(expr)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::forms::arguments::BasisFunction;
    use crate::forms::scale::Scale;
    use crate::jacobi::CompositeJacobi;
    use crate::space::Space;
    use ndarray::array;

    fn space(dim: usize) -> Space {
        let bases = (0..dim)
            .map(|_| CompositeJacobi::dirichlet(6).unwrap().into())
            .collect();
        Space::tensor(bases).unwrap()
    }

    #[test]
    fn test_grad_3d() {
        let v = BasisFunction::test(&space(3));
        let g = grad(&Expr::from(&v)).unwrap();
        assert_eq!(g.expr_rank().unwrap(), 1);
        assert_eq!(g.num_components(), 3);
        assert_eq!(g.num_terms(), 1);
        assert_eq!(
            g.terms(),
            array![[[1, 0, 0]], [[0, 1, 0]], [[0, 0, 1]]]
        );
    }

    #[test]
    fn test_laplace_3d() {
        let v = BasisFunction::test(&space(3));
        let l = div(&grad(&Expr::from(&v)).unwrap()).unwrap();
        assert_eq!(l.expr_rank().unwrap(), 0);
        assert_eq!(l.num_components(), 1);
        assert_eq!(l.terms(), array![[[2, 0, 0], [0, 2, 0], [0, 0, 2]]]);
        assert_eq!(laplace(&Expr::from(&v)).unwrap().terms(), l.terms());
    }

    #[test]
    fn test_grad_of_vector_and_div() {
        let w = BasisFunction::trial(&Space::vector(&space(2)));
        let g = grad(&Expr::from(&w)).unwrap();
        assert_eq!(g.expr_rank().unwrap(), 2);
        assert_eq!(g.indices(), array![[0], [0], [1], [1]]);
        let d = div(&g).unwrap();
        assert_eq!(d.expr_rank().unwrap(), 1);
        assert_eq!(d.terms(), array![[[2, 0], [0, 2]], [[2, 0], [0, 2]]]);
        assert_eq!(d.indices(), array![[0, 0], [1, 1]]);
        let divergence = div(&Expr::from(&w)).unwrap();
        assert_eq!(divergence.num_components(), 1);
        assert_eq!(divergence.indices(), array![[0, 1]]);
    }

    #[test]
    fn test_1d_and_errors() {
        let v = BasisFunction::test(&space(1));
        let e = grad(&(&v * Scale::from(2.))).unwrap();
        assert_eq!(e.terms(), array![[[1]]]);
        assert_eq!(e.scales()[[0, 0]], Scale::Const(2.));
        assert!(dx(&e, 1, 1).is_err());
        let s = BasisFunction::test(&space(2));
        assert!(div(&Expr::from(&s)).is_err());
        let g = grad(&grad(&Expr::from(&s)).unwrap()).unwrap();
        assert!(grad(&g).is_err());
    }
}
