use derive_more::{Display, Error};
use ndarray::{concatenate, s, Array1, Array2, Axis};

#[derive(Debug, Display, Error)]
pub enum RegressionError {
    SingularMatrix,
    DimensionMismatch,
    NotFitted,
}

///Ordinary least squares with an intercept, solved through the normal equations
///`beta = (X'X)^-1 X'y` with a Cholesky decomposition of `X'X`.
#[derive(Clone, Debug, Default)]
pub struct LinearRegression {
    coefficients: Option<Array1<f64>>,
    intercept: Option<f64>,
    r_squared: Option<f64>,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), RegressionError> {
        if x.nrows() != y.len() || x.nrows() == 0 {
            return Err(RegressionError::DimensionMismatch);
        }

        let ones = Array2::ones((x.nrows(), 1));
        let design = concatenate(Axis(1), &[ones.view(), x.view()])
            .map_err(|_| RegressionError::DimensionMismatch)?;

        let xtx = design.t().dot(&design);
        let xty = design.t().dot(y);
        let beta = cholesky_solve(&xtx, &xty)?;

        self.intercept = Some(beta[0]);
        self.coefficients = Some(beta.slice(s![1..]).to_owned());

        let predictions = self.predict(x)?;
        let y_mean = y.sum() / y.len() as f64;
        let ss_tot: f64 = y.iter().map(|val| (val - y_mean).powi(2)).sum();
        let ss_res: f64 = y
            .iter()
            .zip(predictions.iter())
            .map(|(val, pred)| (val - pred).powi(2))
            .sum();
        self.r_squared = Some(1.0 - ss_res / ss_tot);

        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, RegressionError> {
        let coefficients = self.coefficients.as_ref().ok_or(RegressionError::NotFitted)?;
        let intercept = self.intercept.ok_or(RegressionError::NotFitted)?;
        if x.ncols() != coefficients.len() {
            return Err(RegressionError::DimensionMismatch);
        }
        Ok(x.dot(coefficients) + intercept)
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }
}

///Solve `A x = b` for symmetric positive-definite `A` via `A = L L'` with forward then backward
///substitution. A tiny diagonal bump keeps near-collinear designs decomposable.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, RegressionError> {
    let n = a.nrows();
    let mut lower = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += lower[[i, k]] * lower[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] + 1e-10 - sum;
                if diag <= 0.0 {
                    return Err(RegressionError::SingularMatrix);
                }
                lower[[i, j]] = diag.sqrt();
            } else {
                lower[[i, j]] = (a[[i, j]] - sum) / lower[[j, j]];
            }
        }
    }

    let mut forward = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += lower[[i, j]] * forward[j];
        }
        forward[i] = (b[i] - sum) / lower[[i, i]];
    }

    let mut solution = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += lower[[j, i]] * solution[j];
        }
        solution[i] = (forward[i] - sum) / lower[[i, i]];
    }

    Ok(solution)
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, Array2};

    use super::{LinearRegression, RegressionError};

    #[test]
    fn test_that_fit_recovers_exact_linear_relation() {
        //y = 0.5 + 2x, no noise
        let x = Array2::from_shape_vec((5, 1), vec![-2.0, -1.0, 0.0, 1.0, 2.0]).unwrap();
        let y = Array1::from_vec(vec![-3.5, -1.5, 0.5, 2.5, 4.5]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        assert!((model.intercept().unwrap() - 0.5).abs() < 1e-8);
        assert!((model.coefficients().unwrap()[0] - 2.0).abs() < 1e-8);
        assert!(model.r_squared().unwrap() > 0.999999);
    }

    #[test]
    fn test_that_fit_recovers_two_feature_coefficients() {
        //y = 1 + 2a - 3b on a small non-degenerate design
        let x = Array2::from_shape_vec(
            (6, 2),
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0],
        )
        .unwrap();
        let y = Array1::from_vec(vec![1.0, 3.0, -2.0, 0.0, 2.0, -3.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coefficients = model.coefficients().unwrap();
        assert!((model.intercept().unwrap() - 1.0).abs() < 1e-6);
        assert!((coefficients[0] - 2.0).abs() < 1e-6);
        assert!((coefficients[1] + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_that_dimension_mismatch_is_rejected() {
        let x = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();
        let y = Array1::from_vec(vec![1.0, 2.0]);
        let mut model = LinearRegression::new();
        assert!(matches!(
            model.fit(&x, &y),
            Err(RegressionError::DimensionMismatch)
        ));
    }

    #[test]
    fn test_that_predict_before_fit_is_rejected() {
        let x = Array2::from_shape_vec((2, 1), vec![1.0, 2.0]).unwrap();
        let model = LinearRegression::new();
        assert!(matches!(
            model.predict(&x),
            Err(RegressionError::NotFitted)
        ));
    }
}
