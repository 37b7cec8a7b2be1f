use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis};

use super::error::ModelError;

/// Column-wise standardisation `(x - mean) / std`.
///
/// Uses the population standard deviation. A column that is constant in the
/// training data maps to 0 at inference, whatever the input value.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    std_dev: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self, ModelError> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ModelError::EmptyDataset);
        }
        for (column, values) in x.columns().into_iter().enumerate() {
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ModelError::NonFiniteInput { column });
            }
        }

        let mean = x.mean_axis(Axis(0)).ok_or(ModelError::EmptyDataset)?;
        let std_dev = x.std_axis(Axis(0), 0.0);
        Ok(Self { mean, std_dev })
    }

    pub fn fit_transform(x: ArrayView2<'_, f64>) -> Result<(Self, Array2<f64>), ModelError> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x)?;
        Ok((scaler, scaled))
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
        self.check_width(x.ncols())?;
        let mut scaled = x.to_owned();
        for mut row in scaled.rows_mut() {
            self.scale_in_place(row.view_mut());
        }
        Ok(scaled)
    }

    pub fn transform_row(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, ModelError> {
        self.check_width(row.len())?;
        let mut scaled = row.to_owned();
        self.scale_in_place(scaled.view_mut());
        Ok(scaled)
    }

    fn scale_in_place(&self, mut row: ArrayViewMut1<'_, f64>) {
        for ((value, &mean), &std_dev) in row.iter_mut().zip(&self.mean).zip(&self.std_dev) {
            *value = if std_dev > 0.0 { (*value - mean) / std_dev } else { 0.0 };
        }
    }

    fn check_width(&self, actual: usize) -> Result<(), ModelError> {
        if actual != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn standardises_with_population_std() {
        let x = array![[1.0, 10.0], [3.0, 10.0]];
        let (scaler, scaled) = StandardScaler::fit_transform(x.view()).unwrap();
        assert_eq!(scaled, array![[-1.0, 0.0], [1.0, 0.0]]);
        assert_eq!(scaler.n_features(), 2);
    }

    #[test]
    fn constant_column_maps_to_zero() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        let row = scaler.transform_row(array![123.0, 2.0].view()).unwrap();
        assert_eq!(row[0], 0.0);
        assert_eq!(row[1], 0.0);
    }

    #[test]
    fn columns_have_zero_mean_unit_variance() {
        let x = array![[2.0, -1.0], [4.0, 0.0], [9.0, 7.0], [1.0, 2.0]];
        let (_, scaled) = StandardScaler::fit_transform(x.view()).unwrap();
        for column in scaled.columns() {
            assert!(column.mean().unwrap().abs() < 1e-12);
            assert!((column.std(0.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let scaler = StandardScaler::fit(array![[1.0, 2.0], [3.0, 4.0]].view()).unwrap();
        assert_eq!(
            scaler.transform_row(array![1.0].view()),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn rejects_empty_and_non_finite() {
        assert_eq!(
            StandardScaler::fit(Array2::<f64>::zeros((0, 3)).view()),
            Err(ModelError::EmptyDataset)
        );
        assert_eq!(
            StandardScaler::fit(array![[1.0, f64::INFINITY]].view()),
            Err(ModelError::NonFiniteInput { column: 1 })
        );
    }
}
