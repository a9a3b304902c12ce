use faer::Mat;
use ndarray::Array2;

/// Top `k` right singular vectors of `matrix`, as columns of an
/// `n_cols x k` array, ordered by singular value descending.
///
/// The decomposition is dense and exact, so identical input always yields
/// identical output. `k` must not exceed `min(n_rows, n_cols)`; callers
/// clamp before reaching here.
pub fn right_singular_vectors(matrix: &Array2<f64>, k: usize) -> Array2<f64> {
    let (rows, cols) = matrix.dim();
    debug_assert!(k <= rows.min(cols));

    let m = Mat::from_fn(rows, cols, |i, j| matrix[[i, j]]);
    let svd = m.as_ref().svd();
    let v = svd.v();

    let mut out = Array2::zeros((cols, k));
    for j in 0..cols {
        for t in 0..k {
            out[[j, t]] = v.read(j, t);
        }
    }
    out
}
