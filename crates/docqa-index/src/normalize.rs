//! L2 normalization and the inner product used as cosine similarity.

/// Substituted for a zero norm so normalization never divides by zero.
pub const NORM_EPSILON: f32 = 1e-10;

/// Accumulates in f64 so large or tiny components neither overflow nor
/// underflow the sum of squares.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|&x| f64::from(x) * f64::from(x)).sum::<f64>().sqrt() as f32
}

pub fn normalize(v: &mut [f32]) {
    let norm = l2_norm(v);
    let norm = if norm == 0.0 { NORM_EPSILON } else { norm };
    for x in v.iter_mut() {
        *x /= norm;
    }
}

pub fn normalized(mut v: Vec<f32>) -> Vec<f32> {
    normalize(&mut v);
    v
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
