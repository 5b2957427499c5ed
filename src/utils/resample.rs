use crate::float::Float;

/// Stretch or squeeze `input` to `len` samples by nearest-sample lookup:
/// output index `k` reads input index `k * input.len() / len`.
pub fn stretch_nearest<T: Float>(input: &[T], len: usize) -> Vec<T> {
    if input.is_empty() {
        return vec![T::zero(); len];
    }
    (0..len).map(|k| input[k * input.len() / len]).collect()
}
