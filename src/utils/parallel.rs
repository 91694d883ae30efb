#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Maps `f` over `items`, keeping input order in the output.
/// Runs on the rayon pool when the `parallel` feature is enabled.
#[inline]
pub fn map_ordered<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    {
        items.par_iter().map(f).collect()
    }
    #[cfg(any(not(feature = "parallel"), target_arch = "wasm32"))]
    {
        items.iter().map(f).collect()
    }
}

/// Folds `items` pairwise with `op`. `op` must be associative; the
/// grouping of the reduction is unspecified.
#[inline]
pub fn reduce_pairwise<T, F>(items: Vec<T>, op: F) -> Option<T>
where
    T: Send,
    F: Fn(T, T) -> T + Sync + Send,
{
    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    {
        items.into_par_iter().reduce_with(op)
    }
    #[cfg(any(not(feature = "parallel"), target_arch = "wasm32"))]
    {
        items.into_iter().reduce(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_order() {
        let items: Vec<u32> = (0..2000).collect();
        let doubled = map_ordered(&items, |x| x * 2);
        assert_eq!(doubled.len(), 2000);
        assert!(doubled.iter().enumerate().all(|(i, v)| *v == 2 * i as u32));
    }

    #[test]
    fn test_reduce() {
        assert_eq!(reduce_pairwise(vec![1, 2, 3, 4], |a, b| a + b), Some(10));
        assert_eq!(reduce_pairwise(Vec::<i32>::new(), |a, b| a + b), None);
    }
}
