//! Randomized array methods: `pick`, `take`, `shuffle`
//!
//! All three draw from the interpreter's RNG and allocate a fresh array;
//! the receiver is never touched.

use super::{arg, array_receiver, int_arg};
use crate::interp::dispatch::Runtime;
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::value::Value;
use rand::Rng;
use rand::seq::SliceRandom;

/// Fisher–Yates: for i from len-1 down to 1, swap i with a uniform j in [0, i].
pub fn shuffle_slice<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// `n` elements without replacement, distinct by position, in random order.
///
/// A partial Fisher–Yates pass, so every ordered n-subset is equally likely.
/// Callers guarantee `n <= items.len()`.
pub fn sample_distinct<T: Clone, R: Rng + ?Sized>(items: &[T], n: usize, rng: &mut R) -> Vec<T> {
    let mut pool = items.to_vec();
    let n = n.min(pool.len());
    let (chosen, _) = pool.partial_shuffle(rng, n);
    chosen.to_vec()
}

/// Element count argument: integer and non-negative
fn count_arg(method: &str, arg: &Value) -> InterpResult<usize> {
    let n = int_arg(method, arg)?;
    usize::try_from(n).map_err(|_| {
        RuntimeError::invalid_argument(format!(
            "Argument to `{method}` must be non-negative, got {n}"
        ))
    })
}

pub(super) fn shuffle(rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    let mut items = array_receiver(receiver)?.to_vec();
    shuffle_slice(&mut items, rt.rng());
    Ok(Value::array(items))
}

pub(super) fn pick(rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let items = array_receiver(receiver)?;
    let rng = rt.rng();

    let Some(arg) = args.first() else {
        if items.is_empty() {
            return Ok(Value::Null);
        }
        return Ok(items[rng.gen_range(0..items.len())].clone());
    };

    let n = count_arg("pick", arg)?;
    if n == 0 {
        return Ok(Value::array(Vec::new()));
    }
    if items.is_empty() {
        return Err(RuntimeError::invalid_argument("Cannot pick from empty array"));
    }
    let mut picked = Vec::new();
    picked.try_reserve_exact(n).map_err(|_| {
        RuntimeError::invalid_argument(format!("Cannot pick {n} items: too many to allocate"))
    })?;
    picked.extend((0..n).map(|_| items[rng.gen_range(0..items.len())].clone()));
    Ok(Value::array(picked))
}

pub(super) fn take(rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let items = array_receiver(receiver)?;
    let n = count_arg("take", arg("take", args, 0)?)?;
    if n > items.len() {
        return Err(RuntimeError::invalid_argument(format!(
            "Cannot take {n} unique items from array of length {}",
            items.len()
        )));
    }
    Ok(Value::array(sample_distinct(items, n, rt.rng())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    struct Seeded(StdRng);

    impl Runtime for Seeded {
        fn rng(&mut self) -> &mut StdRng {
            &mut self.0
        }

        fn call_value(&mut self, callee: &Value, _args: Vec<Value>) -> InterpResult<Value> {
            Err(RuntimeError::not_callable(callee.type_name()))
        }
    }

    fn rt() -> Seeded {
        Seeded(StdRng::seed_from_u64(2024))
    }

    fn ints(values: &[i64]) -> Value {
        Value::array(values.iter().map(|n| Value::Int(*n)).collect())
    }

    fn sorted_ints(value: &Value) -> Vec<i64> {
        let mut out: Vec<i64> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_int().unwrap())
            .collect();
        out.sort_unstable();
        out
    }

    #[test]
    fn test_shuffle_is_permutation_and_receiver_untouched() {
        let receiver = ints(&[1, 2, 3, 4, 5]);
        let shuffled = shuffle(&mut rt(), &receiver, &[]).unwrap();
        assert_eq!(sorted_ints(&shuffled), vec![1, 2, 3, 4, 5]);
        assert_eq!(receiver, ints(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        assert_eq!(shuffle(&mut rt(), &ints(&[]), &[]).unwrap(), ints(&[]));
        assert_eq!(shuffle(&mut rt(), &ints(&[9]), &[]).unwrap(), ints(&[9]));
    }

    #[test]
    fn test_shuffle_uniform_over_permutations() {
        let mut rt = rt();
        let receiver = ints(&[1, 2, 3]);
        let mut counts: HashMap<Vec<i64>, usize> = HashMap::new();
        let trials = 60_000;
        for _ in 0..trials {
            let out = shuffle(&mut rt, &receiver, &[]).unwrap();
            let order: Vec<i64> = out.as_array().unwrap().iter().map(|v| v.as_int().unwrap()).collect();
            *counts.entry(order).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        for (order, count) in counts {
            assert!(
                (9_400..=10_600).contains(&count),
                "permutation {order:?} seen {count} times"
            );
        }
    }

    #[test]
    fn test_pick_without_argument() {
        assert_eq!(pick(&mut rt(), &ints(&[]), &[]).unwrap(), Value::Null);
        let picked = pick(&mut rt(), &ints(&[4, 5, 6]), &[]).unwrap();
        assert!([4, 5, 6].contains(&picked.as_int().unwrap()));
    }

    #[test]
    fn test_pick_with_replacement_may_exceed_length() {
        let picked = pick(&mut rt(), &ints(&[1, 2]), &[Value::Int(10)]).unwrap();
        let items = picked.as_array().unwrap();
        assert_eq!(items.len(), 10);
        assert!(items.iter().all(|v| matches!(v.as_int(), Some(1 | 2))));
    }

    #[test]
    fn test_pick_zero_from_empty() {
        assert_eq!(pick(&mut rt(), &ints(&[]), &[Value::Int(0)]).unwrap(), ints(&[]));
    }

    #[test]
    fn test_pick_errors() {
        let err = pick(&mut rt(), &ints(&[]), &[Value::Int(1)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(err.message, "Cannot pick from empty array");

        let err = pick(&mut rt(), &ints(&[1]), &[Value::Int(-1)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(err.message, "Argument to `pick` must be non-negative, got -1");

        let err = pick(&mut rt(), &ints(&[1]), &[Value::str("2")]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_pick_unallocatable_count_is_an_error() {
        let err = pick(&mut rt(), &ints(&[1]), &[Value::Int(i64::MAX)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert!(err.message.contains("too many to allocate"));
    }

    #[test]
    fn test_take_is_distinct_by_position() {
        let out = take(&mut rt(), &ints(&[1, 2, 3, 4, 5]), &[Value::Int(3)]).unwrap();
        let items = sorted_ints(&out);
        assert_eq!(items.len(), 3);
        let unique: HashSet<i64> = items.iter().copied().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_take_keeps_duplicate_values() {
        let out = take(&mut rt(), &ints(&[1, 1, 2]), &[Value::Int(3)]).unwrap();
        assert_eq!(sorted_ints(&out), vec![1, 1, 2]);
    }

    #[test]
    fn test_take_bounds() {
        assert_eq!(take(&mut rt(), &ints(&[1, 2]), &[Value::Int(0)]).unwrap(), ints(&[]));

        let err = take(&mut rt(), &ints(&[1, 2, 3]), &[Value::Int(5)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(err.message, "Cannot take 5 unique items from array of length 3");

        let err = take(&mut rt(), &ints(&[1, 2, 3]), &[Value::Int(-2)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);

        let err = take(&mut rt(), &ints(&[1, 2, 3]), &[Value::Float(1.0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_take_uniform_over_ordered_pairs() {
        let mut rt = rt();
        let receiver = ints(&[1, 2, 3]);
        let mut counts: HashMap<Vec<i64>, usize> = HashMap::new();
        for _ in 0..60_000 {
            let out = take(&mut rt, &receiver, &[Value::Int(2)]).unwrap();
            let pair: Vec<i64> = out.as_array().unwrap().iter().map(|v| v.as_int().unwrap()).collect();
            *counts.entry(pair).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|c| (9_400..=10_600).contains(c)));
    }

    #[test]
    fn test_same_seed_same_shuffle() {
        let receiver = ints(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let a = shuffle(&mut rt(), &receiver, &[]).unwrap();
        let b = shuffle(&mut rt(), &receiver, &[]).unwrap();
        assert_eq!(a, b);
    }
}
