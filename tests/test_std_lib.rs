//! Tests for the default extension functions and implicit methods.

extern crate implicit_dispatch;

use implicit_dispatch::runner::api::ExprHelper;
use implicit_dispatch::runner::ds::error::EvalError;
use implicit_dispatch::runner::ds::value::Value;
use implicit_dispatch::runner::eval::expression::Expr;

fn eval(expr: Expr) -> Result<Value, EvalError> {
    ExprHelper::new().evaluate(&expr, Value::Null)
}

fn list(items: Vec<Expr>) -> Expr {
    Expr::call("list", items)
}

fn ints(items: &[i64]) -> Vec<Expr> {
    items.iter().map(|n| Expr::lit(*n)).collect()
}

fn int_list(items: &[i64]) -> Value {
    Value::list(items.iter().map(|n| Value::Integer(*n)).collect())
}

// ============================================================================
// Extension function tests
// ============================================================================

mod extension_function_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_keeps_order_and_duplicates() {
        assert_eq!(eval(list(ints(&[3, 1, 3]))), Ok(int_list(&[3, 1, 3])));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(eval(list(vec![])), Ok(Value::list(vec![])));
    }

    #[test]
    fn test_list_accepts_mixed_kinds() {
        let result = eval(list(vec![Expr::lit(1), Expr::lit("a"), Expr::lit(true)])).unwrap();
        assert_eq!(result.to_string(), "[1, a, true]");
    }

    #[test]
    fn test_set_deduplicates() {
        let result = eval(Expr::call("set", ints(&[2, 1, 2]))).unwrap();
        assert_eq!(result, Value::set(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(result.type_name(), "util.ImmutableSet");
    }

    #[test]
    fn test_map_zips_keys_and_values() {
        let keys = list(vec![Expr::lit("one"), Expr::lit("two"), Expr::lit("three")]);
        let values = list(ints(&[1, 2, 3]));
        let result = eval(Expr::call("map", vec![keys, values])).unwrap();
        assert_eq!(
            result,
            Value::map(vec![
                (Value::string("one"), Value::Integer(1)),
                (Value::string("two"), Value::Integer(2)),
                (Value::string("three"), Value::Integer(3)),
            ])
        );
        assert_eq!(result.type_name(), "util.ImmutableMap");
    }

    #[test]
    fn test_map_rejects_unequal_lengths() {
        let keys = list(vec![Expr::lit("one"), Expr::lit("two"), Expr::lit("three")]);
        let values = list(ints(&[1, 2]));
        assert!(matches!(
            eval(Expr::call("map", vec![keys, values])),
            Err(EvalError::ArityMismatch { expected: 3, actual: 2, .. })
        ));
    }

    #[test]
    fn test_map_later_duplicate_key_wins() {
        let keys = list(vec![Expr::lit("k"), Expr::lit("k")]);
        let values = list(ints(&[1, 2]));
        let result = eval(Expr::call("map", vec![keys, values])).unwrap();
        assert_eq!(result.to_string(), "{k=2}");
    }

    #[test]
    fn test_map_requires_lists() {
        assert!(matches!(
            eval(Expr::call("map", vec![Expr::lit(1), list(vec![])])),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert!(matches!(
            eval(Expr::call("map", vec![list(vec![])])),
            Err(EvalError::ArityMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_map_lookup_through_native_method() {
        let keys = list(vec![Expr::lit("a")]);
        let values = list(ints(&[10]));
        let map = Expr::call("map", vec![keys, values]);
        assert_eq!(
            eval(map.clone().method("get", vec![Expr::lit("a")])),
            Ok(Value::Integer(10))
        );
        assert_eq!(eval(map.clone().method("get", vec![Expr::lit("z")])), Ok(Value::Null));
        assert_eq!(
            eval(map.method("containsKey", vec![Expr::lit("a")])),
            Ok(Value::Boolean(true))
        );
    }
}

// ============================================================================
// Implicit method tests
// ============================================================================

mod implicit_method_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_distinct() {
        let result = eval(list(ints(&[3, 1, 3, 2])).property("distinct")).unwrap();
        assert_eq!(result.to_string(), "[1, 2, 3]");
        assert_eq!(result.type_name(), "util.ImmutableSet");
    }

    #[test]
    fn test_sorted_integers() {
        assert_eq!(
            eval(list(ints(&[3, 1, 2])).property("sorted")),
            Ok(int_list(&[1, 2, 3]))
        );
    }

    #[test]
    fn test_sorted_mixed_numbers() {
        let result = eval(list(vec![Expr::lit(2.5), Expr::lit(1), Expr::lit(3)]).property("sorted"));
        assert_eq!(result.unwrap().to_string(), "[1, 2.5, 3]");
    }

    #[test]
    fn test_sorted_rejects_mixed_kinds() {
        assert!(matches!(
            eval(list(vec![Expr::lit(1), Expr::lit("a")]).property("sorted")),
            Err(EvalError::NotComparable(_))
        ));
    }

    #[test]
    fn test_reversed() {
        assert_eq!(
            eval(list(ints(&[1, 2, 3])).method("reversed", vec![])),
            Ok(int_list(&[3, 2, 1]))
        );
    }

    #[test]
    fn test_take_and_drop() {
        let items = list(ints(&[1, 2, 3, 4]));
        assert_eq!(
            eval(items.clone().method("take", vec![Expr::lit(2)])),
            Ok(int_list(&[1, 2]))
        );
        assert_eq!(
            eval(items.clone().method("drop", vec![Expr::lit(2)])),
            Ok(int_list(&[3, 4]))
        );
        assert_eq!(
            eval(items.clone().method("take", vec![Expr::lit(0)])),
            Ok(int_list(&[]))
        );
        assert_eq!(
            eval(items.method("drop", vec![Expr::lit(4)])),
            Ok(int_list(&[]))
        );
    }

    #[test]
    fn test_take_out_of_bounds() {
        let items = list(ints(&[1, 2]));
        assert_eq!(
            eval(items.clone().method("take", vec![Expr::lit(3)])),
            Err(EvalError::IndexOutOfBounds { index: 3, len: 2 })
        );
        assert_eq!(
            eval(items.method("drop", vec![Expr::lit(-1)])),
            Err(EvalError::IndexOutOfBounds { index: -1, len: 2 })
        );
    }

    #[test]
    fn test_chained_calls() {
        // #list(5, 3, 5, 1).sorted.reversed.take(2)
        let expr = list(ints(&[5, 3, 5, 1]))
            .property("sorted")
            .property("reversed")
            .method("take", vec![Expr::lit(2)]);
        assert_eq!(eval(expr), Ok(int_list(&[5, 5])));
    }

    #[test]
    fn test_list_methods_do_not_apply_to_sets() {
        let expr = Expr::call("set", ints(&[2, 1])).property("sorted");
        assert!(matches!(eval(expr), Err(EvalError::PropertyNotFound { .. })));
    }

    #[test]
    fn test_native_collection_methods() {
        let items = list(ints(&[1, 2]));
        assert_eq!(eval(items.clone().property("size")), Ok(Value::Integer(2)));
        assert_eq!(eval(items.clone().property("isEmpty")), Ok(Value::Boolean(false)));
        assert_eq!(
            eval(items.clone().method("contains", vec![Expr::lit(2)])),
            Ok(Value::Boolean(true))
        );
        assert_eq!(eval(items.clone().method("get", vec![Expr::lit(1)])), Ok(Value::Integer(2)));
        assert_eq!(
            eval(items.method("get", vec![Expr::lit(5)])),
            Err(EvalError::IndexOutOfBounds { index: 5, len: 2 })
        );
    }
}
