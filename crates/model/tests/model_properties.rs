//! Behavioural properties of model queries and value decoding, checked
//! against the scripted backend.

use num_bigint::BigInt;
use num_rational::BigRational;
use yices_model::{
    DEFAULT_MAX_DEPTH, DecodeConfig, ErrorCode, FunctionValue, GenMode, Mapping, Model, Value,
    Yices, YicesError,
};
use yices_native::{MockValue, MockYices, Term, YicesApi};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One variable of an opaque type bound to `value`, and a model for it.
fn single(api: &MockYices, value: MockValue) -> (Term, Model<'_, MockYices>) {
    let x = api.new_variable(api.compound_type());
    let ctx = api.sat_context(vec![(x, value)]);
    let model = Model::from_context(api, ctx, false).expect("scripted context is sat");
    (x, model)
}

fn int(n: i64) -> Value {
    Value::from(n)
}

// ---- scalars ----

#[test]
fn scalar_round_trip() {
    let api = MockYices::new();
    let color = api.scalar_type(5);
    for index in 0..5 {
        let (x, model) = single(&api, MockValue::Scalar { ty: color, index });
        let value = model.get_value(x).unwrap();
        let scalar = value.as_scalar().expect("scalar value");

        assert_eq!(scalar.index, index);
        assert_eq!(scalar.ty, color);
        assert_eq!(model.get_scalar_value(scalar.constant), Ok(index));
        assert_eq!(api.term_type(scalar.constant), color);
        assert_eq!(model.get_scalar_value(x), Ok(index));
    }
}

// ---- determinism ----

#[test]
fn repeated_decoding_is_structurally_equal() {
    let api = MockYices::new();
    let (f, model) = single(
        &api,
        MockValue::function(
            2,
            MockValue::Tuple(vec![MockValue::Bool(false), MockValue::int(0)]),
            vec![(
                vec![MockValue::int(1), MockValue::bv_from_u64(3, 2)],
                MockValue::Tuple(vec![MockValue::Bool(true), MockValue::rational(1, 3)]),
            )],
        ),
    );
    let first = model.get_value(f).unwrap();
    let second = model.get_value(f).unwrap();
    assert_eq!(first, second);
}

// ---- bit-vectors ----

#[test]
fn bit_vector_width_and_order() {
    let api = MockYices::new();
    for width in [1u32, 7, 8, 33, 64, 100] {
        let (b, model) = single(&api, MockValue::bv_from_u64(0xA5, width));
        let value = model.get_value(b).unwrap();
        let bits = value.as_bits().expect("bit-vector");
        assert_eq!(bits.len(), width as usize);
        assert!(bits.iter().all(|&bit| bit <= 1));
        // Least significant bit first: 0xA5 = 1010_0101.
        let expected = [1u8, 0, 1, 0, 0, 1, 0, 1];
        for (i, &bit) in bits.iter().enumerate() {
            let want = expected.get(i).copied().unwrap_or(0);
            assert_eq!(bit, want, "bit {i} of width {width}");
        }
    }
}

// ---- functions ----

#[test]
fn function_fallback_law() {
    let api = MockYices::new();
    let (f, model) = single(
        &api,
        MockValue::function(
            1,
            MockValue::int(-1),
            vec![
                (vec![MockValue::int(0)], MockValue::int(100)),
                (vec![MockValue::int(5)], MockValue::int(105)),
            ],
        ),
    );
    let value = model.get_value(f).unwrap();
    let func = value.as_function().expect("function");
    assert_eq!(func.default_value(), &int(-1));
    assert_eq!(func.apply(&[int(0)]), &int(100));
    assert_eq!(func.apply(&[int(5)]), &int(105));
    assert_eq!(func.apply(&[int(6)]), &int(-1));
}

#[test]
fn duplicate_function_keys_keep_later_result() {
    init_tracing();
    let api = MockYices::new();
    let (f, model) = single(
        &api,
        MockValue::function(
            1,
            MockValue::Bool(false),
            vec![
                (vec![MockValue::int(1)], MockValue::Bool(false)),
                (vec![MockValue::int(1)], MockValue::Bool(true)),
            ],
        ),
    );
    let value = model.get_value(f).unwrap();
    let func = value.as_function().unwrap();
    assert_eq!(func.len(), 1);
    assert_eq!(func.apply(&[int(1)]), &Value::Bool(true));
}

#[test]
fn nested_functions() {
    let api = MockYices::new();
    let inner = MockValue::function(
        1,
        MockValue::int(0),
        vec![(vec![MockValue::int(2)], MockValue::int(4))],
    );
    let (f, model) = single(
        &api,
        MockValue::function(1, inner.clone(), vec![(vec![MockValue::Bool(true)], inner)]),
    );
    let value = model.get_value(f).unwrap();
    let outer = value.as_function().unwrap();
    let curried = outer.apply(&[Value::Bool(true)]).as_function().unwrap();
    assert_eq!(curried.apply(&[int(2)]), &int(4));
    assert_eq!(curried.apply(&[int(3)]), &int(0));
    assert_eq!(api.vector_counters().outstanding(), 0);
}

// ---- rationals ----

#[test]
fn rational_exactness() {
    let api = MockYices::new();
    for (num, den) in [(2i64, 3i64), (-7, 4), (10, 4), (i64::MAX, 3)] {
        let (r, model) = single(&api, MockValue::rational(num, den));
        let decoded = model.get_value(r).unwrap();
        let direct = model.get_fraction_value(r).unwrap();
        assert_eq!(decoded.as_rational(), Some(&direct));
        assert_eq!(*direct.numer(), BigInt::from(num));
        assert_eq!(*direct.denom(), BigInt::from(den));
    }
}

#[test]
fn integers_beyond_64_bits_fall_back_to_float() {
    let api = MockYices::new();
    let big = BigInt::from(3u8) << 100usize;
    let (n, model) = single(&api, MockValue::big_int(big));
    let Value::Float(x) = model.get_value(n).unwrap() else {
        panic!("expected a float approximation");
    };
    assert!((x / 3.802951800684688e30 - 1.0).abs() < 1e-12);
}

// ---- vector hygiene ----

#[test]
fn vectors_released_on_success() {
    let api = MockYices::new();
    let bool_t = api.bool_type();
    let p = api.new_variable(bool_t);
    let x = api.new_variable(api.int_type());
    let g = api.new_variable(api.compound_type());
    let ctx = api.sat_context(vec![
        (p, MockValue::Bool(true)),
        (x, MockValue::int(1)),
        (g, MockValue::function(1, MockValue::int(0), vec![(vec![MockValue::int(1)], MockValue::int(1))])),
    ]);
    let model = Model::from_context(&api, ctx, false).unwrap();

    assert_eq!(model.collect_defined_terms(), vec![p, x, g]);
    assert_eq!(model.implicant_for_formula(p), Ok(vec![p]));
    assert_eq!(model.implicant_for_formulas(&[p]), Ok(vec![p]));
    assert_eq!(model.generalize_model(p, &[x], GenMode::Default), Ok(vec![p]));
    assert_eq!(
        model.generalize_model_array(&[p], &[x], GenMode::ByProjection),
        Ok(vec![p])
    );
    model.get_value(g).unwrap();

    let counters = api.vector_counters();
    assert_eq!(counters.term_inits, 5);
    assert_eq!(counters.term_releases, 5);
    assert_eq!(counters.yval_inits, 1);
    assert_eq!(counters.yval_releases, 1);
}

#[test]
fn vectors_released_on_failure() {
    let api = MockYices::new();
    let p = api.new_variable(api.bool_type());
    let g = api.new_variable(api.compound_type());
    let ctx = api.sat_context(vec![
        (p, MockValue::Bool(true)),
        (
            g,
            MockValue::function(
                1,
                MockValue::int(0),
                vec![(vec![MockValue::Tuple(vec![MockValue::int(1)])], MockValue::int(1))],
            ),
        ),
    ]);
    let model = Model::from_context(&api, ctx, false).unwrap();

    for op in [
        "yices_implicant_for_formula",
        "yices_implicant_for_formulas",
        "yices_generalize_model",
        "yices_generalize_model_array",
    ] {
        api.fail_on(op);
    }
    assert!(model.implicant_for_formula(p).is_err());
    assert!(model.implicant_for_formulas(&[p]).is_err());
    assert!(model.generalize_model(p, &[], GenMode::Default).is_err());
    assert!(model.generalize_model_array(&[p], &[], GenMode::Default).is_err());

    // A failure deep inside a function entry still releases its vector.
    api.fail_on("yices_val_expand_tuple");
    let err = model.get_value(g).unwrap_err();
    assert_eq!(err.operation(), Some("yices_val_expand_tuple"));

    let counters = api.vector_counters();
    assert_eq!(counters.term_inits, 4);
    assert_eq!(counters.yval_inits, 1);
    assert_eq!(counters.outstanding(), 0);
}

// ---- tuples ----

#[test]
fn tuple_order_preserved() {
    let api = MockYices::new();
    let (t, model) = single(
        &api,
        MockValue::Tuple(vec![
            MockValue::Bool(true),
            MockValue::int(5),
            MockValue::rational(2, 3),
        ]),
    );
    let two_thirds = BigRational::new(BigInt::from(2), BigInt::from(3));
    assert_eq!(
        model.get_value(t),
        Ok(Value::Tuple(vec![
            Value::Bool(true),
            int(5),
            Value::Rational(two_thirds),
        ]))
    );
}

// ---- type mismatch ----

#[test]
fn type_mismatch_leaves_model_usable() {
    let api = MockYices::new();
    let x = api.new_variable(api.int_type());
    let p = api.new_variable(api.bool_type());
    let ctx = api.sat_context(vec![(x, MockValue::int(7)), (p, MockValue::Bool(true))]);
    let model = Model::from_context(&api, ctx, false).unwrap();

    let err = model.get_bool_value(x).unwrap_err();
    assert_eq!(err.operation(), Some("yices_get_bool_value"));
    assert_eq!(err.report().unwrap().code, ErrorCode::TYPE_MISMATCH);
    assert_eq!(err.report().unwrap().term1, x);
    assert!(matches!(err, YicesError::NativeCallFailed { .. }));

    assert_eq!(model.get_integer_value(x), Ok(7));
    assert_eq!(model.get_bool_value(p), Ok(true));
    assert_eq!(model.get_value(x), Ok(int(7)));
}

// ---- library error state ----

#[test]
fn error_state_baseline() {
    let api = MockYices::new();
    let yices = Yices::new(&api);
    yices.init();
    yices.reset();

    assert_eq!(yices.error_code(), ErrorCode::NO_ERROR);
    assert_eq!(yices.error_report().code, ErrorCode::NO_ERROR);
    yices.clear_error();
    assert_eq!(yices.error_string(), "no error");
    yices.print_error(1).unwrap();

    let bool_t = api.bool_type();
    let err = yices.constant(bool_t, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "yices_constant failed: invalid type in constant creation (error code 20)"
    );
    let report = yices.error_report();
    assert_eq!(yices.error_code(), ErrorCode::NO_ERROR);
    assert_eq!(yices.error_code(), report.code);
    assert_eq!(yices.error_string(), "no error");
    yices.clear_error();
    assert_eq!(yices.error_code(), ErrorCode::NO_ERROR);
    yices.exit();
}

// ---- unsupported and malformed nodes ----

#[test]
fn algebraic_and_unknown_tags() {
    let api = MockYices::new();
    let (a, model) = single(&api, MockValue::Algebraic);
    assert_eq!(
        model.get_value(a),
        Err(YicesError::NotImplemented("algebraic number decoding"))
    );
    let (u, model) = single(&api, MockValue::Tuple(vec![MockValue::RawTag(77)]));
    let err = model.get_value(u).unwrap_err();
    assert_eq!(err.to_string(), "Internal error: unexpected value tag 77");
}

#[test]
fn configured_depth_limit() {
    let api = MockYices::new();
    let mut deep = MockValue::Bool(true);
    for _ in 0..10 {
        deep = MockValue::Tuple(vec![deep]);
    }
    let (t, mut model) = single(&api, deep);
    model.set_config(DecodeConfig::new().with_max_depth(5)).unwrap();
    assert_eq!(model.get_value(t), Err(YicesError::RecursionLimit(5)));

    model.set_config(DecodeConfig::default()).unwrap();
    assert!(model.get_value(t).is_ok());
}

#[test]
fn unassigned_term_fails_in_get_value() {
    let api = MockYices::new();
    let (_, model) = single(&api, MockValue::int(1));
    let stray = api.new_variable(api.int_type());
    let err = model.get_value(stray).unwrap_err();
    assert_eq!(err.operation(), Some("yices_get_value"));
    assert_eq!(err.report().unwrap().code, ErrorCode::EVAL_UNKNOWN_TERM);
}

// ---- native failures ----

/// Every native fetch made while decoding reports its own name, and any
/// vector allocated on the way down is released.
#[test]
fn decode_failures_name_the_native_operation() {
    fn under_entry(leaf: MockValue) -> MockValue {
        MockValue::function(1, MockValue::int(0), vec![(vec![MockValue::int(1)], leaf)])
    }

    let api = MockYices::new();
    let color = api.scalar_type(2);
    let beyond_64_bits = BigInt::from(1u8) << 80usize;
    let cases = [
        ("yices_get_value", MockValue::int(1)),
        ("yices_val_get_bool", under_entry(MockValue::Bool(true))),
        ("yices_val_get_int64", under_entry(MockValue::int(1))),
        ("yices_val_get_rational64", under_entry(MockValue::rational(1, 3))),
        (
            "yices_val_get_double",
            under_entry(MockValue::big_rational(beyond_64_bits, BigInt::from(3))),
        ),
        ("yices_val_get_scalar", under_entry(MockValue::Scalar { ty: color, index: 1 })),
        ("yices_constant", under_entry(MockValue::Scalar { ty: color, index: 1 })),
        ("yices_val_get_bv", under_entry(MockValue::bv_from_u64(5, 8))),
        ("yices_val_expand_tuple", under_entry(MockValue::Tuple(vec![MockValue::int(1)]))),
        ("yices_val_expand_mapping", under_entry(MockValue::int(1))),
        ("yices_val_expand_function", under_entry(MockValue::int(1))),
    ];

    for (operation, value) in cases {
        let (x, model) = single(&api, value);
        api.fail_on(operation);

        let err = model.get_value(x).unwrap_err();
        assert_eq!(err.operation(), Some(operation), "failing {operation}");
        assert_eq!(
            err.report().unwrap().code,
            yices_native::mock::INJECTED_FAILURE,
            "failing {operation}"
        );
        assert_eq!(api.vector_counters().outstanding(), 0, "failing {operation}");
        assert_eq!(api.error_code(), ErrorCode::NO_ERROR);

        api.clear_failures();
        assert!(model.get_value(x).is_ok(), "model unusable after {operation}");
    }
}

#[test]
fn model_and_truth_failures_name_the_native_operation() {
    let api = MockYices::new();
    let p = api.new_variable(api.bool_type());
    let ctx = api.sat_context(vec![(p, MockValue::Bool(true))]);

    api.fail_on("yices_get_model");
    let err = Model::from_context(&api, ctx, false).unwrap_err();
    assert_eq!(err.operation(), Some("yices_get_model"));
    assert_eq!(api.live_models(), 0);
    api.clear_failures();

    let model = Model::from_context(&api, ctx, false).unwrap();
    assert_eq!(model.formulas_true_in_model(&[p]), Ok(true));
    api.fail_on("yices_formulas_true_in_model");
    let err = model.formulas_true_in_model(&[p]).unwrap_err();
    assert_eq!(err.operation(), Some("yices_formulas_true_in_model"));
    api.fail_on("yices_formula_true_in_model");
    let err = model.formula_true_in_model(p).unwrap_err();
    assert_eq!(err.operation(), Some("yices_formula_true_in_model"));

    api.fail_on("yices_model_collect_defined_terms");
    assert!(model.collect_defined_terms().is_empty());
    assert_eq!(api.vector_counters().outstanding(), 0);
}

// ---- deep values ----

/// Run `f` on a thread with the default 2 MiB test stack.
fn on_small_stack(f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn tuples_nested_to_the_default_limit_decode() {
    on_small_stack(|| {
        let levels = DEFAULT_MAX_DEPTH - 1;
        let mut deep = MockValue::Bool(true);
        for _ in 0..levels {
            deep = MockValue::Tuple(vec![deep]);
        }
        let api = MockYices::new();
        let (x, model) = single(&api, deep.clone());
        let value = model.get_value(x).unwrap();

        let mut node = &value;
        let mut seen = 0;
        while let Some(items) = node.as_tuple() {
            node = &items[0];
            seen += 1;
        }
        assert_eq!(seen, levels);
        assert_eq!(node, &Value::Bool(true));

        let (y, model) = single(&api, MockValue::Tuple(vec![deep]));
        assert_eq!(
            model.get_value(y),
            Err(YicesError::RecursionLimit(DEFAULT_MAX_DEPTH))
        );
        assert_eq!(api.vector_counters().outstanding(), 0);
    });
}

#[test]
fn functions_nested_near_the_default_limit_decode() {
    on_small_stack(|| {
        // Each function level adds two: the entry mapping and its result.
        let levels = (DEFAULT_MAX_DEPTH - 2) / 2;
        let mut deep = MockValue::int(7);
        for _ in 0..levels {
            deep = MockValue::function(1, MockValue::int(0), vec![(vec![MockValue::int(1)], deep)]);
        }
        let api = MockYices::new();
        let (f, model) = single(&api, deep);
        let value = model.get_value(f).unwrap();

        let mut node = &value;
        let mut seen = 0;
        while let Some(func) = node.as_function() {
            assert_eq!(func.apply(&[int(2)]), &int(0));
            node = func.apply(&[int(1)]);
            seen += 1;
        }
        assert_eq!(seen, levels);
        assert_eq!(node, &int(7));
        assert_eq!(api.vector_counters().outstanding(), 0);
    });
}

// ---- serialization ----

#[test]
fn decoded_values_serialize() {
    let api = MockYices::new();
    let color = api.scalar_type(3);
    let (f, model) = single(
        &api,
        MockValue::function(
            1,
            MockValue::Scalar { ty: color, index: 0 },
            vec![(
                vec![MockValue::rational(-3, 8)],
                MockValue::Scalar { ty: color, index: 2 },
            )],
        ),
    );
    let value = model.get_value(f).unwrap();
    let json = serde_json::to_string(&value).unwrap();
    let back: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(back, value);

    let expected = FunctionValue::from_mappings(
        model.get_value(api.constant(color, 0)).unwrap(),
        vec![Mapping::new(
            vec![Value::Rational(BigRational::new_raw(BigInt::from(-3), BigInt::from(8)))],
            model.get_value(api.constant(color, 2)).unwrap(),
        )],
    );
    assert_eq!(back, Value::Function(expected));
}
