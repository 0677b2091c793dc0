/// Benchmark runner for implicit dispatch.
///
/// Compares cold resolution (caches dropped before every evaluation) with
/// cached resolution.

extern crate implicit_dispatch;

use implicit_dispatch::runner::api::ExprHelper;
use implicit_dispatch::runner::ds::value::Value;
use implicit_dispatch::runner::eval::expression::Expr;
use implicit_dispatch::runner::plugin::types::FunctionLibrary;
use std::time::{Duration, Instant};

/// Evaluate `expr` `iterations` times, dropping the resolution caches first
/// each time.
fn run_cold(expr: &Expr, iterations: u32) -> Duration {
    let mut helper = ExprHelper::new();
    let empty = FunctionLibrary::new("bench.Empty");
    let mut elapsed = Duration::ZERO;

    for _ in 0..iterations {
        helper.register_functions(&empty);
        let start = Instant::now();
        let _ = helper.evaluate(expr, Value::Null);
        elapsed += start.elapsed();
    }

    elapsed
}

/// Evaluate `expr` `iterations` times against warm caches.
fn run_cached(expr: &Expr, iterations: u32) -> Duration {
    let helper = ExprHelper::new();
    let _ = helper.evaluate(expr, Value::Null);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = helper.evaluate(expr, Value::Null);
    }
    start.elapsed()
}

fn small_list() -> Expr {
    Expr::call("list", vec![Expr::lit(3), Expr::lit(1), Expr::lit(2)])
}

fn main() {
    println!("=======================================================");
    println!("  Implicit Dispatch - Resolution Benchmarks");
    println!("  Cold (cache dropped) vs Cached");
    println!("=======================================================\n");

    let benchmarks: Vec<(&str, Expr, u32)> = vec![
        ("Implicit property (sorted)", small_list().property("sorted"), 20_000),
        (
            "Implicit method (take)",
            small_list().method("take", vec![Expr::lit(2)]),
            20_000,
        ),
        ("Native property (size)", small_list().property("size"), 20_000),
        (
            "Chained (sorted.reversed)",
            small_list().property("sorted").property("reversed"),
            20_000,
        ),
        (
            "Missing method",
            Expr::lit(1).method("missing", vec![]),
            20_000,
        ),
        (
            "Constructor",
            Expr::new_object("lang.String", vec![Expr::lit("x")]),
            20_000,
        ),
    ];

    println!("{:<30} {:>14} {:>14} {:>10}", "Benchmark", "Cold", "Cached", "Speedup");
    println!("{}", "-".repeat(70));

    let mut total_cold = Duration::ZERO;
    let mut total_cached = Duration::ZERO;

    for (name, expr, iterations) in &benchmarks {
        let cold = run_cold(expr, *iterations);
        let cached = run_cached(expr, *iterations);
        total_cold += cold;
        total_cached += cached;
        let speedup = cold.as_secs_f64() / cached.as_secs_f64();

        println!("{:<30} {:>12.2?} {:>12.2?} {:>9.2}x", name, cold, cached, speedup);
    }

    println!("{}", "-".repeat(70));
    let total_speedup = total_cold.as_secs_f64() / total_cached.as_secs_f64();
    println!(
        "{:<30} {:>12.2?} {:>12.2?} {:>9.2}x",
        "TOTAL", total_cold, total_cached, total_speedup
    );

    // Verify correctness
    println!("\n=======================================================");
    println!("  Correctness Verification");
    println!("=======================================================\n");

    let helper = ExprHelper::new();
    let verifications: Vec<(&str, Expr, &str)> = vec![
        ("sorted", small_list().property("sorted"), "[1, 2, 3]"),
        ("take", small_list().method("take", vec![Expr::lit(2)]), "[3, 1]"),
        ("size", small_list().property("size"), "3"),
        (
            "sorted.reversed",
            small_list().property("sorted").property("reversed"),
            "[3, 2, 1]",
        ),
    ];

    println!("{:<20} {:>12} {:>12}", "Test", "Expected", "Result");
    println!("{}", "-".repeat(46));

    for (name, expr, expected) in verifications {
        let actual = match helper.evaluate(&expr, Value::Null) {
            Ok(value) => value.to_string(),
            Err(err) => err.to_string(),
        };
        let status = if actual == expected { "✓" } else { "✗" };
        println!("{:<20} {:>12} {:>4} {:>7}", name, expected, status, actual);
    }
}
