//! Known-answer checks and property sweeps over the numeric exports.
//!
//! The same suite runs in-process and against a loaded library, so a
//! foreign build of the exports can be compared with this crate's own.

use crate::catalog::{self, Value, ValueType};
use crate::Result;
use std::fmt;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

/// Anything that can invoke an export by its unprefixed name.
pub trait Evaluator {
    fn evaluate(&self, name: &str, args: &[Value]) -> Result<Value>;
}

/// Calls the Rust implementations directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcess;

impl Evaluator for InProcess {
    fn evaluate(&self, name: &str, args: &[Value]) -> Result<Value> {
        catalog::evaluate(name, args)
    }
}

#[cfg(not(target_os = "windows"))]
impl Evaluator for crate::loader::LoadedLibrary {
    fn evaluate(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.call(name, args)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expect {
    Exact(Value),
    Nan,
}

impl Expect {
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Expect::Exact(expected) => expected == actual,
            Expect::Nan => actual.as_f64().is_some_and(f64::is_nan),
        }
    }
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expect::Exact(value) => write!(f, "{value}"),
            Expect::Nan => f.write_str("NaN"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub function: &'static str,
    pub args: &'static [Value],
    pub expect: Expect,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
        write!(f, "{}({}) == {}", self.function, args.join(", "), self.expect)
    }
}

const fn check(function: &'static str, args: &'static [Value], expect: Value) -> Check {
    Check {
        function,
        args,
        expect: Expect::Exact(expect),
    }
}

pub const CHECKS: &[Check] = &[
    check("add", &[Value::I32(2), Value::I32(3)], Value::I32(5)),
    check("add", &[Value::I32(i32::MAX), Value::I32(1)], Value::I32(i32::MIN)),
    check("subtract", &[Value::I32(10), Value::I32(4)], Value::I32(6)),
    check("multiply", &[Value::I32(6), Value::I32(7)], Value::I32(42)),
    check("power", &[Value::F64(2.0), Value::F64(10.0)], Value::F64(1024.0)),
    check("sqrt", &[Value::F64(4.0)], Value::F64(2.0)),
    Check {
        function: "sqrt",
        args: &[Value::F64(-1.0)],
        expect: Expect::Nan,
    },
    check("sin", &[Value::F64(0.0)], Value::F64(0.0)),
    check("cos", &[Value::F64(0.0)], Value::F64(1.0)),
    check("fibonacci", &[Value::I32(0)], Value::I64(0)),
    check("fibonacci", &[Value::I32(1)], Value::I64(1)),
    check("fibonacci", &[Value::I32(10)], Value::I64(55)),
    check("fibonacci", &[Value::I32(-5)], Value::I64(-5)),
    check("factorial", &[Value::I32(0)], Value::I64(1)),
    check("factorial", &[Value::I32(5)], Value::I64(120)),
    check("factorial", &[Value::I32(10)], Value::I64(3_628_800)),
    check("factorial", &[Value::I32(-3)], Value::I64(1)),
    check("is_prime", &[Value::I32(1)], Value::I32(0)),
    check("is_prime", &[Value::I32(2)], Value::I32(1)),
    check("is_prime", &[Value::I32(17)], Value::I32(1)),
    check("is_prime", &[Value::I32(18)], Value::I32(0)),
    check("gcd", &[Value::I32(12), Value::I32(18)], Value::I32(6)),
    check("lcm", &[Value::I32(4), Value::I32(6)], Value::I32(12)),
    check("lcm", &[Value::I32(0), Value::I32(5)], Value::I32(0)),
    check(
        "circle_area",
        &[Value::F64(1.0)],
        Value::F64(std::f64::consts::PI),
    ),
];

const ADD_SAMPLES: &[i32] = &[i32::MIN, -65_537, -1, 0, 1, 12_345, i32::MAX];

const FIBONACCI_SWEEP: RangeInclusive<i32> = 2..=60;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Mismatch { expected: String, actual: Value },
    Error(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Mismatch { expected, actual } => {
                write!(f, "expected {expected}, got {actual}")
            }
            Outcome::Error(message) => write!(f, "error: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub check: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub passed: usize,
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed + self.failures.len()
    }

    fn pass(&mut self, check: &str) {
        debug!(check, "passed");
        self.passed += 1;
    }

    fn fail(&mut self, check: String, outcome: Outcome) {
        warn!(check = %check, outcome = %outcome, "failed");
        self.failures.push(Failure { check, outcome });
    }
}

/// Run the known-answer checks and both property sweeps.
pub fn run_checks(evaluator: &dyn Evaluator) -> Report {
    let mut report = Report::default();

    for check in CHECKS {
        let description = check.to_string();
        match evaluator.evaluate(check.function, check.args) {
            Ok(actual) if check.expect.matches(&actual) => report.pass(&description),
            Ok(actual) => report.fail(
                description,
                Outcome::Mismatch {
                    expected: check.expect.to_string(),
                    actual,
                },
            ),
            Err(e) => report.fail(description, Outcome::Error(e.to_string())),
        }
    }

    check_fibonacci_recurrence(evaluator, FIBONACCI_SWEEP, &mut report);
    check_add_inverse(evaluator, ADD_SAMPLES, &mut report);

    report
}

/// `fibonacci(n) == fibonacci(n - 1) + fibonacci(n - 2)` for every `n` in range.
pub fn check_fibonacci_recurrence(
    evaluator: &dyn Evaluator,
    range: RangeInclusive<i32>,
    report: &mut Report,
) {
    let fib = |n: i32| evaluator.evaluate("fibonacci", &[Value::I32(n)]);

    for n in range {
        let description = format!("fibonacci({n}) == fibonacci({}) + fibonacci({})", n - 1, n - 2);
        let outcome = (|| -> Result<Option<Outcome>> {
            let values = [fib(n)?, fib(n - 1)?, fib(n - 2)?];
            let [Value::I64(current), Value::I64(prev), Value::I64(prev2)] = values else {
                let actual = values
                    .iter()
                    .copied()
                    .find(|value| value.value_type() != ValueType::I64)
                    .unwrap_or(values[0]);
                return Ok(Some(Outcome::Mismatch {
                    expected: "an i64 result".to_string(),
                    actual,
                }));
            };
            let expected = prev.wrapping_add(prev2);
            Ok((current != expected).then(|| Outcome::Mismatch {
                expected: expected.to_string(),
                actual: Value::I64(current),
            }))
        })();

        match outcome {
            Ok(None) => report.pass(&description),
            Ok(Some(mismatch)) => report.fail(description, mismatch),
            Err(e) => report.fail(description, Outcome::Error(e.to_string())),
        }
    }
}

/// `subtract(add(a, b), b) == a` for every pair drawn from `samples`.
pub fn check_add_inverse(evaluator: &dyn Evaluator, samples: &[i32], report: &mut Report) {
    for &a in samples {
        for &b in samples {
            let description = format!("subtract(add({a}, {b}), {b}) == {a}");
            let result = evaluator
                .evaluate("add", &[Value::I32(a), Value::I32(b)])
                .and_then(|sum| evaluator.evaluate("subtract", &[sum, Value::I32(b)]));

            match result {
                Ok(Value::I32(back)) if back == a => report.pass(&description),
                Ok(actual) => report.fail(
                    description,
                    Outcome::Mismatch {
                        expected: a.to_string(),
                        actual,
                    },
                ),
                Err(e) => report.fail(description, Outcome::Error(e.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FfiMathError;

    /// Evaluator that answers one function wrongly and delegates the rest.
    struct Broken {
        function: &'static str,
        answer: Value,
    }

    impl Evaluator for Broken {
        fn evaluate(&self, name: &str, args: &[Value]) -> Result<Value> {
            if name == self.function {
                Ok(self.answer)
            } else {
                InProcess.evaluate(name, args)
            }
        }
    }

    struct Unavailable;

    impl Evaluator for Unavailable {
        fn evaluate(&self, name: &str, _args: &[Value]) -> Result<Value> {
            Err(FfiMathError::UnknownFunction(name.to_string()))
        }
    }

    #[test]
    fn test_in_process_passes_everything() {
        let report = run_checks(&InProcess);
        assert!(report.is_success(), "failures: {:?}", report.failures);
        let expected_total =
            CHECKS.len() + FIBONACCI_SWEEP.count() + ADD_SAMPLES.len() * ADD_SAMPLES.len();
        assert_eq!(report.total(), expected_total);
    }

    #[test]
    fn test_every_check_targets_a_catalog_export() {
        for check in CHECKS {
            let export = catalog::lookup(check.function).unwrap();
            export.check_args(check.args).unwrap();
        }
    }

    #[test]
    fn test_wrong_answer_is_reported() {
        let broken = Broken {
            function: "is_prime",
            answer: Value::I32(1),
        };
        let report = run_checks(&broken);

        assert!(!report.is_success());
        let failed: Vec<&str> = report.failures.iter().map(|f| f.check.as_str()).collect();
        assert_eq!(failed, vec!["is_prime(1) == 0", "is_prime(18) == 0"]);
        assert_eq!(
            report.failures[0].outcome,
            Outcome::Mismatch {
                expected: "0".to_string(),
                actual: Value::I32(1),
            }
        );
    }

    #[test]
    fn test_nan_expectation() {
        assert!(Expect::Nan.matches(&Value::F64(f64::NAN)));
        assert!(!Expect::Nan.matches(&Value::F64(1.0)));
        assert!(!Expect::Nan.matches(&Value::I32(0)));
        assert!(Expect::Exact(Value::I64(55)).matches(&Value::I64(55)));
        assert!(!Expect::Exact(Value::I64(55)).matches(&Value::I32(55)));
    }

    #[test]
    fn test_errors_become_failures() {
        let mut report = Report::default();
        check_fibonacci_recurrence(&Unavailable, 2..=4, &mut report);

        assert_eq!(report.passed, 0);
        assert_eq!(report.failures.len(), 3);
        assert!(matches!(report.failures[0].outcome, Outcome::Error(_)));
    }

    #[test]
    fn test_wrongly_typed_fibonacci_fails_recurrence() {
        let broken = Broken {
            function: "fibonacci",
            answer: Value::F64(0.0),
        };
        let mut report = Report::default();
        check_fibonacci_recurrence(&broken, 2..=5, &mut report);

        assert_eq!(report.passed, 0);
        assert_eq!(report.failures.len(), 4);
        assert_eq!(
            report.failures[0].outcome,
            Outcome::Mismatch {
                expected: "an i64 result".to_string(),
                actual: Value::F64(0.0),
            }
        );
    }

    #[test]
    fn test_check_display() {
        assert_eq!(CHECKS[0].to_string(), "add(2, 3) == 5");
        assert_eq!(CHECKS[6].to_string(), "sqrt(-1) == NaN");
    }
}
