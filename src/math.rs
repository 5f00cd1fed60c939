//! Numeric utility functions backing the C exports.
//!
//! Every function is pure and total. Integer arithmetic wraps on overflow so
//! that nothing here can panic once it sits behind an `extern "C"` boundary.

pub fn add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

pub fn subtract(a: i32, b: i32) -> i32 {
    a.wrapping_sub(b)
}

pub fn multiply(a: i32, b: i32) -> i32 {
    a.wrapping_mul(b)
}

pub fn power(base: f64, exponent: f64) -> f64 {
    base.powf(exponent)
}

/// Square root; negative input yields NaN.
pub fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

pub fn sin(x: f64) -> f64 {
    x.sin()
}

pub fn cos(x: f64) -> f64 {
    x.cos()
}

/// `n`th Fibonacci number, 0-indexed.
///
/// Any `n <= 1` is returned unchanged, so negative input comes back as-is.
/// Results past F(92) wrap.
pub fn fibonacci(n: i32) -> i64 {
    if n <= 1 {
        return n as i64;
    }

    let (mut a, mut b) = (0i64, 1i64);
    for _ in 2..=n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    b
}

/// `n!`, with `n <= 1` giving 1. Wraps silently from 21! onwards.
pub fn factorial(n: i32) -> i64 {
    if n <= 1 {
        return 1;
    }
    (2..=n as i64).fold(1i64, |acc, k| acc.wrapping_mul(k))
}

/// Trial division up to √n. Returns 1 for prime, 0 otherwise.
pub fn is_prime(n: i32) -> i32 {
    if n < 2 {
        return 0;
    }

    let n = n as i64;
    let mut divisor = 2i64;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return 0;
        }
        divisor += 1;
    }
    1
}

/// Greatest common divisor via Euclid's algorithm. `gcd(0, 0) == 0`.
pub fn gcd(mut a: i32, mut b: i32) -> i32 {
    while b != 0 {
        let rem = a.wrapping_rem(b);
        a = b;
        b = rem;
    }
    a.wrapping_abs()
}

/// Least common multiple, 0 when either operand is 0.
pub fn lcm(a: i32, b: i32) -> i32 {
    if a == 0 || b == 0 {
        return 0;
    }
    a.wrapping_mul(b).wrapping_abs().wrapping_div(gcd(a, b))
}

pub fn circle_area(radius: f64) -> f64 {
    std::f64::consts::PI * radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_wraps() {
        assert_eq!(add(2, 3), 5);
        assert_eq!(subtract(2, 3), -1);
        assert_eq!(multiply(-4, 6), -24);
        assert_eq!(add(i32::MAX, 1), i32::MIN);
        assert_eq!(subtract(i32::MIN, 1), i32::MAX);
        assert_eq!(multiply(i32::MAX, 2), -2);
    }

    #[test]
    fn test_add_then_subtract_is_identity() {
        let samples = [i32::MIN, -1_000_000, -7, 0, 1, 42, 65_536, i32::MAX];
        for &a in &samples {
            for &b in &samples {
                assert_eq!(subtract(add(a, b), b), a, "a={a} b={b}");
                assert_eq!(add(a, b), add(b, a));
            }
        }
    }

    #[test]
    fn test_floating_point() {
        assert_eq!(power(2.0, 10.0), 1024.0);
        assert_eq!(power(0.0, 0.0), 1.0);
        assert!(power(f64::NAN, 2.0).is_nan());
        assert_eq!(sqrt(4.0), 2.0);
        assert!(sqrt(-1.0).is_nan());
        assert_eq!(sqrt(f64::INFINITY), f64::INFINITY);
        assert_eq!(sin(0.0), 0.0);
        assert_eq!(cos(0.0), 1.0);
        assert!((sin(std::f64::consts::FRAC_PI_2) - 1.0).abs() < 1e-15);
        assert!((cos(std::f64::consts::PI) + 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_fibonacci() {
        assert_eq!(fibonacci(0), 0);
        assert_eq!(fibonacci(1), 1);
        assert_eq!(fibonacci(2), 1);
        assert_eq!(fibonacci(10), 55);
        assert_eq!(fibonacci(50), 12_586_269_025);
        assert_eq!(fibonacci(92), 7_540_113_804_746_346_429);
        for n in 2..=92 {
            assert_eq!(fibonacci(n), fibonacci(n - 1) + fibonacci(n - 2));
        }
    }

    #[test]
    fn test_fibonacci_negative_passes_through() {
        assert_eq!(fibonacci(-1), -1);
        assert_eq!(fibonacci(-5), -5);
        assert_eq!(fibonacci(i32::MIN), i32::MIN as i64);
    }

    #[test]
    fn test_fibonacci_wraps_past_i64() {
        assert_eq!(fibonacci(93), fibonacci(92).wrapping_add(fibonacci(91)));
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(1), 1);
        assert_eq!(factorial(5), 120);
        assert_eq!(factorial(10), 3_628_800);
        assert_eq!(factorial(20), 2_432_902_008_176_640_000);
        assert_eq!(factorial(-3), 1);
        assert_eq!(factorial(21), factorial(20).wrapping_mul(21));
    }

    #[test]
    fn test_is_prime() {
        assert_eq!(is_prime(1), 0);
        assert_eq!(is_prime(2), 1);
        assert_eq!(is_prime(17), 1);
        assert_eq!(is_prime(18), 0);
        assert_eq!(is_prime(0), 0);
        assert_eq!(is_prime(-7), 0);
        assert_eq!(is_prime(25), 0);
        assert_eq!(is_prime(7919), 1);
        assert_eq!(is_prime(i32::MAX), 1);

        let primes: Vec<i32> = (0..30).filter(|&n| is_prime(n) == 1).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_gcd_and_lcm() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(17, 5), 1);
        assert_eq!(gcd(0, 9), 9);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(i32::MIN, -1), 1);
        assert_eq!(lcm(4, 6), 12);
        assert_eq!(lcm(-4, 6), 12);
        assert_eq!(lcm(0, 5), 0);
        assert_eq!(lcm(7, 0), 0);
    }

    #[test]
    fn test_circle_area() {
        assert_eq!(circle_area(1.0), std::f64::consts::PI);
        assert_eq!(circle_area(0.0), 0.0);
        assert_eq!(circle_area(-2.0), circle_area(2.0));
    }
}
