//! C ABI exports.
//!
//! Every symbol carries the `rust_` prefix. Exporting bare `sqrt`, `sin` or
//! `cos` would interpose the C math library's own symbols in the host
//! process.

use crate::math;

#[no_mangle]
pub extern "C" fn rust_add(a: i32, b: i32) -> i32 {
    math::add(a, b)
}

#[no_mangle]
pub extern "C" fn rust_subtract(a: i32, b: i32) -> i32 {
    math::subtract(a, b)
}

#[no_mangle]
pub extern "C" fn rust_multiply(a: i32, b: i32) -> i32 {
    math::multiply(a, b)
}

#[no_mangle]
pub extern "C" fn rust_power(base: f64, exponent: f64) -> f64 {
    math::power(base, exponent)
}

#[no_mangle]
pub extern "C" fn rust_sqrt(x: f64) -> f64 {
    math::sqrt(x)
}

#[no_mangle]
pub extern "C" fn rust_sin(x: f64) -> f64 {
    math::sin(x)
}

#[no_mangle]
pub extern "C" fn rust_cos(x: f64) -> f64 {
    math::cos(x)
}

#[no_mangle]
pub extern "C" fn rust_fibonacci(n: i32) -> i64 {
    math::fibonacci(n)
}

#[no_mangle]
pub extern "C" fn rust_factorial(n: i32) -> i64 {
    math::factorial(n)
}

/// 1 = prime, 0 = not prime.
#[no_mangle]
pub extern "C" fn rust_is_prime(n: i32) -> i32 {
    math::is_prime(n)
}

#[no_mangle]
pub extern "C" fn rust_gcd(a: i32, b: i32) -> i32 {
    math::gcd(a, b)
}

#[no_mangle]
pub extern "C" fn rust_lcm(a: i32, b: i32) -> i32 {
    math::lcm(a, b)
}

#[no_mangle]
pub extern "C" fn rust_circle_area(radius: f64) -> f64 {
    math::circle_area(radius)
}
