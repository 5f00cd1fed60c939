//! Descriptions of every exported function and in-process dispatch by name.

use crate::{math, FfiMathError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix the `ffi` module puts in front of every export name.
pub const DEFAULT_SYMBOL_PREFIX: &str = "rust_";

/// Primitive types allowed across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    I32,
    I64,
    F64,
}

impl ValueType {
    pub fn c_name(&self) -> &'static str {
        match self {
            ValueType::I32 => "int32_t",
            ValueType::I64 => "int64_t",
            ValueType::F64 => "double",
        }
    }

    /// Parse `text` as a value of this type.
    pub fn parse(&self, text: &str) -> Result<Value> {
        let trimmed = text.trim();
        let parsed = match self {
            ValueType::I32 => trimmed.parse().ok().map(Value::I32),
            ValueType::I64 => trimmed.parse().ok().map(Value::I64),
            ValueType::F64 => trimmed.parse().ok().map(Value::F64),
        };

        parsed.ok_or_else(|| {
            FfiMathError::InvalidArgument(format!("'{text}' is not a valid {self}"))
        })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F64 => "f64",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    I32(i32),
    I64(i64),
    F64(f64),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::I32(_) => ValueType::I32,
            Value::I64(_) => ValueType::I64,
            Value::F64(_) => ValueType::F64,
        }
    }

    /// Widen integer values to i64; `None` for floats.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I32(v) => Some(v as i64),
            Value::I64(v) => Some(v),
            Value::F64(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F64(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub params: &'static [ValueType],
    pub ret: ValueType,
}

impl Signature {
    /// C prototype for `symbol`, e.g. `int64_t rust_fibonacci(int32_t)`.
    pub fn c_prototype(&self, symbol: &str) -> String {
        let params: Vec<&str> = self.params.iter().map(ValueType::c_name).collect();
        format!("{} {}({})", self.ret.c_name(), symbol, params.join(", "))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        write!(f, "({}) -> {}", params.join(", "), self.ret)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Export {
    pub name: &'static str,
    pub signature: Signature,
    pub summary: &'static str,
}

impl Export {
    pub fn symbol(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.name)
    }

    pub fn arity(&self) -> usize {
        self.signature.params.len()
    }

    /// Parse textual arguments according to the declared parameter types.
    pub fn parse_args(&self, args: &[&str]) -> Result<Vec<Value>> {
        self.check_arity(args.len())?;
        self.signature
            .params
            .iter()
            .zip(args)
            .map(|(ty, text)| ty.parse(text))
            .collect()
    }

    /// Verify that `args` match the declared parameter list exactly.
    pub fn check_args(&self, args: &[Value]) -> Result<()> {
        self.check_arity(args.len())?;
        for (position, (expected, arg)) in self.signature.params.iter().zip(args).enumerate() {
            let actual = arg.value_type();
            if actual != *expected {
                return Err(FfiMathError::TypeMismatch {
                    function: self.name.to_string(),
                    position,
                    expected: *expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    fn check_arity(&self, actual: usize) -> Result<()> {
        if actual != self.arity() {
            return Err(FfiMathError::ArityMismatch {
                function: self.name.to_string(),
                expected: self.arity(),
                actual,
            });
        }
        Ok(())
    }
}

const I32_I32_TO_I32: Signature = Signature {
    params: &[ValueType::I32, ValueType::I32],
    ret: ValueType::I32,
};

const F64_F64_TO_F64: Signature = Signature {
    params: &[ValueType::F64, ValueType::F64],
    ret: ValueType::F64,
};

const F64_TO_F64: Signature = Signature {
    params: &[ValueType::F64],
    ret: ValueType::F64,
};

const I32_TO_I64: Signature = Signature {
    params: &[ValueType::I32],
    ret: ValueType::I64,
};

const I32_TO_I32: Signature = Signature {
    params: &[ValueType::I32],
    ret: ValueType::I32,
};

/// Every function exported by the `ffi` module, in export order.
pub const EXPORTS: &[Export] = &[
    Export {
        name: "add",
        signature: I32_I32_TO_I32,
        summary: "a + b, wrapping",
    },
    Export {
        name: "subtract",
        signature: I32_I32_TO_I32,
        summary: "a - b, wrapping",
    },
    Export {
        name: "multiply",
        signature: I32_I32_TO_I32,
        summary: "a * b, wrapping",
    },
    Export {
        name: "power",
        signature: F64_F64_TO_F64,
        summary: "base raised to exponent",
    },
    Export {
        name: "sqrt",
        signature: F64_TO_F64,
        summary: "square root, NaN for negative input",
    },
    Export {
        name: "sin",
        signature: F64_TO_F64,
        summary: "sine of x radians",
    },
    Export {
        name: "cos",
        signature: F64_TO_F64,
        summary: "cosine of x radians",
    },
    Export {
        name: "fibonacci",
        signature: I32_TO_I64,
        summary: "nth Fibonacci number, n <= 1 returned as-is",
    },
    Export {
        name: "factorial",
        signature: I32_TO_I64,
        summary: "n!, 1 for n <= 1",
    },
    Export {
        name: "is_prime",
        signature: I32_TO_I32,
        summary: "1 if n is prime, else 0",
    },
    Export {
        name: "gcd",
        signature: I32_I32_TO_I32,
        summary: "greatest common divisor",
    },
    Export {
        name: "lcm",
        signature: I32_I32_TO_I32,
        summary: "least common multiple, 0 if either is 0",
    },
    Export {
        name: "circle_area",
        signature: F64_TO_F64,
        summary: "area of a circle with the given radius",
    },
];

pub fn lookup(name: &str) -> Option<&'static Export> {
    EXPORTS.iter().find(|export| export.name == name)
}

/// Like [`lookup`], failing with `UnknownFunction`.
pub fn find(name: &str) -> Result<&'static Export> {
    lookup(name).ok_or_else(|| FfiMathError::UnknownFunction(name.to_string()))
}

/// Call an export in-process, without going through the C ABI.
pub fn evaluate(name: &str, args: &[Value]) -> Result<Value> {
    let export = find(name)?;
    export.check_args(args)?;

    let value = match (export.name, args) {
        ("add", [Value::I32(a), Value::I32(b)]) => Value::I32(math::add(*a, *b)),
        ("subtract", [Value::I32(a), Value::I32(b)]) => Value::I32(math::subtract(*a, *b)),
        ("multiply", [Value::I32(a), Value::I32(b)]) => Value::I32(math::multiply(*a, *b)),
        ("power", [Value::F64(base), Value::F64(exp)]) => Value::F64(math::power(*base, *exp)),
        ("sqrt", [Value::F64(x)]) => Value::F64(math::sqrt(*x)),
        ("sin", [Value::F64(x)]) => Value::F64(math::sin(*x)),
        ("cos", [Value::F64(x)]) => Value::F64(math::cos(*x)),
        ("fibonacci", [Value::I32(n)]) => Value::I64(math::fibonacci(*n)),
        ("factorial", [Value::I32(n)]) => Value::I64(math::factorial(*n)),
        ("is_prime", [Value::I32(n)]) => Value::I32(math::is_prime(*n)),
        ("gcd", [Value::I32(a), Value::I32(b)]) => Value::I32(math::gcd(*a, *b)),
        ("lcm", [Value::I32(a), Value::I32(b)]) => Value::I32(math::lcm(*a, *b)),
        ("circle_area", [Value::F64(r)]) => Value::F64(math::circle_area(*r)),
        _ => {
            return Err(FfiMathError::UnsupportedSignature {
                function: export.name.to_string(),
                signature: export.signature.to_string(),
            })
        }
    };

    Ok(value)
}

#[derive(Serialize)]
struct Manifest<'a> {
    symbol_prefix: &'a str,
    exports: Vec<ManifestEntry>,
}

#[derive(Serialize)]
struct ManifestEntry {
    name: &'static str,
    symbol: String,
    signature: String,
    c_prototype: String,
    summary: &'static str,
}

/// Render the catalog as TOML, with symbols built from `prefix`.
pub fn manifest(prefix: &str) -> Result<String> {
    let exports = EXPORTS
        .iter()
        .map(|export| {
            let symbol = export.symbol(prefix);
            ManifestEntry {
                name: export.name,
                c_prototype: export.signature.c_prototype(&symbol),
                signature: export.signature.to_string(),
                summary: export.summary,
                symbol,
            }
        })
        .collect();

    let manifest = Manifest {
        symbol_prefix: prefix,
        exports,
    };

    Ok(toml::to_string_pretty(&manifest)?)
}
