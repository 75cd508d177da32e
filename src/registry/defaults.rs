use std::f64::consts::{E, PI};

use crate::registry::entry::{SymbolEntry, SymbolValue};

/// Approximate value of the golden ratio φ.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;
/// Approximate value of the Euler–Mascheroni constant γ.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// The built-in symbol set, in declaration order.
///
/// Constants come first, then the unknowns, units and functions. Function
/// names match the evaluator's builtin table.
#[must_use]
pub fn builtin_entries() -> Vec<SymbolEntry> {
    let mut entries = vec![SymbolEntry::constant("pi", &["π"], PI, "Archimedes' constant").with_display("π"),
                           SymbolEntry::constant("e", &[], E, "Euler's number"),
                           SymbolEntry::constant("golden", &["φ"], GOLDEN_RATIO, "Golden ratio").with_display("φ"),
                           SymbolEntry::constant("euler", &["γ"], EULER_GAMMA, "Euler–Mascheroni constant").with_display("γ"),
                           SymbolEntry::expression("c", &[], "299792458 * m / s", "Speed of light"),
                           SymbolEntry::expression("g", &[], "9.80665 * m / s^2", "Standard gravity"),
                           SymbolEntry::constant("undefined", &[], f64::NAN, "Undefined value").with_value(SymbolValue::Undefined)
                                                                                                   .hidden(),
                           SymbolEntry::unknown("x"),
                           SymbolEntry::unknown("y"),
                           SymbolEntry::unknown("z"),
                           SymbolEntry::unit("m", &["meter", "meters", "metre", "metres"], "Meter"),
                           SymbolEntry::unit("s", &["second", "seconds", "sec"], "Second"),
                           SymbolEntry::unit("gram", &["grams"], "Gram"),
                           SymbolEntry::unit("kg", &["kilogram", "kilograms"], "Kilogram"),
                           SymbolEntry::unit("h", &["hour", "hours"], "Hour"),
                           SymbolEntry::unit("minute", &["minutes"], "Minute"),
                           SymbolEntry::unit("L", &["liter", "liters", "litre", "litres"], "Liter"),
                           SymbolEntry::unit("N", &["newton", "newtons"], "Newton"),
                           SymbolEntry::unit("J", &["joule", "joules"], "Joule"),
                           SymbolEntry::unit("W", &["watt", "watts"], "Watt"),];

    entries.extend([SymbolEntry::function("sqrt", &[], "Square root").with_display("√"),
                    SymbolEntry::function("cbrt", &[], "Cube root").with_display("∛"),
                    SymbolEntry::function("abs", &[], "Absolute value"),
                    SymbolEntry::function("sin", &[], "Sine"),
                    SymbolEntry::function("cos", &[], "Cosine"),
                    SymbolEntry::function("tan", &[], "Tangent"),
                    SymbolEntry::function("asin", &["arcsin"], "Inverse sine"),
                    SymbolEntry::function("acos", &["arccos"], "Inverse cosine"),
                    SymbolEntry::function("atan", &["arctan"], "Inverse tangent"),
                    SymbolEntry::function("sinh", &[], "Hyperbolic sine"),
                    SymbolEntry::function("cosh", &[], "Hyperbolic cosine"),
                    SymbolEntry::function("tanh", &[], "Hyperbolic tangent"),
                    SymbolEntry::function("exp", &[], "Exponential function"),
                    SymbolEntry::function("ln", &[], "Natural logarithm"),
                    SymbolEntry::function("log", &[], "Logarithm, base 10 unless given"),
                    SymbolEntry::function("log2", &[], "Binary logarithm"),
                    SymbolEntry::function("factorial", &[], "Factorial"),
                    SymbolEntry::function("floor", &[], "Round down"),
                    SymbolEntry::function("ceil", &[], "Round up"),
                    SymbolEntry::function("round", &[], "Round to nearest, halves away from zero"),
                    SymbolEntry::function("trunc", &[], "Round toward zero"),
                    SymbolEntry::function("sign", &["sgn"], "Sign"),
                    SymbolEntry::function("min", &[], "Smallest argument"),
                    SymbolEntry::function("max", &[], "Largest argument"),
                    SymbolEntry::function("gcd", &[], "Greatest common divisor"),
                    SymbolEntry::function("lcm", &[], "Least common multiple"),
                    SymbolEntry::function("mod", &[], "Remainder of floored division"),
                    SymbolEntry::function("binomial", &["choose"], "Binomial coefficient"),]);

    for entry in &mut entries {
        entry.builtin = true;
    }
    entries
}
