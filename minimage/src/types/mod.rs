//! Small fixed-size linear algebra types: `Vector3D` for positions and
//! displacements, and `Matrix3` for lattice matrices.

/// Implement arithmetic operators for the types in this module.
///
/// - `operator!(Add::add(Lhs, Rhs) -> Output, |self, other| body)` implements
///   `Lhs + Rhs` with values and references on both sides;
/// - `operator!(scalar Mul::mul(Lhs, f64) -> Output, ...)` and
///   `operator!(scalar Mul::mul(f64, Rhs) -> Output, ...)` implement the
///   operator with a scalar, taking the other side by value or by reference;
/// - `operator!(assign AddAssign::add_assign(Lhs, Rhs), |self, other| body)`
///   implements `Lhs += Rhs` for values and references of `Rhs`.
macro_rules! operator {
    (@impl $Op:ident::$op:ident([$($Lhs:tt)+], [$($Rhs:tt)+]) -> $Output:ty, |$lhs:ident, $rhs:ident| $body:expr) => {
        impl $Op<$($Rhs)+> for $($Lhs)+ {
            type Output = $Output;
            #[inline]
            fn $op($lhs, $rhs: $($Rhs)+) -> $Output {
                $body
            }
        }
    };
    (@assign $Op:ident::$op:ident($Lhs:ty, [$($Rhs:tt)+]), |$lhs:ident, $rhs:ident| $body:expr) => {
        impl $Op<$($Rhs)+> for $Lhs {
            #[inline]
            fn $op(&mut $lhs, $rhs: $($Rhs)+) {
                $body
            }
        }
    };
    (scalar $Op:ident::$op:ident(f64, $Rhs:ty) -> $Output:ty, |$lhs:ident, $rhs:ident| $body:expr) => {
        operator!(@impl $Op::$op([f64], [$Rhs]) -> $Output, |$lhs, $rhs| $body);
        operator!(@impl $Op::$op([f64], [&'_ $Rhs]) -> $Output, |$lhs, $rhs| $body);
    };
    (scalar $Op:ident::$op:ident($Lhs:ty, f64) -> $Output:ty, |$lhs:ident, $rhs:ident| $body:expr) => {
        operator!(@impl $Op::$op([$Lhs], [f64]) -> $Output, |$lhs, $rhs| $body);
        operator!(@impl $Op::$op([&'_ $Lhs], [f64]) -> $Output, |$lhs, $rhs| $body);
    };
    (assign $Op:ident::$op:ident($Lhs:ty, $Rhs:ty), |$lhs:ident, $rhs:ident| $body:expr) => {
        operator!(@assign $Op::$op($Lhs, [$Rhs]), |$lhs, $rhs| $body);
        operator!(@assign $Op::$op($Lhs, [&'_ $Rhs]), |$lhs, $rhs| $body);
    };
    ($Op:ident::$op:ident($Lhs:ty, $Rhs:ty) -> $Output:ty, |$lhs:ident, $rhs:ident| $body:expr) => {
        operator!(@impl $Op::$op([$Lhs], [$Rhs]) -> $Output, |$lhs, $rhs| $body);
        operator!(@impl $Op::$op([&'_ $Lhs], [$Rhs]) -> $Output, |$lhs, $rhs| $body);
        operator!(@impl $Op::$op([$Lhs], [&'_ $Rhs]) -> $Output, |$lhs, $rhs| $body);
        operator!(@impl $Op::$op([&'_ $Lhs], [&'_ $Rhs]) -> $Output, |$lhs, $rhs| $body);
    };
}

mod vectors;
pub use self::vectors::Vector3D;

mod matrix;
pub use self::matrix::Matrix3;
