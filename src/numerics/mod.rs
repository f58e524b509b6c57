pub mod diff;
pub mod quadrature;
pub mod roots;

pub use diff::derivative;
pub use quadrature::{integrate, integrate_real_line, integrate_real_line_with_breaks, Quadrature};
pub use roots::{expand_bracket, newton_bracketed, secant};
