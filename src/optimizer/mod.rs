//! The two peephole rules the translator applies while it emits code.

pub mod constant_folding;
pub mod zero_loop;

pub use self::constant_folding::fold_increment;
pub use self::zero_loop::is_zero_loop;
