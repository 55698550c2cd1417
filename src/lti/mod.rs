//! Linear time-invariant system algebra
//!
//! - [`Polynomial`]: exact coefficient arithmetic and companion-matrix roots
//! - [`TransferFunction`]: series and feedback composition, poles, realization
//! - [`StateSpace`]: the realization integrated by the step simulator

mod polynomial;
mod statespace;
mod transfer_function;

pub use polynomial::Polynomial;
pub use statespace::StateSpace;
pub use transfer_function::TransferFunction;
