//! Capability use cases backing the wizard's side effects.

mod check_email;
mod register_account;
mod submit_intake;

pub use check_email::CheckEmailExists;
pub use register_account::RegisterAccount;
pub use submit_intake::SubmitIntake;
