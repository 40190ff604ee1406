//! Intake records collected by the wizard stages.

mod draft;
mod features;
mod payment;
mod project;
pub mod request;

pub use draft::IntakeDraft;
pub use features::FeaturesData;
pub use payment::{PaymentData, PaymentMethod};
pub use project::{ContactInfo, ProjectData};
pub use request::{AttachmentRef, ConsultationRequest, SubmissionReceipt};
