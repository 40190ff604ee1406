//! ID type wrappers for type safety.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Client-generated identifier of a selected file.
///
/// Assigned the moment a file is picked, before any upload starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(String);

/// Identifier the backend assigns to a created consultation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsultationId(String);

impl_id!(FileId, ConsultationId);
