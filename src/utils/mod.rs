//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! extracción de requests y helpers de serde.

pub mod errors;
pub mod extract;
pub mod serde_helpers;
pub mod validation;
