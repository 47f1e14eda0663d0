pub mod contact_matrix;

// re-export for cleaner imports
pub use self::contact_matrix::ContactMatrix;
