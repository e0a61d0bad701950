pub mod company;
pub mod document;
pub mod signer;

pub use company::Company;
pub use document::{Document, DocumentStatus, DocumentWithSigners, NewDocument};
pub use signer::{NewSigner, Signer, SignerStatus};
