pub mod usecases;

pub use usecases::{LightError, LightUsecases};
