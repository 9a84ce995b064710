// Application layer - Use case interactors

pub mod container;
pub mod crop_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use crop_interactor::CropInteractor;
