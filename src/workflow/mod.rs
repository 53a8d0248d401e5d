pub mod controller;
pub mod wizard_state;

pub use controller::WizardController;
pub use wizard_state::{ResultsState, WizardState, WizardStep};
