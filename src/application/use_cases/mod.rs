mod classification_pipeline;
mod classify_complaint;
mod list_cases;
mod model_call;

pub use classification_pipeline::*;
pub use classify_complaint::*;
pub use list_cases::*;
pub use model_call::*;
