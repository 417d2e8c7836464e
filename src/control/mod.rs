mod controller_state;
mod feedback;
mod input_fusion;
mod supervisor;

pub use controller_state::{ControllerState, Snapshot};
pub use feedback::{FeedbackStateMachine, LanderPhase, RenderOutcome};
pub use input_fusion::InputFusion;
pub use supervisor::Supervisor;
