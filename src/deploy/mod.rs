pub mod deployer;
pub mod error;
pub mod steps;

pub use deployer::{Deployer, SUCCESS_NOTICE};
pub use error::*;
pub use steps::{DeployStep, ReleasePlan, StepCommand};
