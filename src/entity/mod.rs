pub mod campaign;
pub mod connected_account;
pub mod finished_campaign;
pub mod participation;
pub mod submission;
pub mod user;

pub use campaign::CampaignStatus;
pub use connected_account::AccountStatus;
pub use participation::ParticipationStatus;
pub use submission::SubmissionStatus;
