pub mod cycle;
pub mod insights;
pub mod medications;
pub mod notifications;
pub mod symptoms;
