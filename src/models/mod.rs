// src/models/mod.rs

//! Domain models for the portal services.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose. Wire field names and casings follow
//! the hosted collections exactly, so serde attributes carry the contract.

mod announcement;
mod config;
mod faculty;
mod registration;
mod student;

// Re-export all public types
pub use announcement::{Announcement, AnnouncementCard, AnnouncementDetail, PUBLISHED_STATUS};
pub use config::{
    AssetsConfig, CollectionsConfig, Config, FeedConfig, HttpConfig, StoreBackend, StoreConfig,
};
pub use faculty::{FacultyCard, FacultyMember, PrincipalCard};
pub use registration::{DownloadRegistration, RegistrationForm};
pub use student::{GuardianInfo, StudentInfo, StudentRecord};
