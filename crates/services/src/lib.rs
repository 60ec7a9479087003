#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod lesson_service;
pub mod progress_service;
pub mod project_service;
pub mod quiz_service;
pub mod review_service;

pub use course_core::Clock;

pub use app_services::{AppServices, CourseSettings};
pub use error::{
    AppServicesError, LessonServiceError, ProgressServiceError, ProjectServiceError,
    QuizServiceError, ReviewServiceError,
};
pub use lesson_service::LessonService;
pub use progress_service::{Profile, ProgressService};
pub use project_service::{ProjectOutcome, ProjectService};
pub use quiz_service::QuizService;
pub use review_service::{AdminGate, AdminSession, ReviewService, ReviewStats, SubmissionBreakdown};
