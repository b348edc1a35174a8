//! Notifications service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationsServiceError {
    /// No record with the requested UUID exists.
    #[error("notification not found")]
    NotFound,

    /// The record exists but belongs to a different organization.
    ///
    /// Reported strictly after existence: a cross-org caller learns the
    /// record exists, and nothing else.
    #[error("notification belongs to a different organization")]
    Forbidden,

    /// The record's current status does not permit the requested transition.
    #[error("notification status does not allow this operation")]
    InvalidState,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for NotificationsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}
