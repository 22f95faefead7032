// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// The two ways a dashboard action can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// Transport failure or a non-success response from the service.
    #[error("{0}")]
    Fetch(String),
    /// Input rejected before any remote call was made.
    #[error("{0}")]
    Validation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Validation,
}

impl DashboardError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch(_) => ErrorKind::Fetch,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Errors that never passed through the classifier (decode failures,
    /// channel errors) count as fetch failures.
    pub fn classify(error: &anyhow::Error) -> ErrorKind {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<Self>())
            .map_or(ErrorKind::Fetch, Self::kind)
    }
}
