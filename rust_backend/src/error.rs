//! Error types for the pipeline.
//!
//! Geometry failures are kept distinct from data failures: a degenerate shape
//! is a programming error, while an infeasible tile or a sparse field is a
//! property of the catalogue being tiled.

use std::fmt;

use crate::geometry::GeometryError;
use crate::plate::conflicts::{BlockedMagnet, BodyCollision, ConflictedMagnet};

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Structured context for pipeline errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "assemble_tile", "load_targets")
    pub operation: Option<String>,
    /// Tile number if the error belongs to one tile
    pub tile: Option<usize>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether re-centring the tile may clear the error
    pub recoverable: bool,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the tile number.
    pub fn with_tile(mut self, tile: usize) -> Self {
        self.tile = Some(tile);
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Mark this error as recoverable.
    pub fn recoverable(mut self) -> Self {
        self.recoverable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(tile) = self.tile {
            parts.push(format!("tile={}", tile));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.recoverable {
            parts.push("recoverable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Which candidate category ran short inside the field of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Targets,
    Guides,
    Standards,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CandidateKind::Targets => "targets",
            CandidateKind::Guides => "guide stars",
            CandidateKind::Standards => "standard stars",
        };
        f.write_str(name)
    }
}

/// Error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// At least one magnet lost every pickup direction or collided with
    /// another magnet.
    #[error(
        "Infeasible tile {tile_file}: {} fully blocked magnet(s), {} collision(s) {context}",
        blocked.len(),
        collisions.len()
    )]
    InfeasibleTile {
        tile_file: String,
        blocked: Vec<BlockedMagnet>,
        collisions: Vec<BodyCollision>,
        /// Conflicts that removed a pickup area from a blocked magnet.
        conflicts: Vec<ConflictedMagnet>,
        context: ErrorContext,
    },

    /// Fewer candidates than required inside the field of view.
    #[error("Insufficient {kind}: found {found}, need {required} {context}")]
    InsufficientCandidates {
        kind: CandidateKind,
        found: usize,
        required: usize,
        context: ErrorContext,
    },

    /// Zero-area rectangles, coincident points and similar misuse of the
    /// geometry kernel.
    #[error("Degenerate geometry: {source} {context}")]
    DegenerateGeometry {
        #[source]
        source: GeometryError,
        context: ErrorContext,
    },

    /// Configuration file or parameter errors.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Catalogue parsing or validation errors.
    #[error("Catalogue error: {message} {context}")]
    Catalogue {
        message: String,
        context: ErrorContext,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Create an infeasible-tile error.
    pub fn infeasible(
        tile_file: impl Into<String>,
        blocked: Vec<BlockedMagnet>,
        collisions: Vec<BodyCollision>,
        conflicts: Vec<ConflictedMagnet>,
    ) -> Self {
        Self::InfeasibleTile {
            tile_file: tile_file.into(),
            blocked,
            collisions,
            conflicts,
            context: ErrorContext::new("configure_plate"),
        }
    }

    /// Create an insufficient-candidates error. These are always recoverable.
    pub fn insufficient(kind: CandidateKind, found: usize, required: usize) -> Self {
        Self::InsufficientCandidates {
            kind,
            found,
            required,
            context: ErrorContext::new("assemble_tile").recoverable(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a catalogue error.
    pub fn catalogue(message: impl Into<String>) -> Self {
        Self::Catalogue {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Check whether re-centring may clear this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InsufficientCandidates { context, .. } => context.recoverable,
            Self::InfeasibleTile { context, .. } => context.recoverable,
            _ => false,
        }
    }

    /// Get the error context, if the variant carries one.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::InfeasibleTile { context, .. }
            | Self::InsufficientCandidates { context, .. }
            | Self::DegenerateGeometry { context, .. }
            | Self::Configuration { context, .. }
            | Self::Catalogue { context, .. } => Some(context),
            Self::Io(_) => None,
        }
    }

    /// Attach a tile number to the error context.
    pub fn with_tile(mut self, tile: usize) -> Self {
        match &mut self {
            Self::InfeasibleTile { context, .. }
            | Self::InsufficientCandidates { context, .. }
            | Self::DegenerateGeometry { context, .. }
            | Self::Configuration { context, .. }
            | Self::Catalogue { context, .. } => {
                context.tile = Some(tile);
            }
            Self::Io(_) => {}
        }
        self
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::InfeasibleTile { context, .. }
            | Self::InsufficientCandidates { context, .. }
            | Self::DegenerateGeometry { context, .. }
            | Self::Configuration { context, .. }
            | Self::Catalogue { context, .. } => {
                context.operation = Some(operation.into());
            }
            Self::Io(_) => {}
        }
        self
    }
}

impl From<GeometryError> for PipelineError {
    fn from(err: GeometryError) -> Self {
        PipelineError::DegenerateGeometry {
            source: err,
            context: ErrorContext::default(),
        }
    }
}
